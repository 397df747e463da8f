use crate::{
    assets::store::DecodedInputs,
    foundation::error::BoothResult,
    foundation::math::Fnv1a64,
    render::plan::CompositePlan,
};

/// A rendered composite as RGBA8 pixels.
///
/// Composites are **premultiplied alpha**; the `premultiplied` flag makes that explicit at API
/// boundaries. Use [`crate::to_rgba_image`] for straight-alpha export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Stable 64-bit fingerprint of size and pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }
}

/// A rasterizer that executes a [`CompositePlan`] against decoded inputs.
pub trait CompositeBackend {
    /// Draw every op of `plan` in order and read back the canvas.
    ///
    /// Ops whose image is missing from `inputs` are skipped, never fatal.
    fn render_plan(
        &mut self,
        plan: &CompositePlan,
        inputs: &DecodedInputs,
    ) -> BoothResult<FrameRGBA>;
}
