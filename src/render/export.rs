use std::{io::Cursor, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{BoothError, BoothResult},
    foundation::math::unpremul_u8,
    render::backend::FrameRGBA,
};

/// Encoded output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG with alpha.
    Png,
    /// JPEG; alpha is dropped.
    Jpeg,
}

impl OutputFormat {
    /// Pick a format from a file extension (`png`, `jpg`, `jpeg`; case-insensitive).
    pub fn from_path(path: &Path) -> BoothResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            _ => Err(BoothError::validation(format!(
                "unsupported output extension for '{}' (expected .png, .jpg or .jpeg)",
                path.display()
            ))),
        }
    }
}

/// Convert a frame to a straight-alpha [`image::RgbaImage`].
pub fn to_rgba_image(frame: &FrameRGBA) -> BoothResult<image::RgbaImage> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        for px in data.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
    }
    image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| BoothError::render("frame byte length does not match its size"))
}

/// Encode `frame` in `format`. `jpeg_quality` is ignored for PNG.
pub fn encode(frame: &FrameRGBA, format: OutputFormat, jpeg_quality: u8) -> BoothResult<Vec<u8>> {
    let rgba = to_rgba_image(frame)?;
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            rgba.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .context("encode png")?;
        }
        OutputFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
            rgb.write_with_encoder(encoder).context("encode jpeg")?;
        }
    }
    Ok(buf)
}

/// Encode `frame` by the extension of `path` and write it, creating parent directories.
pub fn save(frame: &FrameRGBA, path: &Path, jpeg_quality: u8) -> BoothResult<()> {
    let format = OutputFormat::from_path(path)?;
    let bytes = encode(frame, format, jpeg_quality)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write image '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), ?format, "composite saved");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
