use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use crate::{
    assets::store::{DecodedInputs, PreparedImage},
    foundation::core::{Affine, Rect},
    foundation::error::{BoothError, BoothResult},
    render::{
        backend::{CompositeBackend, FrameRGBA},
        cover::{cover_crop, slot_transform},
        plan::{CompositePlan, DrawOp, SlotDraw},
    },
};

/// CPU raster backend powered by `vello_cpu`.
///
/// Rendering is single-threaded and deterministic: identical plans and inputs produce identical
/// bytes.
#[derive(Debug, Default)]
pub struct CpuBackend {
    _private: (),
}

impl CpuBackend {
    /// Create a backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompositeBackend for CpuBackend {
    fn render_plan(
        &mut self,
        plan: &CompositePlan,
        inputs: &DecodedInputs,
    ) -> BoothResult<FrameRGBA> {
        let width: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| BoothError::render("canvas width exceeds u16"))?;
        let height: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| BoothError::render("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let mut photo_paints: HashMap<usize, vello_cpu::Image> = HashMap::new();

        for op in &plan.ops {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                DrawOp::Background { rgba } => {
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        rgba[0], rgba[1], rgba[2], rgba[3],
                    ));
                    ctx.fill_rect(&rect_to_cpu(plan.canvas.rect()));
                }
                DrawOp::Overlay => {
                    let Some(overlay) = &inputs.overlay else {
                        tracing::debug!("no decoded overlay; skipping overlay layer");
                        continue;
                    };
                    let paint = match image_paint(overlay) {
                        Ok(paint) => paint,
                        Err(err) => {
                            tracing::warn!(error = %err, "overlay cannot be rasterized; skipping overlay layer");
                            continue;
                        }
                    };
                    let (ow, oh) = (f64::from(overlay.width), f64::from(overlay.height));
                    // Stretch to the canvas regardless of the overlay's own aspect ratio.
                    let stretch = Affine::scale_non_uniform(
                        f64::from(plan.canvas.width) / ow,
                        f64::from(plan.canvas.height) / oh,
                    );
                    ctx.set_transform(affine_to_cpu(stretch));
                    ctx.set_paint(paint);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, ow, oh));
                }
                DrawOp::Slot(slot) => {
                    let Some(photo) = inputs.photos.get(slot.photo).and_then(Option::as_ref)
                    else {
                        tracing::warn!(slot = %slot.slot_id, photo = slot.photo, "photo not decoded; slot skipped");
                        continue;
                    };
                    let paint = match photo_paints.entry(slot.photo) {
                        Entry::Occupied(e) => e.get().clone(),
                        Entry::Vacant(e) => match image_paint(photo) {
                            Ok(paint) => e.insert(paint).clone(),
                            Err(err) => {
                                tracing::warn!(slot = %slot.slot_id, photo = slot.photo, error = %err, "photo cannot be rasterized; slot skipped");
                                continue;
                            }
                        },
                    };
                    draw_slot(&mut ctx, slot, photo, paint);
                }
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_slot(
    ctx: &mut vello_cpu::RenderContext,
    slot: &SlotDraw,
    photo: &PreparedImage,
    paint: vello_cpu::Image,
) {
    let Some(crop) = cover_crop(
        f64::from(photo.width),
        f64::from(photo.height),
        slot.rect.width(),
        slot.rect.height(),
    ) else {
        tracing::warn!(slot = %slot.slot_id, "degenerate slot or photo size; slot skipped");
        return;
    };

    tracing::debug!(
        slot = %slot.slot_id,
        photo = slot.photo,
        crop_x = crop.x0,
        crop_y = crop.y0,
        crop_w = crop.width(),
        crop_h = crop.height(),
        "drawing slot"
    );

    ctx.set_transform(affine_to_cpu(slot_transform(crop, slot.rect, slot.rotation_deg)));
    ctx.set_paint(paint);
    ctx.fill_rect(&rect_to_cpu(crop));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_paint(img: &PreparedImage) -> BoothResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> BoothResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BoothError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BoothError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(BoothError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
