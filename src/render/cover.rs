use crate::foundation::core::{Affine, Rect, Vec2};

/// Centered source crop whose aspect ratio matches `dst_w / dst_h`.
///
/// Only the oversized axis is trimmed, symmetrically, so drawing the crop into the destination
/// covers it with no letterboxing. Returns `None` for empty or non-finite sizes.
pub fn cover_crop(src_w: f64, src_h: f64, dst_w: f64, dst_h: f64) -> Option<Rect> {
    let dims = [src_w, src_h, dst_w, dst_h];
    if dims.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return None;
    }

    let src_ratio = src_w / src_h;
    let dst_ratio = dst_w / dst_h;

    if src_ratio > dst_ratio {
        let crop_w = (src_h * dst_ratio).min(src_w);
        let x0 = (src_w - crop_w) / 2.0;
        Some(Rect::new(x0, 0.0, x0 + crop_w, src_h))
    } else {
        let crop_h = (src_w / dst_ratio).min(src_h);
        let y0 = (src_h - crop_h) / 2.0;
        Some(Rect::new(0.0, y0, src_w, y0 + crop_h))
    }
}

/// Transform mapping `crop` (source pixel space) onto `dst`, rotated by `rotation_deg` about the
/// center of `dst` and mirrored left-to-right.
pub fn slot_transform(crop: Rect, dst: Rect, rotation_deg: f64) -> Affine {
    let center = dst.center();
    let crop_center = crop.center();
    let scale_x = dst.width() / crop.width();
    let scale_y = dst.height() / crop.height();

    Affine::translate(center.to_vec2())
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::scale_non_uniform(-1.0, 1.0)
        * Affine::scale_non_uniform(scale_x, scale_y)
        * Affine::translate(-Vec2::new(crop_center.x, crop_center.y))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
