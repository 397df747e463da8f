use crate::{
    assets::color::ColorDef,
    foundation::core::{Canvas, Rect},
    foundation::error::BoothResult,
    session::assign::{SlotAssignments, resolve_photo_index},
    template::model::{LayerOrder, TemplateLayout},
};

/// One slot photo to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotDraw {
    /// Slot id, for diagnostics.
    pub slot_id: String,
    /// Resolved photo index in the capture buffer.
    pub photo: usize,
    /// Destination rectangle in canvas pixels.
    pub rect: Rect,
    /// Rotation about the rectangle center, in degrees.
    pub rotation_deg: f64,
    /// Layer the slot belongs to.
    pub layer: LayerOrder,
}

/// A single draw step, executed in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the whole canvas with a straight-alpha RGBA8 color.
    Background {
        /// Fill color.
        rgba: [u8; 4],
    },
    /// Draw a photo into a slot (cover-fit, rotated, mirrored).
    Slot(SlotDraw),
    /// Draw the overlay stretched to the full canvas.
    Overlay,
}

/// Backend-agnostic draw list for one composite.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositePlan {
    /// Output size.
    pub canvas: Canvas,
    /// Ordered draw steps: background, bottom slots, overlay, top slots.
    pub ops: Vec<DrawOp>,
}

/// Build the draw list for `layout`.
///
/// Slot photos are resolved against `photo_count`; with no photos, slots are left out and the
/// plan reduces to background plus overlay.
pub fn compile_plan(
    layout: &TemplateLayout,
    assignments: &SlotAssignments,
    photo_count: usize,
    background: ColorDef,
) -> BoothResult<CompositePlan> {
    let canvas = layout.canvas()?;

    let mut ops = Vec::with_capacity(layout.slots.len() + 2);
    ops.push(DrawOp::Background {
        rgba: background.to_rgba8(),
    });
    push_slots(&mut ops, layout, assignments, photo_count, LayerOrder::Bottom);
    ops.push(DrawOp::Overlay);
    push_slots(&mut ops, layout, assignments, photo_count, LayerOrder::Top);

    Ok(CompositePlan { canvas, ops })
}

fn push_slots(
    ops: &mut Vec<DrawOp>,
    layout: &TemplateLayout,
    assignments: &SlotAssignments,
    photo_count: usize,
    layer: LayerOrder,
) {
    for (position, slot) in layout.slots.iter().enumerate() {
        if slot.layer_order != layer {
            continue;
        }
        let Some(photo) = resolve_photo_index(slot, position, assignments, photo_count) else {
            tracing::debug!(slot = %slot.id, "no photos captured; slot left empty");
            continue;
        };
        ops.push(DrawOp::Slot(SlotDraw {
            slot_id: slot.id.clone(),
            photo,
            rect: slot.rect(),
            rotation_deg: slot.rotation_deg(),
            layer,
        }));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
