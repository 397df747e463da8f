use std::{collections::HashSet, path::Path};

use anyhow::Context;

use crate::{
    assets::color::ColorDef,
    foundation::core::{Canvas, Rect},
    foundation::error::{BoothError, BoothResult},
};

/// Whether a slot's photo is drawn beneath or above the template overlay.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrder {
    /// Drawn before the overlay (behind the decorative frame).
    #[default]
    Bottom,
    /// Drawn after the overlay (in front of the frame).
    Top,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A rectangular region of the template where one captured photo is drawn.
pub struct LayoutSlot {
    /// Identifier, unique within its layout.
    pub id: String,
    /// Left edge in layout pixels.
    pub x: f64,
    /// Top edge in layout pixels.
    pub y: f64,
    /// Width in layout pixels.
    pub width: f64,
    /// Height in layout pixels.
    pub height: f64,
    /// Default photo index shown when no explicit assignment exists.
    ///
    /// Not unique across slots. When absent, the slot's position in the layout is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_take_index: Option<usize>,
    /// Rotation in degrees about the slot center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Stacking relative to the overlay.
    #[serde(default)]
    pub layer_order: LayerOrder,
}

impl LayoutSlot {
    /// Slot rectangle in layout pixel space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Default photo index for a slot declared at `position`.
    pub fn default_take_index(&self, position: usize) -> usize {
        self.target_take_index.unwrap_or(position)
    }

    /// Rotation in degrees, `0` when unset.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canvas size plus ordered photo slots.
pub struct TemplateLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Slots in authoring order. Draw order within a layer follows this order.
    pub slots: Vec<LayoutSlot>,
}

impl TemplateLayout {
    /// Output canvas of this layout.
    pub fn canvas(&self) -> BoothResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Look up a slot by id.
    pub fn slot(&self, id: &str) -> Option<&LayoutSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Largest default take index referenced by any slot, plus one.
    pub fn expected_photo_count(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| s.default_take_index(i) + 1)
            .max()
            .unwrap_or(0)
    }

    /// Validate layout invariants.
    ///
    /// Slots that leave the canvas are accepted with a warning.
    pub fn validate(&self) -> BoothResult<()> {
        self.canvas()?;
        let bounds = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));

        let mut seen = HashSet::new();
        for slot in &self.slots {
            if slot.id.trim().is_empty() {
                return Err(BoothError::validation("slot id must be non-empty"));
            }
            if !seen.insert(slot.id.as_str()) {
                return Err(BoothError::validation(format!(
                    "duplicate slot id \"{}\"",
                    slot.id
                )));
            }
            if !(slot.x.is_finite() && slot.y.is_finite()) {
                return Err(BoothError::validation(format!(
                    "slot \"{}\" position must be finite",
                    slot.id
                )));
            }
            if !(slot.width.is_finite() && slot.width > 0.0)
                || !(slot.height.is_finite() && slot.height > 0.0)
            {
                return Err(BoothError::validation(format!(
                    "slot \"{}\" width/height must be finite and > 0",
                    slot.id
                )));
            }
            if let Some(r) = slot.rotation
                && !r.is_finite()
            {
                return Err(BoothError::validation(format!(
                    "slot \"{}\" rotation must be finite",
                    slot.id
                )));
            }

            let r = slot.rect();
            if r.x0 < bounds.x0 || r.y0 < bounds.y0 || r.x1 > bounds.x1 || r.y1 > bounds.y1 {
                tracing::warn!(slot = %slot.id, "slot extends outside the template canvas");
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A decorative template: overlay image, background and slot layout.
pub struct Template {
    /// Stable identifier (persistence only).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Overlay image source (PNG with transparency, or SVG), drawn stretched to the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the template is offered on the selection screen.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Canvas background; the configured fallback is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorDef>,
    /// Canvas size and slots.
    pub layout: TemplateLayout,
}

fn default_active() -> bool {
    true
}

impl Template {
    /// Parse and validate a template from JSON text.
    pub fn from_json_str(s: &str) -> BoothResult<Self> {
        let t: Self = serde_json::from_str(s)?;
        t.validate()?;
        Ok(t)
    }

    /// Read, parse and validate a template JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate template invariants.
    pub fn validate(&self) -> BoothResult<()> {
        if self.id.trim().is_empty() {
            return Err(BoothError::validation("template id must be non-empty"));
        }
        if let Some(url) = &self.image_url
            && url.trim().is_empty()
        {
            return Err(BoothError::validation(
                "template imageUrl must be non-empty when set",
            ));
        }
        self.layout.validate()
    }

    /// Background to fill the canvas with, falling back to `default`.
    pub fn background_or(&self, default: ColorDef) -> ColorDef {
        self.background_color.unwrap_or(default)
    }
}

/// Templates offered on the selection screen, in catalog order.
pub fn active_templates(templates: &[Template]) -> Vec<&Template> {
    templates.iter().filter(|t| t.active).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
