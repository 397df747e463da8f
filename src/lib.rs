//! Snapbooth is the compositing core of a photobooth: it turns a template and a handful of
//! captured photos into one finished picture.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: photos are appended to a bounded [`CaptureBuffer`] in take order.
//! 2. **Assign**: [`auto_assign`] maps every template slot to a take; [`reduce`] applies manual
//!    [`Action::AssignSlot`] and [`Action::ReorderPhotos`] edits, remapping indices so each slot
//!    keeps its photo.
//! 3. **Decode**: [`decode_inputs`] decodes the overlay and all photos concurrently.
//! 4. **Compose**: [`compile_plan`] orders the draw list and [`CpuBackend`] rasterizes it:
//!    background, bottom slots, overlay stretched to the canvas, top slots. Slot photos are
//!    cover-fit, rotated about the slot center and mirrored horizontally.
//! 5. **Export** (optional): [`save`] writes PNG or JPEG.
//!
//! [`render_session`] runs steps 3 and 4 for a [`SessionState`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical pixels.
//! - **Recoverable by default**: stale indices, failed decodes and out-of-range reorders degrade
//!   the picture instead of failing it. Only a missing template or an empty capture is fatal.
//! - **Premultiplied RGBA8** from the backend; [`to_rgba_image`] converts for export.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;
mod render;
mod session;
mod template;

pub use assets::color::ColorDef;
pub use assets::decode::{decode_image, looks_like_svg, rasterize_svg};
pub use assets::store::{
    DecodedInputs, FsImageDecoder, ImageDecoder, ImageSource, PreparedImage, decode_inputs,
};
pub use config::{BoothConfig, ENV_PREFIX};
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{BoothError, BoothResult};
pub use render::backend::{CompositeBackend, FrameRGBA};
pub use render::cover::{cover_crop, slot_transform};
pub use render::cpu::CpuBackend;
pub use render::export::{OutputFormat, encode, save, to_rgba_image};
pub use render::pipeline::{CompositeOutput, composite, render_session};
pub use render::plan::{CompositePlan, DrawOp, SlotDraw, compile_plan};
pub use session::assign::{SlotAssignments, auto_assign, resolve_photo_index};
pub use session::capture::CaptureBuffer;
pub use session::reorder::{remap_index, reorder};
pub use session::state::{Action, BoothStep, SessionState, SessionSummary, reduce};
pub use template::model::{LayerOrder, LayoutSlot, Template, TemplateLayout, active_templates};
