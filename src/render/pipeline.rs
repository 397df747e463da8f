use std::path::PathBuf;

use crate::{
    assets::{
        color::ColorDef,
        store::{DecodedInputs, ImageDecoder, ImageSource, decode_inputs},
    },
    config::BoothConfig,
    foundation::error::{BoothError, BoothResult},
    render::{
        backend::{CompositeBackend, FrameRGBA},
        cpu::CpuBackend,
        plan::compile_plan,
    },
    session::{assign::SlotAssignments, state::SessionState, state::SessionSummary},
    template::model::TemplateLayout,
};

/// Composite already-decoded inputs onto a fresh canvas.
///
/// Layer order: background fill, bottom-layer slots, overlay stretched to the canvas, top-layer
/// slots. Each slot photo is cover-fit, rotated about the slot center and mirrored horizontally.
///
/// Zero photos is not an error here: the result is background plus overlay.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
pub fn composite(
    layout: &TemplateLayout,
    inputs: &DecodedInputs,
    assignments: &SlotAssignments,
    background: ColorDef,
) -> BoothResult<FrameRGBA> {
    let plan = compile_plan(layout, assignments, inputs.photos.len(), background)?;
    CpuBackend::new().render_plan(&plan, inputs)
}

/// Composite plus the record handed to storage.
#[derive(Clone, Debug)]
pub struct CompositeOutput {
    /// Rendered pixels.
    pub frame: FrameRGBA,
    /// Session facts for persistence.
    pub summary: SessionSummary,
}

/// Decode everything the session references and composite it.
///
/// Fails only when there is no template or no captured photo. Individual decode failures are
/// logged and the affected layers skipped.
#[tracing::instrument(skip_all, fields(template, photos = state.capture.len()))]
pub fn render_session(
    state: &SessionState,
    decoder: &dyn ImageDecoder,
    config: &BoothConfig,
) -> BoothResult<CompositeOutput> {
    let template = state.template.as_ref().ok_or(BoothError::MissingTemplate)?;
    tracing::Span::current().record("template", template.id.as_str());
    if state.capture.is_empty() {
        return Err(BoothError::EmptyCaptureBuffer);
    }

    let layout = &template.layout;
    let canvas = layout.canvas()?;
    let overlay = template
        .image_url
        .as_ref()
        .map(|url| ImageSource::Path(PathBuf::from(url)));

    let pool = build_thread_pool(config.decode_threads)?;
    let inputs = pool.install(|| {
        decode_inputs(decoder, overlay.as_ref(), state.capture.photos(), canvas)
    });
    tracing::debug!(
        decoded = inputs.decoded_photo_count(),
        overlay = inputs.overlay.is_some(),
        "inputs decoded"
    );

    let frame = composite(
        layout,
        &inputs,
        &state.assignments,
        template.background_or(config.default_background),
    )?;
    let summary = state.summary()?;

    Ok(CompositeOutput { frame, summary })
}

fn build_thread_pool(threads: Option<usize>) -> BoothResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BoothError::validation(
            "decode 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BoothError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
