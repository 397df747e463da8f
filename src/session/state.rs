use std::sync::Arc;

use crate::{
    assets::store::ImageSource,
    foundation::error::{BoothError, BoothResult},
    session::{
        assign::{SlotAssignments, auto_assign},
        capture::CaptureBuffer,
    },
    template::model::Template,
};

/// Screen the booth is on. The core only tracks it; routing lives elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoothStep {
    /// Idle attract screen.
    #[default]
    Landing,
    /// Choosing a template.
    TemplateSelection,
    /// Waiting on payment or free quota.
    PaymentGate,
    /// Capturing photos.
    Camera,
    /// Assigning photos to slots.
    PhotoSelection,
    /// Showing the composite.
    Result,
    /// Static about page.
    About,
}

/// A discrete state transition.
#[derive(Clone, Debug)]
pub enum Action {
    /// Navigate to a step.
    SetStep(BoothStep),
    /// Select a template. Assignments from a different template are dropped.
    SetTemplate(Arc<Template>),
    /// Append a captured photo.
    AddPhoto(ImageSource),
    /// End capture, auto-assign slots if none are assigned, and move to photo selection.
    FinishCapture,
    /// Point one slot at one photo.
    AssignSlot {
        /// Slot id in the selected template.
        slot_id: String,
        /// Photo index in the capture buffer.
        photo_index: usize,
    },
    /// Fill the assignment map from template defaults when it is empty.
    AutoAssignSlots,
    /// Move one photo within the capture buffer.
    ReorderPhotos {
        /// Current position.
        from: usize,
        /// New position.
        to: usize,
    },
    /// Count one completed session.
    IncrementSessionCount,
    /// Discard photos, assignments and template; return to the landing screen.
    ResetSession,
}

/// State of the single active booth session.
///
/// Transitions go through [`reduce`], which never mutates its input.
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Current screen.
    pub step: BoothStep,
    /// Completed sessions since startup (survives resets).
    pub session_count: u64,
    /// Selected template.
    pub template: Option<Arc<Template>>,
    /// Captured photos.
    pub capture: CaptureBuffer,
    /// Slot to photo mapping.
    pub assignments: SlotAssignments,
}

impl SessionState {
    /// Fresh state capturing up to `photos_per_session` photos.
    pub fn new(photos_per_session: usize) -> Self {
        Self {
            step: BoothStep::Landing,
            session_count: 0,
            template: None,
            capture: CaptureBuffer::new(photos_per_session),
            assignments: SlotAssignments::new(),
        }
    }

    /// Apply `action`, returning the next state. See [`reduce`].
    pub fn reduce(&self, action: Action) -> BoothResult<Self> {
        reduce(self, action)
    }

    /// Summary handed to the persistence collaborator after compositing.
    pub fn summary(&self) -> BoothResult<SessionSummary> {
        let template = self.template.as_ref().ok_or(BoothError::MissingTemplate)?;
        Ok(SessionSummary {
            template_id: template.id.clone(),
            photo_count: self.capture.len(),
            assignments: self.assignments.clone(),
            width: template.layout.width,
            height: template.layout.height,
        })
    }
}

/// Data emitted alongside the composite for storage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Template used.
    pub template_id: String,
    /// Number of captured photos.
    pub photo_count: usize,
    /// Final slot assignments.
    pub assignments: SlotAssignments,
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
}

/// Pure reducer: compute the state that follows `action`.
///
/// Rejected actions return an error and leave `state` untouched. Out-of-range reorders are not
/// errors; they leave the state unchanged.
pub fn reduce(state: &SessionState, action: Action) -> BoothResult<SessionState> {
    let mut next = state.clone();
    match action {
        Action::SetStep(step) => next.step = step,
        Action::SetTemplate(template) => {
            let same = state.template.as_ref().is_some_and(|t| t.id == template.id);
            if !same {
                next.assignments.clear();
            }
            let expected = template.layout.expected_photo_count();
            if expected > next.capture.capacity() {
                tracing::warn!(
                    template = %template.id,
                    expected,
                    capacity = next.capture.capacity(),
                    "template references more takes than a session captures; extra slots reuse the last photo"
                );
            }
            next.template = Some(template);
        }
        Action::AddPhoto(photo) => next.capture.push(photo)?,
        Action::FinishCapture => {
            next.capture.finish();
            fill_if_empty(&mut next);
            next.step = BoothStep::PhotoSelection;
        }
        Action::AssignSlot {
            slot_id,
            photo_index,
        } => {
            let template = state.template.as_ref().ok_or(BoothError::MissingTemplate)?;
            if template.layout.slot(&slot_id).is_none() {
                return Err(BoothError::validation(format!(
                    "unknown slot \"{slot_id}\" for template \"{}\"",
                    template.id
                )));
            }
            if photo_index >= state.capture.len() {
                return Err(BoothError::validation(format!(
                    "photo index {photo_index} out of range ({} photos)",
                    state.capture.len()
                )));
            }
            next.assignments.assign(slot_id, photo_index);
        }
        Action::AutoAssignSlots => fill_if_empty(&mut next),
        Action::ReorderPhotos { from, to } => {
            if !state.capture.is_finished() {
                return Err(BoothError::capture(
                    "photos can only be reordered after capture has finished",
                ));
            }
            next.assignments = next.capture.move_photo(from, to, &state.assignments);
        }
        Action::IncrementSessionCount => next.session_count += 1,
        Action::ResetSession => {
            next = SessionState::new(state.capture.capacity());
            next.session_count = state.session_count;
        }
    }
    Ok(next)
}

fn fill_if_empty(state: &mut SessionState) {
    if !state.assignments.is_empty() {
        return;
    }
    if let Some(template) = &state.template {
        state.assignments = auto_assign(&template.layout, state.capture.len());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
