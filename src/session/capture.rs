use crate::{
    assets::store::ImageSource,
    foundation::error::{BoothError, BoothResult},
    session::{assign::SlotAssignments, reorder::reorder},
};

/// Ordered photos captured in one session.
///
/// Append-only (at the end) while capturing, up to `capacity`; reorderable once capture has
/// finished.
#[derive(Clone, Debug)]
pub struct CaptureBuffer {
    photos: Vec<ImageSource>,
    capacity: usize,
    finished: bool,
}

impl CaptureBuffer {
    /// Empty buffer accepting up to `capacity` photos.
    pub fn new(capacity: usize) -> Self {
        Self {
            photos: Vec::with_capacity(capacity),
            capacity,
            finished: false,
        }
    }

    /// Finished buffer holding `photos` (e.g. restored from storage).
    pub fn from_photos(photos: Vec<ImageSource>) -> Self {
        Self {
            capacity: photos.len(),
            photos,
            finished: true,
        }
    }

    /// Append a photo at the end.
    pub fn push(&mut self, photo: ImageSource) -> BoothResult<()> {
        if self.finished {
            return Err(BoothError::capture("capture already finished"));
        }
        if self.is_full() {
            return Err(BoothError::capture(format!(
                "capture buffer is full ({} photos)",
                self.capacity
            )));
        }
        self.photos.push(photo);
        Ok(())
    }

    /// End the capture phase; further appends are rejected.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Return `true` once capture has finished.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Return `true` when no more photos fit.
    pub fn is_full(&self) -> bool {
        self.photos.len() >= self.capacity
    }

    /// Maximum number of photos.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of captured photos.
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Return `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Captured photos in order.
    pub fn photos(&self) -> &[ImageSource] {
        &self.photos
    }

    /// Move the photo at `from` to `to`, returning the rewritten assignments.
    ///
    /// Out-of-range or identical positions leave both unchanged.
    pub fn move_photo(
        &mut self,
        from: usize,
        to: usize,
        assignments: &SlotAssignments,
    ) -> SlotAssignments {
        let (photos, remapped) = reorder(&self.photos, assignments, from, to);
        self.photos = photos;
        remapped
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/capture.rs"]
mod tests;
