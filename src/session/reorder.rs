use crate::session::assign::SlotAssignments;

/// New position of the element at `idx` after moving `from` to `to` (remove, then insert).
///
/// Elements strictly between the two positions shift one step towards `from`.
pub fn remap_index(idx: usize, from: usize, to: usize) -> usize {
    if idx == from {
        to
    } else if from < to && idx > from && idx <= to {
        idx - 1
    } else if from > to && idx >= to && idx < from {
        idx + 1
    } else {
        idx
    }
}

/// Move the photo at `from` to `to` and rewrite `assignments` so every slot keeps showing the
/// same photo.
///
/// `from == to` and out-of-range positions are no-ops: the inputs are returned unchanged.
pub fn reorder<T: Clone>(
    photos: &[T],
    assignments: &SlotAssignments,
    from: usize,
    to: usize,
) -> (Vec<T>, SlotAssignments) {
    if from == to {
        return (photos.to_vec(), assignments.clone());
    }
    if from >= photos.len() || to >= photos.len() {
        tracing::debug!(from, to, len = photos.len(), "ignoring out-of-range reorder");
        return (photos.to_vec(), assignments.clone());
    }

    let mut moved = photos.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);

    let remapped = assignments.map_indices(|idx| remap_index(idx, from, to));
    (moved, remapped)
}

#[cfg(test)]
#[path = "../../tests/unit/session/reorder.rs"]
mod tests;
