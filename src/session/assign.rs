use std::collections::BTreeMap;

use crate::template::model::{LayoutSlot, TemplateLayout};

/// Mapping from slot id to a photo index in the capture buffer.
///
/// Many slots may share a photo; a photo may be unused. Keys are kept sorted so iteration and
/// serialization are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SlotAssignments(BTreeMap<String, usize>);

impl SlotAssignments {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Photo index assigned to `slot_id`, if any.
    pub fn get(&self, slot_id: &str) -> Option<usize> {
        self.0.get(slot_id).copied()
    }

    /// Point `slot_id` at `photo_index`, returning the previous value.
    pub fn assign(&mut self, slot_id: impl Into<String>, photo_index: usize) -> Option<usize> {
        self.0.insert(slot_id.into(), photo_index)
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no slot is assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop every assignment.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate `(slot_id, photo_index)` pairs in slot-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Rewrite every photo index through `f`, keeping slot ids.
    pub fn map_indices(&self, mut f: impl FnMut(usize) -> usize) -> Self {
        Self(self.0.iter().map(|(k, v)| (k.clone(), f(*v))).collect())
    }

    /// How many slots show each photo, for `photo_count` photos.
    ///
    /// Stale indices (`>= photo_count`) are not counted.
    pub fn usage_counts(&self, photo_count: usize) -> Vec<usize> {
        let mut counts = vec![0; photo_count];
        for (_, idx) in self.iter() {
            if let Some(c) = counts.get_mut(idx) {
                *c += 1;
            }
        }
        counts
    }
}

impl FromIterator<(String, usize)> for SlotAssignments {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build the default assignment map for `layout` given `photo_count` captured photos.
///
/// Every slot gets an entry: its `targetTakeIndex` (or its position when unset) clamped to
/// `[0, max(0, photo_count - 1)]`. With zero photos every slot maps to `0`, which the
/// compositor treats as "no image".
pub fn auto_assign(layout: &TemplateLayout, photo_count: usize) -> SlotAssignments {
    let max_index = photo_count.saturating_sub(1);
    layout
        .slots
        .iter()
        .enumerate()
        .map(|(pos, slot)| (slot.id.clone(), slot.default_take_index(pos).min(max_index)))
        .collect()
}

/// Photo index the compositor should draw for `slot` (declared at `position`).
///
/// Uses the explicit assignment when it is in range, else the slot's default take when that is
/// in range, else photo `0`. Returns `None` when there are no photos at all.
pub fn resolve_photo_index(
    slot: &LayoutSlot,
    position: usize,
    assignments: &SlotAssignments,
    photo_count: usize,
) -> Option<usize> {
    if photo_count == 0 {
        return None;
    }
    match assignments.get(&slot.id) {
        Some(idx) if idx < photo_count => return Some(idx),
        Some(idx) => {
            tracing::warn!(slot = %slot.id, index = idx, photo_count, "stale slot assignment; falling back to default take");
        }
        None => {}
    }
    let fallback = slot.default_take_index(position);
    Some(if fallback < photo_count { fallback } else { 0 })
}

#[cfg(test)]
#[path = "../../tests/unit/session/assign.rs"]
mod tests;
