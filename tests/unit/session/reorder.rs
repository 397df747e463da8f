use super::*;

fn assignments(pairs: &[(&str, usize)]) -> SlotAssignments {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Photo identity each slot shows, resolved through the buffer.
fn visual(photos: &[&'static str], map: &SlotAssignments) -> Vec<(String, &'static str)> {
    map.iter()
        .map(|(slot, idx)| (slot.to_string(), photos[idx]))
        .collect()
}

#[test]
fn single_slot_follows_photo_moved_forward() {
    let photos = ["p0", "p1", "p2"];
    let map = assignments(&[("slot1", 0)]);
    let (moved, remapped) = reorder(&photos, &map, 0, 2);
    assert_eq!(moved, vec!["p1", "p2", "p0"]);
    assert_eq!(remapped, assignments(&[("slot1", 2)]));
}

#[test]
fn backward_move_shifts_range_up() {
    let photos = ["p0", "p1", "p2", "p3"];
    let map = assignments(&[("a", 0), ("b", 1), ("c", 2), ("d", 3)]);
    let (moved, remapped) = reorder(&photos, &map, 3, 1);
    assert_eq!(moved, vec!["p0", "p3", "p1", "p2"]);
    assert_eq!(
        remapped,
        assignments(&[("a", 0), ("b", 2), ("c", 3), ("d", 1)])
    );
}

#[test]
fn every_move_preserves_visual_content() {
    let photos = ["p0", "p1", "p2", "p3", "p4"];
    // Duplicates and an unused photo (p4) on purpose.
    let map = assignments(&[("a", 0), ("b", 0), ("c", 3), ("d", 1), ("e", 2)]);
    let before = visual(&photos, &map);

    for from in 0..photos.len() {
        for to in 0..photos.len() {
            let (moved, remapped) = reorder(&photos, &map, from, to);
            assert_eq!(visual(&moved, &remapped), before, "move {from} -> {to}");
        }
    }
}

#[test]
fn same_position_is_noop() {
    let photos = ["p0", "p1", "p2"];
    let map = assignments(&[("a", 2), ("b", 0)]);
    for i in 0..photos.len() {
        let (moved, remapped) = reorder(&photos, &map, i, i);
        assert_eq!(moved, photos.to_vec());
        assert_eq!(remapped, map);
    }
}

#[test]
fn out_of_range_is_noop() {
    let photos = ["p0", "p1", "p2"];
    let map = assignments(&[("a", 1)]);
    assert_eq!(reorder(&photos, &map, 3, 0), (photos.to_vec(), map.clone()));
    assert_eq!(reorder(&photos, &map, 0, 3), (photos.to_vec(), map.clone()));

    let empty: [&str; 0] = [];
    assert_eq!(reorder(&empty, &map, 0, 1), (Vec::new(), map.clone()));
}

#[test]
fn round_trip_restores_order_and_content() {
    let photos = ["p0", "p1", "p2", "p3"];
    let map = assignments(&[("a", 3), ("b", 3), ("c", 0)]);
    for a in 0..photos.len() {
        for b in 0..photos.len() {
            let (once, m1) = reorder(&photos, &map, a, b);
            let (twice, m2) = reorder(&once, &m1, b, a);
            assert_eq!(twice, photos.to_vec());
            assert_eq!(visual(&twice, &m2), visual(&photos, &map));
        }
    }
}

#[test]
fn remap_leaves_indices_outside_range_alone() {
    assert_eq!(remap_index(0, 1, 3), 0);
    assert_eq!(remap_index(4, 1, 3), 4);
    assert_eq!(remap_index(0, 3, 1), 0);
    assert_eq!(remap_index(4, 3, 1), 4);
}
