use super::*;
use crate::{
    assets::color::ColorDef,
    render::plan::compile_plan,
    session::assign::SlotAssignments,
    template::model::{LayerOrder, LayoutSlot, TemplateLayout},
};

fn slot(id: &str, rect: (f64, f64, f64, f64), take: usize, layer: LayerOrder) -> LayoutSlot {
    LayoutSlot {
        id: id.to_string(),
        x: rect.0,
        y: rect.1,
        width: rect.2,
        height: rect.3,
        target_take_index: Some(take),
        rotation: None,
        layer_order: layer,
    }
}

fn render(layout: &TemplateLayout, inputs: &DecodedInputs, bg: [u8; 4]) -> FrameRGBA {
    let bg = ColorDef::rgba(
        f64::from(bg[0]) / 255.0,
        f64::from(bg[1]) / 255.0,
        f64::from(bg[2]) / 255.0,
        f64::from(bg[3]) / 255.0,
    );
    let plan = compile_plan(layout, &SlotAssignments::new(), inputs.photos.len(), bg).unwrap();
    CpuBackend::new().render_plan(&plan, inputs).unwrap()
}

fn assert_near(px: [u8; 4], expected: [u8; 4]) {
    for (a, b) in px.iter().zip(expected.iter()) {
        assert!((i16::from(*a) - i16::from(*b)).abs() <= 3, "{px:?} != {expected:?}");
    }
}

/// Left half red, right half blue.
fn split_photo(w: u32, h: u32) -> PreparedImage {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            if x < w / 2 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    PreparedImage::from_premul_rgba8(w, h, data).unwrap()
}

#[test]
fn background_fills_canvas_exactly() {
    let layout = TemplateLayout {
        width: 8,
        height: 4,
        slots: vec![],
    };
    let frame = render(&layout, &DecodedInputs::default(), [10, 20, 30, 255]);
    assert_eq!((frame.width, frame.height), (8, 4));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 4 * 4);
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255])
    );
}

#[test]
fn slot_photos_are_mirrored() {
    let layout = TemplateLayout {
        width: 40,
        height: 20,
        slots: vec![slot("s", (0.0, 0.0, 40.0, 20.0), 0, LayerOrder::Bottom)],
    };
    let inputs = DecodedInputs {
        overlay: None,
        photos: vec![Some(split_photo(20, 10))],
    };
    let frame = render(&layout, &inputs, [0, 0, 0, 255]);
    assert_near(frame.pixel(5, 10).unwrap(), [0, 0, 255, 255]);
    assert_near(frame.pixel(34, 10).unwrap(), [255, 0, 0, 255]);
}

#[test]
fn cover_fit_leaves_no_background_inside_slot() {
    let layout = TemplateLayout {
        width: 40,
        height: 40,
        slots: vec![slot("s", (10.0, 5.0, 20.0, 30.0), 0, LayerOrder::Bottom)],
    };
    let inputs = DecodedInputs {
        overlay: None,
        photos: vec![Some(PreparedImage::solid(64, 16, [0, 255, 0, 255]).unwrap())],
    };
    let frame = render(&layout, &inputs, [0, 0, 0, 255]);
    for y in [6, 20, 33] {
        for x in [11, 20, 28] {
            assert_near(frame.pixel(x, y).unwrap(), [0, 255, 0, 255]);
        }
    }
    assert_eq!(frame.pixel(5, 20).unwrap(), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(35, 20).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn top_slot_covers_overlay_and_bottom_shows_only_through_transparency() {
    // Overlay columns (stretched x20): transparent | 50% green | 50% green.
    let overlay = PreparedImage::from_premul_rgba8(
        3,
        1,
        vec![0, 0, 0, 0, 0, 128, 0, 128, 0, 128, 0, 128],
    )
    .unwrap();
    let layout = TemplateLayout {
        width: 60,
        height: 20,
        slots: vec![
            slot("top", (40.0, 0.0, 20.0, 20.0), 1, LayerOrder::Top),
            slot("bottom", (0.0, 0.0, 60.0, 20.0), 0, LayerOrder::Bottom),
        ],
    };
    let inputs = DecodedInputs {
        overlay: Some(overlay),
        photos: vec![
            Some(PreparedImage::solid(6, 2, [255, 0, 0, 255]).unwrap()),
            Some(PreparedImage::solid(2, 2, [0, 0, 255, 255]).unwrap()),
        ],
    };
    let frame = render(&layout, &inputs, [0, 0, 0, 255]);

    // Overlay transparent: bottom photo visible as-is.
    assert_near(frame.pixel(4, 10).unwrap(), [255, 0, 0, 255]);
    // Overlay semi-opaque: bottom photo tinted by the overlay.
    let tinted = frame.pixel(30, 10).unwrap();
    assert!(tinted[0] > 90 && tinted[0] < 170, "{tinted:?}");
    assert!(tinted[1] > 90 && tinted[1] < 170, "{tinted:?}");
    // Top slot wins over both.
    assert_near(frame.pixel(50, 10).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn undecoded_photo_and_overlay_are_skipped() {
    let layout = TemplateLayout {
        width: 10,
        height: 10,
        slots: vec![slot("s", (0.0, 0.0, 10.0, 10.0), 0, LayerOrder::Bottom)],
    };
    let inputs = DecodedInputs {
        overlay: None,
        photos: vec![None],
    };
    let frame = render(&layout, &inputs, [1, 2, 3, 255]);
    assert!(frame.data.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
}

#[test]
fn oversized_images_skip_only_their_own_layer() {
    let layout = TemplateLayout {
        width: 20,
        height: 10,
        slots: vec![
            slot("ok", (0.0, 0.0, 10.0, 10.0), 0, LayerOrder::Bottom),
            slot("huge", (10.0, 0.0, 10.0, 10.0), 1, LayerOrder::Bottom),
        ],
    };
    let inputs = DecodedInputs {
        overlay: Some(PreparedImage::solid(1, 70_000, [255, 255, 255, 255]).unwrap()),
        photos: vec![
            Some(PreparedImage::solid(4, 4, [255, 0, 0, 255]).unwrap()),
            Some(PreparedImage::solid(70_000, 1, [0, 255, 0, 255]).unwrap()),
        ],
    };
    let frame = render(&layout, &inputs, [1, 2, 3, 255]);
    assert_eq!((frame.width, frame.height), (20, 10));
    assert_near(frame.pixel(5, 5).unwrap(), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(15, 5), Some([1, 2, 3, 255]));
}

#[test]
fn rotated_slot_turns_about_its_center() {
    // Portrait 20x40 slot turned 90 degrees lands as a 40x20 band across the middle.
    let mut turned = slot("s", (10.0, 0.0, 20.0, 40.0), 0, LayerOrder::Bottom);
    turned.rotation = Some(90.0);
    let layout = TemplateLayout {
        width: 40,
        height: 40,
        slots: vec![turned],
    };
    let inputs = DecodedInputs {
        overlay: None,
        photos: vec![Some(split_photo(40, 20))],
    };
    let frame = render(&layout, &inputs, [0, 0, 0, 255]);

    // Mirrored blue half ends up above the center, red half below.
    assert_near(frame.pixel(20, 13).unwrap(), [0, 0, 255, 255]);
    assert_near(frame.pixel(20, 27).unwrap(), [255, 0, 0, 255]);
    assert_near(frame.pixel(2, 14).unwrap(), [0, 0, 255, 255]);
    assert_near(frame.pixel(2, 26).unwrap(), [255, 0, 0, 255]);
    // The unrotated footprint's top edge is now background.
    assert_eq!(frame.pixel(20, 3), Some([0, 0, 0, 255]));
}

#[test]
fn rendering_is_deterministic() {
    let mut rotated = slot("s", (5.0, 5.0, 30.0, 20.0), 0, LayerOrder::Bottom);
    rotated.rotation = Some(12.5);
    let layout = TemplateLayout {
        width: 40,
        height: 30,
        slots: vec![rotated],
    };
    let inputs = DecodedInputs {
        overlay: Some(PreparedImage::solid(4, 4, [255, 255, 255, 64]).unwrap()),
        photos: vec![Some(split_photo(16, 9))],
    };
    let a = render(&layout, &inputs, [9, 9, 9, 255]);
    let b = render(&layout, &inputs, [9, 9, 9, 255]);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a, b);
}

#[test]
fn oversized_canvas_is_a_render_error() {
    let plan = CompositePlan {
        canvas: crate::foundation::core::Canvas {
            width: 70_000,
            height: 10,
        },
        ops: vec![],
    };
    let err = CpuBackend::new()
        .render_plan(&plan, &DecodedInputs::default())
        .unwrap_err();
    assert!(matches!(err, BoothError::Render(_)));
}
