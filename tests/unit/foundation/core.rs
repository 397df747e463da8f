use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(1080, 1920).unwrap();
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 1080.0, 1920.0));
}

#[test]
fn canvas_rejects_sizes_the_rasterizer_cannot_hold() {
    assert!(Canvas::new(Canvas::MAX_DIM, 1).is_ok());
    assert!(matches!(
        Canvas::new(70_000, 10),
        Err(BoothError::Validation(_))
    ));
    assert!(Canvas::new(10, Canvas::MAX_DIM + 1).is_err());
}

#[test]
fn premul_from_straight_matches_rounding() {
    let p = Rgba8Premul::from_straight_rgba(100, 50, 200, 128);
    assert_eq!(
        p.to_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8Premul::from_straight_rgba(9, 9, 9, 0).to_array(), [0, 0, 0, 0]);
}
