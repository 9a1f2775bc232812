use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(1290, 2796).unwrap();
    assert_eq!(c.rgba_len(), 1290 * 2796 * 4);
    assert_eq!(c.as_u16().unwrap(), (1290, 2796));
}

#[test]
fn premul_from_straight_rounds() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 64);
    assert_eq!(p.b, 0);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
