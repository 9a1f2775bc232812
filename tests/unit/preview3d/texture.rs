use super::*;

fn checker() -> Bitmap {
    // 2x1: black, white.
    Bitmap::from_rgba8_straight(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap()
}

#[test]
fn samples_texel_centers_exactly() {
    let t = Texture::from_bitmap(&checker());
    assert_eq!(t.sample(Vec2::new(0.25, 0.5)), Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(t.sample(Vec2::new(0.75, 0.5)), Vec4::ONE);
}

#[test]
fn filters_between_texels() {
    let t = Texture::from_bitmap(&checker());
    let mid = t.sample(Vec2::new(0.5, 0.5));
    assert!((mid.x - 0.5).abs() < 1e-6);
    assert_eq!(mid.w, 1.0);
}

#[test]
fn clamps_outside_the_unit_square() {
    let t = Texture::from_bitmap(&checker());
    assert_eq!(t.sample(Vec2::new(-3.0, 9.0)), Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(t.sample(Vec2::new(4.0, -1.0)), Vec4::ONE);
}

#[test]
fn rebuilds_only_when_the_source_changes() {
    let mut slot = TextureSlot::new();
    let b = checker();
    assert!(slot.sync("a.png", &b));
    assert!(!slot.sync("a.png", &b));
    assert_eq!((slot.uploads(), slot.disposals()), (1, 0));

    assert!(slot.sync("b.png", &b));
    assert_eq!((slot.uploads(), slot.disposals()), (2, 1));
    assert_eq!(slot.source(), Some("b.png"));

    slot.dispose();
    assert!(slot.texture().is_none());
    assert_eq!(slot.disposals(), 2);
}

#[test]
fn new_bitmap_under_same_source_rebuilds() {
    let mut slot = TextureSlot::new();
    let red = Bitmap::from_rgba8_straight(1, 1, vec![255, 0, 0, 255]).unwrap();
    let blue = Bitmap::from_rgba8_straight(1, 1, vec![0, 0, 255, 255]).unwrap();
    assert!(slot.sync("shot.png", &red));
    assert!(slot.sync("shot.png", &blue));
    assert_eq!((slot.uploads(), slot.disposals()), (2, 1));
    let texel = slot.texture().unwrap().sample(Vec2::splat(0.5));
    assert_eq!(texel, Vec4::new(0.0, 0.0, 1.0, 1.0));

    // A clone shares the pixels, so it is the same texture.
    assert!(!slot.sync("shot.png", &blue.clone()));
    assert_eq!(slot.uploads(), 2);
}
