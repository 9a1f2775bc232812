use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 128), 64);
    assert_eq!(mul_div255_u8(200, 255), 200);
}

#[test]
fn normalize_deg_wraps_full_turns() {
    assert_eq!(normalize_deg(135.0), 135.0);
    assert_eq!(normalize_deg(135.0 + 360.0), 135.0);
    assert_eq!(normalize_deg(-90.0), 270.0);
    assert_eq!(normalize_deg(720.0), 0.0);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 200).abs() <= 1);
    assert!((i32::from(px[1]) - 100).abs() <= 1);
    assert!((i32::from(px[2]) - 50).abs() <= 2);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
}
