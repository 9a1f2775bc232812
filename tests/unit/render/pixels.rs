use super::*;

#[test]
fn kernel_sums_to_one_in_q16() {
    for (radius, sigma) in [(1u32, 0.5f32), (3, 1.0), (12, 4.0)] {
        let k = gaussian_kernel_q16(radius, sigma).unwrap();
        assert_eq!(k.len(), (2 * radius + 1) as usize);
        assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    }
    assert_eq!(gaussian_kernel_q16(0, 0.0).unwrap(), vec![1 << 16]);
    assert!(gaussian_kernel_q16(2, 0.0).is_err());
}

#[test]
fn blur_sigma_0_is_identity() {
    let src = (0..4 * 3 * 4).map(|i| (i as u8).wrapping_mul(31)).collect::<Vec<_>>();
    assert_eq!(blur_rgba8_premul(&src, 4, 3, 0.0).unwrap(), src);
}

#[test]
fn blur_constant_image_is_identity() {
    let src = [10u8, 20, 30, 255].repeat(7 * 5);
    assert_eq!(blur_rgba8_premul(&src, 7, 5, 2.0).unwrap(), src);
}

#[test]
fn blur_spreads_a_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    let out = blur_rgba8_premul(&src, w, h, 1.0).unwrap();
    assert!(out[center + 3] < 255);
    let right = center + 4;
    assert!(out[right + 3] > 0);
}

#[test]
fn premul_over_opaque_src_replaces_dst() {
    assert_eq!(
        premul_over_px([10, 20, 30, 255], [1, 2, 3, 255]),
        [1, 2, 3, 255]
    );
    assert_eq!(
        premul_over_px([10, 20, 30, 255], [0, 0, 0, 0]),
        [10, 20, 30, 255]
    );
    let half = premul_over_px([200, 200, 200, 255], [0, 0, 0, 128]);
    assert_eq!(half[3], 255);
    assert!(half[0] > 95 && half[0] < 105);
}

#[test]
fn pixmap_conversion_checks_length() {
    assert!(pixmap_from_premul_bytes(&[0; 15], 2, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 16], 2, 2).is_ok());
    assert!(pixmap_from_premul_bytes(&[], 70_000, 0).is_err());
}

#[test]
fn blur_radius_follows_three_sigma() {
    assert_eq!(blur_radius_for_sigma(0.0), 0);
    assert_eq!(blur_radius_for_sigma(1.0), 3);
    assert_eq!(blur_radius_for_sigma(2.5), 8);
    assert_eq!(blur_radius_for_sigma(f64::NAN), 0);
}
