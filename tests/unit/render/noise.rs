use super::*;

fn opaque_red(n: usize) -> Vec<u8> {
    [255u8, 0, 0, 255].repeat(n)
}

#[test]
fn opacity_maps_to_rounded_alpha() {
    assert_eq!(noise_alpha(0.1), 26);
    assert_eq!(noise_alpha(0.0), 0);
    assert_eq!(noise_alpha(1.0), 255);
    assert_eq!(noise_alpha(4.0), 255);
}

#[test]
fn legacy_mode_replaces_every_pixel() {
    let mut data = opaque_red(64);
    apply_noise(&mut data, 0.1, NoiseMode::LegacyReplace, 7);
    for px in data.chunks_exact(4) {
        assert_eq!(px[3], 26);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert!(px[0] <= 26);
    }
}

#[test]
fn blend_mode_keeps_the_frame_opaque() {
    let mut data = opaque_red(64);
    apply_noise(&mut data, 0.1, NoiseMode::Blend, 7);
    for px in data.chunks_exact(4) {
        assert_eq!(px[3], 255);
        assert!(px[0] >= 229, "red should stay dominant, got {px:?}");
    }
}

#[test]
fn same_seed_gives_same_grain() {
    let mut a = opaque_red(32);
    let mut b = opaque_red(32);
    apply_noise(&mut a, 0.5, NoiseMode::Blend, 42);
    apply_noise(&mut b, 0.5, NoiseMode::Blend, 42);
    assert_eq!(a, b);
}

#[test]
fn parses_mode_names() {
    assert_eq!("blend".parse::<NoiseMode>().unwrap(), NoiseMode::Blend);
    assert_eq!(
        "Legacy".parse::<NoiseMode>().unwrap(),
        NoiseMode::LegacyReplace
    );
    assert!("sparkle".parse::<NoiseMode>().is_err());
}
