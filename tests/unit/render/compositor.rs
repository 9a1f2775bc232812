use super::*;
use crate::assets::cache::{BitmapCache, NoBitmaps};
use crate::assets::color::Color;
use crate::scene::model::{
    BackgroundSpec, GradientKind, GradientSpec, LocalizedText, NoiseSpec, ScreenshotLayer,
};

const SMALL: OutputResolution = OutputResolution::Custom {
    width: 100,
    height: 200,
};

fn solid(color: Color) -> Scene {
    Scene {
        background: BackgroundSpec::Solid { color },
        ..Scene::default()
    }
}

fn blue_bitmap(origin: Origin) -> Bitmap {
    Bitmap::from_rgba8_straight(10, 20, [0u8, 0, 255, 255].repeat(200))
        .unwrap()
        .with_origin(origin)
}

fn with_screenshot(source: &str) -> Scene {
    Scene {
        screenshot: ScreenshotLayer {
            source: Some(source.to_owned()),
            ..ScreenshotLayer::default()
        },
        ..solid(Color::WHITE)
    }
}

#[test]
fn solid_background_covers_the_frame() {
    let mut c = Compositor::default();
    let r = c
        .render(&solid(Color::from_rgba8(255, 0, 0, 255)), SMALL, "en", &NoBitmaps)
        .unwrap();
    assert_eq!((r.width, r.height), (100, 200));
    assert!(r.data.chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
    assert!(r.skipped.is_empty());
    assert!(!r.tainted);
}

#[test]
fn repeated_renders_are_byte_identical() {
    let mut cache = BitmapCache::new(".");
    cache.insert_decoded("shot.png", blue_bitmap(Origin::Local));
    let scene = with_screenshot("shot.png");
    let mut c = Compositor::default();
    let a = c.render(&scene, SMALL, "en", &cache).unwrap();
    let b = c.render(&scene, SMALL, "en", &cache).unwrap();
    assert_eq!(a, b);
}

#[test]
fn screenshot_is_centered_on_its_position() {
    let mut cache = BitmapCache::new(".");
    cache.insert_decoded("shot.png", blue_bitmap(Origin::Local));
    let mut c = Compositor::default();
    let r = c
        .render(&with_screenshot("shot.png"), SMALL, "en", &cache)
        .unwrap();
    assert_eq!(r.pixel(50, 100), Some([0, 0, 255, 255]));
    assert_eq!(r.pixel(5, 5), Some([255, 255, 255, 255]));
    assert_eq!(r.pixel(50, 115), Some([255, 255, 255, 255]));
}

#[test]
fn missing_bitmap_skips_only_that_layer() {
    let mut c = Compositor::default();
    let r = c
        .render(&with_screenshot("later.png"), SMALL, "en", &NoBitmaps)
        .unwrap();
    assert!(r.was_skipped(LayerKind::Screenshot));
    assert_eq!(r.pixel(50, 100), Some([255, 255, 255, 255]));
}

#[test]
fn cross_origin_bitmap_taints_the_frame() {
    let mut cache = BitmapCache::new(".");
    cache.insert_decoded("remote", blue_bitmap(Origin::CrossOrigin));
    let mut c = Compositor::default();
    let r = c
        .render(&with_screenshot("remote"), SMALL, "en", &cache)
        .unwrap();
    assert!(r.tainted);
}

#[test]
fn text_without_fonts_is_skipped_not_failed() {
    let mut scene = solid(Color::WHITE);
    scene.headline.text = LocalizedText::single("en", "Hello");
    let mut c = Compositor::default();
    let r = c.render(&scene, SMALL, "de", &NoBitmaps).unwrap();
    assert!(r.was_skipped(LayerKind::Headline));
    assert!(!r.was_skipped(LayerKind::Subheadline));
}

#[test]
fn legacy_noise_overwrites_the_frame() {
    let mut scene = solid(Color::from_rgba8(255, 0, 0, 255));
    scene.noise = NoiseSpec {
        enabled: true,
        opacity: 0.1,
    };
    let opts = CompositorOpts::default()
        .with_noise_mode(NoiseMode::LegacyReplace)
        .with_noise_seed(Some(3));
    let mut c = Compositor::new(opts);
    let r = c.render(&scene, SMALL, "en", &NoBitmaps).unwrap();
    for px in r.data.chunks_exact(4) {
        assert_eq!(px[3], 26);
        assert_eq!(px[0], px[2], "no red may survive: {px:?}");
    }
}

#[test]
fn seeded_blend_noise_is_reproducible() {
    let mut scene = solid(Color::WHITE);
    scene.noise = NoiseSpec {
        enabled: true,
        opacity: 0.3,
    };
    let opts = CompositorOpts::default().with_noise_seed(Some(11));
    let a = Compositor::new(opts)
        .render(&scene, SMALL, "en", &NoBitmaps)
        .unwrap();
    let b = Compositor::new(opts)
        .render(&scene, SMALL, "en", &NoBitmaps)
        .unwrap();
    assert_eq!(a.data, b.data);
    assert!(a.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn resizes_between_resolutions() {
    let mut c = Compositor::default();
    let scene = solid(Color::BLACK);
    let a = c.render(&scene, SMALL, "en", &NoBitmaps).unwrap();
    let b = c
        .render(
            &scene,
            OutputResolution::Custom {
                width: 30,
                height: 40,
            },
            "en",
            &NoBitmaps,
        )
        .unwrap();
    assert_eq!(a.data.len(), 100 * 200 * 4);
    assert_eq!(b.data.len(), 30 * 40 * 4);
}

#[test]
fn malformed_scene_still_renders() {
    let mut scene = solid(Color::WHITE);
    scene.screenshot.transform.scale = 0.0;
    scene.background = BackgroundSpec::Gradient(GradientSpec {
        kind: GradientKind::Linear,
        angle_deg: 0.0,
        stops: Vec::new(),
    });
    let raster = Compositor::default()
        .render(&scene, SMALL, "en", &NoBitmaps)
        .unwrap();
    assert!(raster.data.iter().all(|&b| b == 0));
}
