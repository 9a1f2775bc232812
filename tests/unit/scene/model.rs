use super::*;
use serde_json::json;

#[test]
fn localized_text_fallback_chain() {
    let mut m = BTreeMap::new();
    m.insert("de".to_owned(), "Hallo".to_owned());
    m.insert("en".to_owned(), "Hello".to_owned());
    m.insert("fr".to_owned(), "Bonjour".to_owned());
    let t = LocalizedText(m);

    assert_eq!(t.resolve("de"), Some("Hallo"));
    assert_eq!(t.resolve("ja"), Some("Hello"));

    let only_fr = LocalizedText::single("fr", "Bonjour");
    assert_eq!(only_fr.resolve("ja"), Some("Bonjour"));

    assert_eq!(LocalizedText::default().resolve("en"), None);
}

#[test]
fn scene_json_round_trips_through_defaults() {
    let scene = Scene::from_json(
        &json!({
            "background": {
                "type": "gradient",
                "kind": "linear",
                "angle_deg": 135.0,
                "stops": [
                    {"color": "#000", "position": 0.0},
                    {"color": "#fff", "position": 100.0}
                ]
            },
            "screenshot": {
                "source": "shot.png",
                "transform": {"scale": 0.7, "position": {"x_pct": 50.0, "y_pct": 60.0}}
            },
            "headline": {"text": {"en": "Hello World"}},
            "badges": [{"text": "New", "kind": "pill"}]
        })
        .to_string(),
    )
    .unwrap();

    let BackgroundSpec::Gradient(g) = &scene.background else {
        panic!("expected gradient background");
    };
    assert_eq!(g.stops.len(), 2);
    assert_eq!(g.angle_deg, 135.0);
    assert_eq!(scene.screenshot.transform.scale, 0.7);
    assert_eq!(scene.screenshot.transform.rotation_deg, 0.0);
    assert_eq!(scene.headline.text.resolve("en"), Some("Hello World"));
    assert_eq!(scene.badges[0].style, BadgeStyle::default());
    assert!(!scene.noise.enabled);
    assert_eq!(scene.bitmap_sources(), vec!["shot.png"]);
    scene.validate().unwrap();
}

#[test]
fn validate_rejects_malformed_values() {
    let mut scene = Scene::default();
    scene.validate().unwrap();

    scene.background = BackgroundSpec::Gradient(GradientSpec {
        kind: GradientKind::Linear,
        angle_deg: 0.0,
        stops: vec![GradientStop {
            color: Color::BLACK,
            position: 0.0,
        }],
    });
    assert!(scene.validate().is_err());

    let mut scene = Scene::default();
    scene.screenshot.transform.scale = 0.0;
    assert!(scene.validate().is_err());

    let mut scene = Scene::default();
    scene.noise.opacity = 1.5;
    assert!(scene.validate().is_err());
}

#[test]
fn image_background_lists_its_source_first() {
    let scene = Scene {
        background: BackgroundSpec::Image(ImageBackground {
            source: "bg.jpg".to_owned(),
            blur_px: 0.0,
            overlay_color: Color::BLACK,
            overlay_opacity: 0.0,
        }),
        screenshot: ScreenshotLayer {
            source: Some("shot.png".to_owned()),
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(scene.bitmap_sources(), vec!["bg.jpg", "shot.png"]);
}
