use super::*;

fn req() -> FontRequest {
    FontRequest {
        family: "Inter".to_owned(),
        weight: 700.0,
        size_px: 48.0,
        letter_spacing: 0.0,
    }
}

#[test]
fn engine_without_fonts_is_not_ready() {
    let mut engine = TextEngine::new();
    assert!(!engine.has_fonts());
    assert!(engine.families().next().is_none());
    assert!(engine.measure_line("Hello", &req()).unwrap().is_none());

    let mut m = EngineMeasure {
        engine: &mut engine,
        req: &req(),
    };
    assert_eq!(m.measure("Hello"), 0.0);
}

#[test]
fn invalid_size_is_rejected() {
    let mut engine = TextEngine::new();
    let mut r = req();
    r.size_px = 0.0;
    assert!(engine.measure_line("x", &r).is_err());
}

#[test]
fn garbage_font_bytes_do_not_register() {
    let mut engine = TextEngine::new();
    assert!(engine.register_font(b"definitely not a font".to_vec()).is_err());
    assert!(!engine.has_fonts());
}
