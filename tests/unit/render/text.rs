use super::*;
use crate::scene::model::LocalizedText;

/// Every character is 10px wide.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

fn canvas() -> Canvas {
    Canvas::new(1000, 2000).unwrap()
}

fn style(alignment: TextAlign, anchor_edge: AnchorEdge) -> TextStyle {
    TextStyle {
        size_px: 100.0,
        line_height_multiplier: 1.2,
        max_width_pct: 80.0,
        offset_y_px: 160.0,
        alignment,
        anchor_edge,
        ..TextStyle::default()
    }
}

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn wraps_at_the_word_that_overflows() {
    let lines = wrap_words("Hello World", 100.0, &mut FixedAdvance);
    assert_eq!(lines, ["Hello", "World"]);
}

#[test]
fn fits_on_one_line_when_wide_enough() {
    let lines = wrap_words("Hello World", 110.0, &mut FixedAdvance);
    assert_eq!(lines, ["Hello World"]);
}

#[test]
fn oversized_word_is_never_split() {
    let lines = wrap_words("a supercalifragilistic b", 50.0, &mut FixedAdvance);
    assert_eq!(lines, ["a", "supercalifragilistic", "b"]);
}

#[test]
fn wrapped_lines_respect_the_limit() {
    let text = "the quick brown fox jumps over the lazy dog and keeps running far away";
    for max in [40.0, 90.0, 130.0, 250.0] {
        for line in wrap_words(text, max, &mut FixedAdvance) {
            let single_word = !line.contains(' ');
            assert!(single_word || FixedAdvance.measure(&line) <= max, "{line:?} > {max}");
        }
    }
}

#[test]
fn newlines_start_new_paragraphs() {
    let lines = wrap_words("One\nTwo three", 1000.0, &mut FixedAdvance);
    assert_eq!(lines, ["One", "Two three"]);
}

#[test]
fn trailing_newlines_add_no_lines() {
    let lines = wrap_words("Hello\n\n", 1000.0, &mut FixedAdvance);
    assert_eq!(lines, ["Hello"]);
    let inner = wrap_words("A\n\nB", 1000.0, &mut FixedAdvance);
    assert_eq!(inner, ["A", "", "B"]);
    assert!(wrap_words("\n", 1000.0, &mut FixedAdvance).is_empty());

    let s = style(TextAlign::Center, AnchorEdge::Bottom);
    let pts = place_lines(&s, canvas(), &[50.0]);
    approx(pts[0].y + line_advance(&s), 2000.0 - 160.0);
}

#[test]
fn horizontal_anchor_follows_alignment() {
    let c = canvas();
    approx(anchor_x(TextAlign::Left, c, 800.0), 100.0);
    approx(anchor_x(TextAlign::Center, c, 800.0), 500.0);
    approx(anchor_x(TextAlign::Right, c, 800.0), 900.0);
}

#[test]
fn line_x_depends_on_alignment() {
    let widths = [200.0];
    approx(place_lines(&style(TextAlign::Left, AnchorEdge::Top), canvas(), &widths)[0].x, 100.0);
    approx(place_lines(&style(TextAlign::Center, AnchorEdge::Top), canvas(), &widths)[0].x, 400.0);
    approx(place_lines(&style(TextAlign::Right, AnchorEdge::Top), canvas(), &widths)[0].x, 700.0);
}

#[test]
fn top_anchor_starts_at_offset_and_advances_by_line_height() {
    let pts = place_lines(&style(TextAlign::Center, AnchorEdge::Top), canvas(), &[100.0, 100.0]);
    approx(pts[0].y, 160.0);
    approx(pts[1].y, 280.0);
}

#[test]
fn bottom_anchor_grows_upward_from_the_offset() {
    let s = style(TextAlign::Center, AnchorEdge::Bottom);
    let pts = place_lines(&s, canvas(), &[100.0, 100.0]);
    approx(pts[0].y, 1600.0);
    approx(pts[1].y, 1720.0);
    approx(pts[1].y + line_advance(&s), 2000.0 - 160.0);
}

#[test]
fn missing_language_falls_back_then_renders_nothing() {
    let mut text = LocalizedText::single("de", "Hallo");
    assert_eq!(text.resolve("fr"), Some("Hallo"));
    text.0.clear();
    assert_eq!(text.resolve("fr"), None);
}

#[test]
fn font_request_carries_style() {
    let s = TextStyle {
        font_family: "Inter".to_owned(),
        weight: 600.0,
        size_px: 48.0,
        letter_spacing: 1.5,
        ..TextStyle::default()
    };
    let req = font_request(&s);
    assert_eq!(req.family, "Inter");
    assert_eq!(req.weight, 600.0);
    assert_eq!(req.size_px, 48.0);
    assert_eq!(req.letter_spacing, 1.5);
}
