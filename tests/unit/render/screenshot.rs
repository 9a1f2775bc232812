use super::*;
use crate::scene::model::{BorderSpec, ShadowSpec};

fn kinds(ops: &[ScreenshotOp]) -> Vec<&'static str> {
    ops.iter()
        .map(|op| match op {
            ScreenshotOp::Transform(_) => "transform",
            ScreenshotOp::SetShadow(_) => "set_shadow",
            ScreenshotOp::ClipRoundedRect { .. } => "clip",
            ScreenshotOp::DrawBitmap { .. } => "draw",
            ScreenshotOp::PopClip => "pop_clip",
            ScreenshotOp::ClearShadow => "clear_shadow",
            ScreenshotOp::StrokeBorder { .. } => "border",
        })
        .collect()
}

#[test]
fn oversized_radius_clamps_to_half_the_short_side() {
    assert_eq!(clamp_corner_radius(9999.0, 300.0, 600.0), 150.0);
    assert_eq!(clamp_corner_radius(24.0, 300.0, 600.0), 24.0);
    assert_eq!(clamp_corner_radius(-5.0, 300.0, 600.0), 0.0);
}

#[test]
fn plain_screenshot_is_transform_draw_clear() {
    let t = ScreenshotTransform::default();
    let ops = plan_screenshot(&t, Point::new(100.0, 200.0), 300.0, 600.0);
    assert_eq!(kinds(&ops), ["transform", "draw", "clear_shadow"]);
}

#[test]
fn full_sequence_orders_shadow_clip_draw_then_border() {
    let t = ScreenshotTransform {
        corner_radius_px: 9999.0,
        shadow: ShadowSpec {
            enabled: true,
            ..ShadowSpec::default()
        },
        border: BorderSpec {
            enabled: true,
            ..BorderSpec::default()
        },
        ..ScreenshotTransform::default()
    };
    let ops = plan_screenshot(&t, Point::new(0.0, 0.0), 300.0, 600.0);
    assert_eq!(
        kinds(&ops),
        [
            "transform",
            "set_shadow",
            "clip",
            "draw",
            "pop_clip",
            "clear_shadow",
            "border"
        ]
    );
    let ScreenshotOp::ClipRoundedRect { radius, .. } = ops[2] else {
        panic!("expected clip");
    };
    assert_eq!(radius, 150.0);
}

#[test]
fn border_never_carries_the_shadow() {
    let t = ScreenshotTransform {
        shadow: ShadowSpec {
            enabled: true,
            ..ShadowSpec::default()
        },
        border: BorderSpec {
            enabled: true,
            ..BorderSpec::default()
        },
        ..ScreenshotTransform::default()
    };
    let ops = plan_screenshot(&t, Point::ORIGIN, 10.0, 10.0);
    let clear = ops
        .iter()
        .position(|op| matches!(op, ScreenshotOp::ClearShadow))
        .unwrap();
    let border = ops
        .iter()
        .position(|op| matches!(op, ScreenshotOp::StrokeBorder { .. }))
        .unwrap();
    assert!(clear < border);
}

#[test]
fn draw_rect_is_centered_and_scaled() {
    let t = ScreenshotTransform {
        scale: 0.5,
        rotation_deg: 90.0,
        ..ScreenshotTransform::default()
    };
    let ops = plan_screenshot(&t, Point::new(50.0, 60.0), 200.0, 400.0);
    let ScreenshotOp::Transform(a) = ops[0] else {
        panic!("expected transform");
    };
    let moved = a * Point::new(10.0, 0.0);
    assert!((moved.x - 50.0).abs() < 1e-9);
    assert!((moved.y - 70.0).abs() < 1e-9);
    let ScreenshotOp::DrawBitmap { rect, scale } = ops[1] else {
        panic!("expected draw");
    };
    assert_eq!(scale, 0.5);
    assert_eq!(rect, Rect::new(-50.0, -100.0, 50.0, 100.0));
}
