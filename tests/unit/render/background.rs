use super::*;

fn c(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn stop(hex: &str, position: f64) -> GradientStop {
    GradientStop {
        color: Color::from_hex(hex).unwrap(),
        position,
    }
}

#[test]
fn zero_degrees_runs_top_to_bottom() {
    let (p0, p1) = linear_endpoints(0.0, c(100, 200));
    assert!((p0.x - 50.0).abs() < 1e-9);
    assert!((p0.y - -100.0).abs() < 1e-9);
    assert!((p1.x - 50.0).abs() < 1e-9);
    assert!((p1.y - 300.0).abs() < 1e-9);

    let g = GradientSpec {
        kind: GradientKind::Linear,
        angle_deg: 0.0,
        stops: vec![stop("#000000", 0.0), stop("#ffffff", 100.0)],
    };
    let px = gradient_pixels(&g, c(4, 40));
    let top = px[0];
    let bottom = px[px.len() - 4];
    assert!(top < bottom);
}

#[test]
fn full_turns_render_identically() {
    let canvas = c(24, 48);
    for angle in [0.0, 45.0, 135.0, 222.5, 359.0] {
        let a = GradientSpec {
            kind: GradientKind::Linear,
            angle_deg: angle,
            stops: vec![stop("#000000", 0.0), stop("#ff8800", 40.0), stop("#ffffff", 100.0)],
        };
        let mut b = a.clone();
        b.angle_deg = angle + 360.0;
        let mut neg = a.clone();
        neg.angle_deg = angle - 720.0;
        let pa = gradient_pixels(&a, canvas);
        assert_eq!(pa, gradient_pixels(&b, canvas));
        assert_eq!(pa, gradient_pixels(&neg, canvas));
    }
}

#[test]
fn unordered_stops_match_sorted_stops() {
    let canvas = c(16, 32);
    let unordered = GradientSpec {
        kind: GradientKind::Linear,
        angle_deg: 135.0,
        stops: vec![stop("#f00", 50.0), stop("#00f", 0.0), stop("#0f0", 100.0)],
    };
    let sorted = GradientSpec {
        stops: vec![stop("#00f", 0.0), stop("#f00", 50.0), stop("#0f0", 100.0)],
        ..unordered.clone()
    };
    assert_eq!(
        sorted_stops(&unordered.stops),
        sorted_stops(&sorted.stops)
    );
    assert_eq!(
        gradient_pixels(&unordered, canvas),
        gradient_pixels(&sorted, canvas)
    );

    let radial_a = GradientSpec {
        kind: GradientKind::Radial,
        ..unordered
    };
    let radial_b = GradientSpec {
        kind: GradientKind::Radial,
        ..sorted
    };
    assert_eq!(
        gradient_pixels(&radial_a, canvas),
        gradient_pixels(&radial_b, canvas)
    );
}

#[test]
fn radial_is_centered_with_half_max_side_radius() {
    let canvas = c(20, 40);
    let g = GradientSpec {
        kind: GradientKind::Radial,
        angle_deg: 0.0,
        stops: vec![stop("#ffffff", 0.0), stop("#000000", 100.0)],
    };
    let px = gradient_pixels(&g, canvas);
    let at = |x: usize, y: usize| px[(y * 20 + x) * 4];
    assert!(at(10, 20) > 240);
    // Top-center is exactly one radius away.
    assert!(at(10, 0) < 10);
    assert!(at(0, 20) > at(0, 0));
}

#[test]
fn sample_stops_pads_and_interpolates() {
    let stops = sorted_stops(&[stop("#000000", 20.0), stop("#ffffff", 80.0)]);
    assert_eq!(sample_stops(&stops, 0.0).to_rgba8(), [0, 0, 0, 255]);
    assert_eq!(sample_stops(&stops, 1.0).to_rgba8(), [255, 255, 255, 255]);
    assert_eq!(sample_stops(&stops, 0.5).to_rgba8(), [128, 128, 128, 255]);
    assert_eq!(sample_stops(&[], 0.5).to_rgba8(), [0, 0, 0, 0]);

    let single = [stop("#336699", 10.0)];
    assert_eq!(sample_stops(&single, 0.9), single[0].color);
}

#[test]
fn cover_fit_fills_and_centers() {
    let fit = cover_fit(100, 100, c(200, 400));
    assert_eq!(fit.scale, 4.0);
    assert_eq!(fit.offset_x, -100.0);
    assert_eq!(fit.offset_y, 0.0);

    let fit = cover_fit(400, 100, c(200, 400));
    assert_eq!(fit.scale, 4.0);
    assert_eq!(fit.offset_x, -700.0);
}
