use super::*;

#[test]
fn first_step_moves_a_tenth_of_the_way() {
    let mut r = RotationSmoother::default();
    r.set_target(Vec3::new(10.0, -20.0, 30.0));
    let c = r.step();
    assert!((c - Vec3::new(1.0, -2.0, 3.0)).length() < 1e-5);
}

#[test]
fn distance_strictly_decreases_and_converges() {
    let mut r = RotationSmoother::default();
    r.set_target(Vec3::new(25.0, -40.0, 15.0));
    let mut prev = r.remaining();
    for _ in 0..80 {
        r.step();
        let now = r.remaining();
        assert!(now < prev, "{now} !< {prev}");
        prev = now;
    }
    assert!(r.is_settled(0.01));
}

#[test]
fn snap_skips_easing() {
    let mut r = RotationSmoother::default();
    r.snap_to(Vec3::splat(45.0));
    assert_eq!(r.current(), Vec3::splat(45.0));
    assert!(r.is_settled(0.0));
}

#[test]
fn factor_is_clamped() {
    let mut r = RotationSmoother::new(5.0);
    r.set_target(Vec3::X);
    assert_eq!(r.step(), Vec3::X);
}
