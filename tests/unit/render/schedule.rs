use super::*;

#[test]
fn on_demand_renders_once_per_invalidation() {
    let mut s = Scheduler::new(SchedulePolicy::OnDemand);
    assert!(s.take_due());
    assert!(!s.take_due());

    s.invalidate();
    s.invalidate();
    assert!(s.take_due());
    assert!(!s.take_due());
    assert_eq!(s.passes(), 2);
}

#[test]
fn every_frame_is_always_due() {
    let mut s = Scheduler::new(SchedulePolicy::EveryFrame);
    for _ in 0..5 {
        assert!(s.take_due());
    }
    assert_eq!(s.passes(), 5);
}

#[test]
fn default_policy_is_on_demand() {
    assert_eq!(Scheduler::default().policy(), SchedulePolicy::OnDemand);
    assert!(!Scheduler::default().is_due());
}
