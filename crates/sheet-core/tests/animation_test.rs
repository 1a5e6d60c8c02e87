//! Integration tests for the offset animator.

use sheet_core::animation::*;
use std::time::Duration;

const MS_16: Duration = Duration::from_millis(16);
const MS_300: Duration = Duration::from_millis(300);

#[test]
fn frame_ticks_complete_timed_command() {
    let mut offset = AnimatedOffset::new(0.0);
    let ticket = offset.animate_to(-400.0, MS_300);
    let mut completed = None;
    for _ in 0..19 {
        if let Some(t) = offset.tick(MS_16) {
            completed = Some(t);
        }
    }
    assert_eq!(completed, Some(ticket), "19 frames of 16ms cover 300ms");
    assert_eq!(offset.value(), -400.0);
}

#[test]
fn motion_is_monotonic_toward_target() {
    for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
        let mut offset = AnimatedOffset::new(0.0).with_easing(easing);
        offset.animate_to(-400.0, MS_300);
        let mut prev = 0.0;
        while offset.is_animating() {
            offset.tick(MS_16);
            assert!(
                offset.value() <= prev + 1e-9,
                "{} moved away from target",
                easing.name()
            );
            prev = offset.value();
        }
    }
}

#[test]
fn retarget_mid_flight_continues_from_live_value() {
    let mut offset = AnimatedOffset::new(0.0).with_easing(Easing::Linear);
    let first = offset.animate_to(-400.0, MS_300);
    offset.tick(Duration::from_millis(150));
    let live = offset.value();
    assert!((live - -200.0).abs() < 1e-9);

    let second = offset.animate_to(400.0, MS_300);
    offset.tick(Duration::ZERO);
    assert!((offset.value() - live).abs() < 1e-9, "no jump on retarget");

    let mut completions = Vec::new();
    for _ in 0..40 {
        completions.extend(offset.tick(MS_16));
    }
    assert_eq!(completions, vec![second]);
    assert!(!completions.contains(&first));
}

#[test]
fn drag_follow_then_snap_back() {
    let mut offset = AnimatedOffset::new(-400.0);
    for dy in [5.0, 12.0, 30.0] {
        let ticket = offset.animate_to(-400.0 + dy, Duration::ZERO);
        assert_eq!(offset.value(), -400.0 + dy);
        assert_eq!(offset.tick(Duration::ZERO), Some(ticket));
    }
    let snap = offset.animate_to(-400.0, MS_300);
    let mut done = None;
    for _ in 0..20 {
        done = done.or(offset.tick(MS_16));
    }
    assert_eq!(done, Some(snap));
    assert_eq!(offset.value(), -400.0);
}

#[test]
fn boxed_animator_forwards() {
    let mut boxed: Box<dyn Animator> = Box::new(AnimatedOffset::new(0.0));
    let ticket = boxed.animate_to(10.0, Duration::ZERO);
    assert_eq!(boxed.value(), 10.0);
    assert_eq!(boxed.tick(MS_16), Some(ticket));
    assert!(!boxed.is_animating());
}
