#![forbid(unsafe_code)]

//! Time-based interpolation of a single offset.
//!
//! # Invariants
//!
//! 1. The value only changes inside `animate_to` (zero duration) or `tick`.
//! 2. Every command starts from the live value at the moment it is issued.
//! 3. At most one ticket is in flight; superseded tickets are forgotten.
//! 4. When a command completes, `value() == target()` exactly.
//!
//! # Failure Modes
//!
//! - Non-finite targets are ignored: the command is issued (so a ticket is
//!   returned and completes) but the target stays at the previous value.

use std::time::Duration;

use super::{AnimationTicket, Animator, Easing};

/// The built-in [`Animator`]: an eased tween from the live value to a target.
#[derive(Debug, Clone)]
pub struct AnimatedOffset {
    value: f64,
    from: f64,
    target: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    in_flight: Option<AnimationTicket>,
    next_ticket: u64,
}

impl Default for AnimatedOffset {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AnimatedOffset {
    /// Create an offset resting at `initial`.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            from: initial,
            target: initial,
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
            in_flight: None,
            next_ticket: 1,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the easing curve. Applies from the next command.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Easing curve in use.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Ticket of the in-flight command, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<AnimationTicket> {
        self.in_flight
    }

    /// Raw progress of the in-flight command (1.0 when idle).
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.in_flight.is_none() || self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

impl Animator for AnimatedOffset {
    fn animate_to(&mut self, target: f64, duration: Duration) -> AnimationTicket {
        let ticket = AnimationTicket(self.next_ticket);
        self.next_ticket += 1;

        self.from = self.value;
        if target.is_finite() {
            self.target = target;
        }
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.in_flight = Some(ticket);

        if duration.is_zero() {
            self.value = self.target;
        }
        ticket
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn target(&self) -> f64 {
        self.target
    }

    fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    fn tick(&mut self, delta: Duration) -> Option<AnimationTicket> {
        self.in_flight?;

        self.elapsed = self.elapsed.saturating_add(delta);
        if self.duration.is_zero() || self.elapsed >= self.duration {
            self.value = self.target;
            self.elapsed = self.duration;
            return self.in_flight.take();
        }

        let p = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = self.easing.apply(p);
        self.value = self.from + (self.target - self.from) * eased;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn starts_at_rest() {
        let a = AnimatedOffset::new(12.0);
        assert_eq!(a.value(), 12.0);
        assert_eq!(a.target(), 12.0);
        assert!(!a.is_animating());
        assert_eq!(a.progress(), 1.0);
    }

    #[test]
    fn completes_at_duration() {
        let mut a = AnimatedOffset::new(0.0).with_easing(Easing::Linear);
        let ticket = a.animate_to(-400.0, MS_300);

        assert_eq!(a.tick(MS_100), None);
        assert!((a.value() - -400.0 / 3.0).abs() < 1e-9);
        assert_eq!(a.tick(MS_100), None);
        assert_eq!(a.tick(MS_100), Some(ticket));
        assert_eq!(a.value(), -400.0);
        assert!(!a.is_animating());
        assert_eq!(a.tick(MS_100), None);
    }

    #[test]
    fn zero_duration_jumps_and_completes_on_next_tick() {
        let mut a = AnimatedOffset::new(-400.0);
        let ticket = a.animate_to(-420.0, Duration::ZERO);
        assert_eq!(a.value(), -420.0);
        assert!(a.is_animating());
        assert_eq!(a.tick(Duration::ZERO), Some(ticket));
    }

    #[test]
    fn new_command_starts_from_live_value() {
        let mut a = AnimatedOffset::new(0.0).with_easing(Easing::Linear);
        a.animate_to(-300.0, MS_300);
        a.tick(MS_100);
        let live = a.value();
        assert!((live - -100.0).abs() < 1e-9);

        a.animate_to(300.0, MS_300);
        // No time has passed: still exactly where it was.
        assert_eq!(a.value(), live);
        a.tick(Duration::from_millis(150));
        assert!((a.value() - (live + (300.0 - live) * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn superseded_ticket_never_completes() {
        let mut a = AnimatedOffset::new(0.0);
        let first = a.animate_to(100.0, MS_300);
        a.tick(MS_100);
        let second = a.animate_to(-100.0, MS_100);
        assert_ne!(first, second);

        let mut completed = Vec::new();
        for _ in 0..10 {
            if let Some(t) = a.tick(MS_100) {
                completed.push(t);
            }
        }
        assert_eq!(completed, vec![second]);
    }

    #[test]
    fn tickets_increase() {
        let mut a = AnimatedOffset::default();
        let t1 = a.animate_to(1.0, MS_100);
        let t2 = a.animate_to(2.0, MS_100);
        assert!(t2 > t1);
        assert_eq!(a.in_flight(), Some(t2));
    }

    #[test]
    fn non_finite_target_keeps_previous() {
        let mut a = AnimatedOffset::new(5.0);
        let ticket = a.animate_to(f64::NAN, MS_100);
        assert_eq!(a.target(), 5.0);
        assert_eq!(a.tick(MS_300), Some(ticket));
        assert_eq!(a.value(), 5.0);
    }

    #[test]
    fn eased_value_stays_between_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            let mut a = AnimatedOffset::new(0.0).with_easing(easing);
            a.animate_to(-400.0, MS_300);
            for _ in 0..30 {
                a.tick(Duration::from_millis(11));
                assert!(a.value() <= 0.0 && a.value() >= -400.0, "{easing:?}");
            }
        }
    }
}
