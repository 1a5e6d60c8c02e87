#![forbid(unsafe_code)]

//! Animation primitive for the sheet offset.
//!
//! The panel moves through exactly one scalar: its vertical translation. The
//! [`Animator`] trait is the narrow interface the position state machine
//! talks to; [`AnimatedOffset`] is the built-in time-based interpolator.
//!
//! # Contract
//!
//! - `animate_to(target, duration)` always starts from the *live* value, so a
//!   new command issued mid-flight continues from wherever the panel is.
//! - Issuing a new command supersedes the in-flight one. The superseded
//!   ticket never reports completion.
//! - A zero duration jumps immediately; completion is reported on the next
//!   `tick`, even a zero-length one.
//!
//! Hosts that own a platform animation engine can implement [`Animator`]
//! themselves and deliver completion through the state machine.

mod easing;
mod tween;

pub use easing::Easing;
pub use tween::AnimatedOffset;

use std::time::Duration;

/// Identity of one issued animate command.
///
/// Tickets are unique per animator and increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationTicket(pub u64);

/// A scalar value that animates toward a target over time.
pub trait Animator {
    /// Start animating from the live value to `target` over `duration`.
    fn animate_to(&mut self, target: f64, duration: Duration) -> AnimationTicket;

    /// Current (live) value.
    fn value(&self) -> f64;

    /// Target of the most recent command.
    fn target(&self) -> f64;

    /// Whether a command is still in flight.
    fn is_animating(&self) -> bool;

    /// Advance by `delta`. Returns the ticket that completed during this step.
    fn tick(&mut self, delta: Duration) -> Option<AnimationTicket>;
}

impl<A: Animator + ?Sized> Animator for Box<A> {
    fn animate_to(&mut self, target: f64, duration: Duration) -> AnimationTicket {
        (**self).animate_to(target, duration)
    }

    fn value(&self) -> f64 {
        (**self).value()
    }

    fn target(&self) -> f64 {
        (**self).target()
    }

    fn is_animating(&self) -> bool {
        (**self).is_animating()
    }

    fn tick(&mut self, delta: Duration) -> Option<AnimationTicket> {
        (**self).tick(delta)
    }
}
