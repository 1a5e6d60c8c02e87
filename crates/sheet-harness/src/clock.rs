#![forbid(unsafe_code)]

//! Fixed-step clock for deterministic replays.

use std::time::Duration;

/// Default frame step (~60 fps).
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// A clock that only moves in whole frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    step: Duration,
    frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME)
    }
}

impl FrameClock {
    /// Create a clock advancing by `step` per frame. A zero step is bumped to 1 ms.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        let step = if step.is_zero() {
            Duration::from_millis(1)
        } else {
            step
        };
        Self { step, frame: 0 }
    }

    /// Frame length.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Frames elapsed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.step.saturating_mul(u32::try_from(self.frame).unwrap_or(u32::MAX))
    }

    /// Advance one frame and return its length.
    pub fn advance(&mut self) -> Duration {
        self.frame += 1;
        self.step
    }

    /// Whole frames needed to cover `duration` (rounded up).
    pub fn frames_for(&self, duration: Duration) -> u64 {
        let step = self.step.as_nanos();
        let total = duration.as_nanos();
        u64::try_from(total.div_ceil(step)).unwrap_or(u64::MAX)
    }
}
