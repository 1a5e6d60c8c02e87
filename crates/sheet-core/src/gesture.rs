#![forbid(unsafe_code)]

//! Drag tracking: turns pointer sequences into vertical displacements.
//!
//! [`DragTracker`] is a small state machine fed with [`PointerEvent`]s. It
//! records where a gesture started and, for every move, reports the vertical
//! displacement since that start (not since the previous move). On release it
//! reports the final displacement exactly once.
//!
//! # State Machine
//!
//! ```text
//! Idle --down--> Pressed --move (|dy| >= threshold)--> Dragging
//!   ^               |                                     |
//!   +-----up--------+----------------up / cancel----------+
//! ```
//!
//! With the default threshold of 0 there is no slop: the first move after a
//! press is already a drag.
//!
//! # Invariants
//!
//! 1. `dy` is always measured from the pointer-down position.
//! 2. At most one `Release` or `Cancel` is emitted per pointer-down.
//! 3. After `reset()` the tracker is idle and emits nothing until the next
//!    pointer-down.
//!
//! # Failure Modes
//!
//! - Move or up without a prior down (the press landed elsewhere): ignored.
//! - A second down while a session is active restarts the session from the
//!   new position; the old one is dropped without emitting.

use crate::event::{PointerEvent, PointerKind};
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for drag recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Minimum vertical distance before a press becomes a drag (default: 0).
    pub drag_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Displacement report produced by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Pointer moved during an active drag.
    Move {
        /// Vertical displacement since pointer-down.
        dy: f64,
    },
    /// Pointer released; the gesture is over.
    Release {
        /// Total vertical displacement at release.
        dy: f64,
    },
    /// The platform cancelled the gesture; `dy` is the last known displacement.
    Cancel {
        /// Last reported vertical displacement.
        dy: f64,
    },
}

impl DragEvent {
    /// The displacement carried by this event.
    #[must_use]
    pub const fn dy(&self) -> f64 {
        match *self {
            Self::Move { dy } | Self::Release { dy } | Self::Cancel { dy } => dy,
        }
    }

    /// Whether this event ends the session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Release { .. } | Self::Cancel { .. })
    }
}

// ---------------------------------------------------------------------------
// DragTracker
// ---------------------------------------------------------------------------

/// One pointer-down → up session.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    start: Point,
    last_dy: f64,
    started: bool,
}

/// Stateful drag tracker.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    config: GestureConfig,
    session: Option<DragSession>,
}

impl DragTracker {
    /// Create a tracker with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Dispatch a pointer event to the matching handler.
    pub fn process(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        match event.kind {
            PointerKind::Down => {
                self.begin(event);
                None
            }
            PointerKind::Move => self.update(event),
            PointerKind::Up => self.release(event),
            PointerKind::Cancel => self.cancel(),
        }
    }

    /// Start a session at the pointer-down position.
    pub fn begin(&mut self, event: &PointerEvent) {
        self.session = Some(DragSession {
            start: event.position(),
            last_dy: 0.0,
            started: false,
        });
    }

    /// Report displacement for a move; `None` until the threshold is crossed.
    pub fn update(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        let threshold = self.config.drag_threshold;
        let session = self.session.as_mut()?;
        let dy = event.y - session.start.y;
        if !session.started && dy.abs() >= threshold {
            session.started = true;
        }
        if !session.started {
            return None;
        }
        session.last_dy = dy;
        Some(DragEvent::Move { dy })
    }

    /// End the session and report the final displacement.
    ///
    /// A press that never crossed the threshold still releases with its `dy`
    /// so the owner can resolve it (a tap resolves to `dy == 0`).
    pub fn release(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        let session = self.session.take()?;
        Some(DragEvent::Release {
            dy: event.y - session.start.y,
        })
    }

    /// End the session without a final position.
    pub fn cancel(&mut self) -> Option<DragEvent> {
        let session = self.session.take()?;
        Some(DragEvent::Cancel {
            dy: session.last_dy,
        })
    }

    /// Whether a pointer is currently down.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the active session has crossed the drag threshold.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.started)
    }

    /// Drop any session without emitting.
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration. Applies from the next pointer-down.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
