#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! A host translates its platform input into these events and hands them to
//! a sheet. Coordinates are logical units with the origin at the top-left of
//! the viewport; `y` grows downward, so a positive vertical displacement is a
//! downward drag.
//!
//! # Design Notes
//!
//! - Pointer events carry absolute positions; displacement is computed by the
//!   drag tracker, never by the host.
//! - Keyboard events carry the keyboard height on show and nothing on hide.
//! - Layout events report the measured height of the content subtree once per
//!   layout pass.

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A pointer (touch or mouse) event.
    Pointer(PointerEvent),

    /// On-screen keyboard visibility changed.
    Keyboard(KeyboardEvent),

    /// The content subtree finished a layout pass.
    Layout(LayoutEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width.
        width: f64,
        /// New viewport height.
        height: f64,
    },
}

/// A pointer event at an absolute position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    /// Pointer pressed.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    /// Pointer moved while pressed.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    /// Pointer released.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    /// The platform took the pointer away (system gesture, focus loss).
    #[must_use]
    pub const fn cancel(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Cancel, x, y)
    }

    /// Position as a point.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Pointer event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Touch started / button pressed.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Touch ended / button released.
    Up,
    /// Gesture taken over by the platform.
    Cancel,
}

/// Which keyboard transition a listener is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardSignal {
    /// The keyboard finished appearing.
    DidShow,
    /// The keyboard finished disappearing.
    DidHide,
}

/// On-screen keyboard transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardEvent {
    /// Keyboard is shown and occupies `height` units at the bottom.
    Shown {
        /// Keyboard height.
        height: f64,
    },
    /// Keyboard is hidden.
    Hidden,
}

impl KeyboardEvent {
    /// The signal this event is delivered on.
    #[must_use]
    pub const fn signal(&self) -> KeyboardSignal {
        match self {
            Self::Shown { .. } => KeyboardSignal::DidShow,
            Self::Hidden => KeyboardSignal::DidHide,
        }
    }

    /// Height the keyboard occupies after this event (0 when hidden).
    ///
    /// Negative or non-finite heights from a misbehaving source read as 0.
    #[must_use]
    pub fn height(&self) -> f64 {
        match *self {
            Self::Shown { height } if height.is_finite() => height.max(0.0),
            Self::Shown { .. } | Self::Hidden => 0.0,
        }
    }
}

/// Result of one layout pass over the content subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEvent {
    /// Measured content height, without any safety margin.
    pub height: f64,
}

impl LayoutEvent {
    /// Create a new layout event.
    #[must_use]
    pub const fn new(height: f64) -> Self {
        Self { height }
    }
}
