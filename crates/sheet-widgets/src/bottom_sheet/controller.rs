#![forbid(unsafe_code)]

//! Position state machine for the bottom sheet.
//!
//! [`PositionController`] is the single writer of the panel offset. It
//! reconciles visibility requests, content and keyboard height changes, and
//! drag gestures into animate commands on the [`Animator`] it owns.
//!
//! # Coordinates
//!
//! The panel is mounted with its top edge on the bottom edge of the viewport.
//! The offset is a vertical translation from there: 0 is just off-screen,
//! `-content_height` shows the whole panel, more negative moves it further up.
//!
//! # State Machine
//!
//! ```text
//!            set_visible(true)              begin_drag
//!   Hidden ---------------------> Visible -------------> Dragging
//!     ^                            ^  |  ^                  |
//!     |                            |  |  +--release: snap---+
//!     |   set_visible(true)        |  |                     |
//!     |  +-------------------------+  | dismiss /           | release: dy > threshold
//!     |  |                            | set_visible(false)  | dismiss / set_visible(false)
//!     |  |                            v                     |
//!     +--+------ completion ----- Dismissing <--------------+
//! ```
//!
//! The rest offset is a pure function of the state and content height:
//! `Visible | Dragging` rest at `-content_height`, `Hidden | Dismissing` rest
//! at the [`DismissTarget`]'s hidden offset.
//!
//! # Invariants
//!
//! 1. `Closed` is emitted at most once per dismiss, and only after the
//!    retract animation reports completion.
//! 2. A dismiss that is superseded (re-opened) never emits `Closed`.
//! 3. Height changes never start a dismiss and never emit `Closed`.
//! 4. Drag input is only honored in `Dragging`; a release outside a drag is
//!    ignored, so duplicate releases cannot dismiss twice.
//!
//! # Failure Modes
//!
//! - Content never measured: content height stays 0 and the panel rests
//!   flush with the bottom edge.
//! - Non-finite or negative heights read as 0; non-finite drag deltas are
//!   dropped.

use std::time::Duration;

use sheet_core::animation::{AnimatedOffset, AnimationTicket, Animator};
use sheet_core::logging::{TARGET_ANIMATE, TARGET_TRANSITION};

use super::config::{DismissTarget, SheetConfig};

/// Current state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetState {
    /// Off-screen (or retracting toward off-screen after a re-anchor).
    #[default]
    Hidden,
    /// Shown at rest, or animating toward rest.
    Visible,
    /// Following an active drag.
    Dragging,
    /// Retracting after a committed dismiss; `Closed` follows completion.
    Dismissing,
}

impl SheetState {
    /// Whether the panel should be rendered.
    #[inline]
    pub fn is_on_screen(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Stable lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Visible => "visible",
            Self::Dragging => "dragging",
            Self::Dismissing => "dismissing",
        }
    }
}

/// Notifications produced when animations complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetEvent {
    /// The show animation started by `set_visible(true)` finished.
    Opened,
    /// A dismiss finished retracting. The owner's close callback runs now.
    Closed,
}

/// How a drag release was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Spring back to rest with a timed animation.
    SnapBack,
    /// Commit to dismiss.
    Dismiss,
    /// Zero displacement: return to rest without a close.
    Settle,
    /// No drag was active; the release was dropped.
    Ignored,
}

impl ReleaseOutcome {
    /// Stable lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::SnapBack => "snap_back",
            Self::Dismiss => "dismiss",
            Self::Settle => "settle",
            Self::Ignored => "ignored",
        }
    }
}

/// Resolve a release displacement.
///
/// - `dy > threshold`: dismiss.
/// - `0 < dy <= threshold` or `dy < 0`: snap back.
/// - `dy == 0` (or not a number): settle.
#[must_use]
pub fn classify_release(dy: f64, dismiss_threshold: f64) -> ReleaseOutcome {
    if dy > dismiss_threshold {
        ReleaseOutcome::Dismiss
    } else if dy > 0.0 || dy < 0.0 {
        ReleaseOutcome::SnapBack
    } else {
        ReleaseOutcome::Settle
    }
}

/// Offset a drag with displacement `dy` moves the panel to.
///
/// Downward drags follow 1:1; upward drags follow until `overshoot_cap`
/// past rest and then hold.
#[inline]
#[must_use]
pub fn drag_offset(content_height: f64, dy: f64, overshoot_cap: f64) -> f64 {
    if dy < -overshoot_cap {
        -content_height - overshoot_cap
    } else {
        -content_height + dy
    }
}

fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() { height.max(0.0) } else { 0.0 }
}

/// The position state machine. Owns the animated offset exclusively.
#[derive(Debug, Clone)]
pub struct PositionController<A: Animator = AnimatedOffset> {
    animator: A,
    state: SheetState,
    visible: bool,
    content_height: f64,
    keyboard_height: f64,
    duration: Duration,
    overshoot_cap: f64,
    dismiss_threshold: f64,
    dismiss_target: DismissTarget,
    pending_open: Option<AnimationTicket>,
    pending_close: Option<AnimationTicket>,
    /// Set from a show until it completes, a drag starts, or a dismiss begins.
    showing: bool,
}

impl PositionController {
    /// Create a hidden controller with the built-in animator.
    pub fn new(config: &SheetConfig) -> Self {
        let animator = AnimatedOffset::new(0.0).with_easing(config.easing);
        Self::with_animator(config, animator)
    }
}

impl<A: Animator> PositionController<A> {
    /// Create a hidden controller driving `animator`.
    ///
    /// The animator's current value is taken as the starting offset.
    pub fn with_animator(config: &SheetConfig, animator: A) -> Self {
        Self {
            animator,
            state: SheetState::Hidden,
            visible: false,
            content_height: 0.0,
            keyboard_height: 0.0,
            duration: config.animation_duration_value(),
            overshoot_cap: config.overshoot_cap,
            dismiss_threshold: config.dismiss_threshold,
            dismiss_target: config.dismiss_target,
            pending_open: None,
            pending_close: None,
            showing: false,
        }
    }

    // --- Accessors ---

    /// Current state.
    #[inline]
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Last visibility request.
    #[inline]
    pub fn visible_requested(&self) -> bool {
        self.visible
    }

    /// Content height including the safety margin.
    #[inline]
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Space currently reserved for the keyboard.
    #[inline]
    pub fn keyboard_height(&self) -> f64 {
        self.keyboard_height
    }

    /// Live offset, as drawn.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.animator.value()
    }

    /// Target of the most recent animate command.
    #[inline]
    pub fn target(&self) -> f64 {
        self.animator.target()
    }

    /// Whether an animation is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Whether a dismiss is waiting on its retract animation.
    #[inline]
    pub fn is_closing(&self) -> bool {
        self.pending_close.is_some()
    }

    /// Read-only view of the animator.
    #[inline]
    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Offset the panel rests at in the current state.
    pub fn rest_offset(&self) -> f64 {
        match self.state {
            SheetState::Visible | SheetState::Dragging => -self.content_height,
            SheetState::Hidden | SheetState::Dismissing => {
                self.dismiss_target.hidden_offset(self.content_height)
            }
        }
    }

    /// Apply timing and threshold changes. Takes effect from the next command.
    pub fn apply_config(&mut self, config: &SheetConfig) {
        self.duration = config.animation_duration_value();
        self.overshoot_cap = config.overshoot_cap;
        self.dismiss_threshold = config.dismiss_threshold;
        self.dismiss_target = config.dismiss_target;
    }

    // --- Transitions ---

    fn transition(&mut self, to: SheetState) {
        if self.state != to {
            tracing::debug!(
                target: TARGET_TRANSITION,
                from = self.state.name(),
                to = to.name(),
                content_height = self.content_height,
                "sheet state transition"
            );
            self.state = to;
        }
    }

    fn animate(&mut self, target: f64, duration: Duration) -> AnimationTicket {
        let from = self.animator.value();
        let ticket = self.animator.animate_to(target, duration);
        tracing::trace!(
            target: TARGET_ANIMATE,
            ticket = ticket.0,
            from,
            to = target,
            duration_ms = duration.as_millis() as u64,
            "animate"
        );
        ticket
    }

    /// Re-issue the timed rest animation unless it is already the target.
    ///
    /// Returns the new ticket when a command was issued.
    fn reanchor(&mut self) -> Option<AnimationTicket> {
        let rest = self.rest_offset();
        if self.animator.target() == rest {
            return None;
        }
        let ticket = self.animate(rest, self.duration);
        match self.state {
            SheetState::Dismissing => self.pending_close = Some(ticket),
            SheetState::Visible if self.showing => self.pending_open = Some(ticket),
            _ => {}
        }
        Some(ticket)
    }

    fn begin_dismiss(&mut self) {
        self.pending_open = None;
        self.showing = false;
        self.transition(SheetState::Dismissing);
        let hidden = self.rest_offset();
        let ticket = self.animate(hidden, self.duration);
        self.pending_close = Some(ticket);
    }

    /// Handle a change of the external visibility flag.
    ///
    /// `true` shows the panel (re-opening a dismiss in progress); repeated
    /// `true` while shown issues nothing. `false` retracts a shown panel and
    /// emits `Closed` on completion.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        match (visible, self.state) {
            (true, SheetState::Hidden) => {
                self.transition(SheetState::Visible);
                self.showing = true;
                self.reanchor();
            }
            (true, SheetState::Dismissing) => {
                self.pending_close = None;
                self.transition(SheetState::Visible);
                self.showing = true;
                self.reanchor();
            }
            (false, SheetState::Visible | SheetState::Dragging) => self.begin_dismiss(),
            (true, SheetState::Visible | SheetState::Dragging)
            | (false, SheetState::Hidden | SheetState::Dismissing) => {}
        }
    }

    /// Replace the content height (margin already included) and re-anchor.
    ///
    /// While dragging, only the stored height changes; the next drag update
    /// uses it.
    pub fn on_content_height_changed(&mut self, height: f64) {
        self.content_height = sanitize_height(height);
        if self.state != SheetState::Dragging {
            self.reanchor();
        }
    }

    /// Replace the keyboard height and re-anchor.
    pub fn on_keyboard_height_changed(&mut self, height: f64) {
        self.keyboard_height = sanitize_height(height);
        if self.state != SheetState::Dragging {
            self.reanchor();
        }
    }

    /// A pointer went down on the draggable region.
    ///
    /// Returns `false` (and stays put) unless the panel is shown.
    pub fn begin_drag(&mut self) -> bool {
        if self.state != SheetState::Visible {
            return false;
        }
        self.pending_open = None;
        self.showing = false;
        self.transition(SheetState::Dragging);
        true
    }

    /// Follow the pointer. Returns the offset jumped to.
    pub fn on_drag_delta(&mut self, dy: f64) -> Option<f64> {
        if self.state != SheetState::Dragging || !dy.is_finite() {
            return None;
        }
        let target = drag_offset(self.content_height, dy, self.overshoot_cap);
        self.animate(target, Duration::ZERO);
        Some(target)
    }

    /// Resolve the gesture at release.
    pub fn on_drag_release(&mut self, dy: f64) -> ReleaseOutcome {
        let _span = tracing::debug_span!(
            "sheet.release",
            dy,
            content_height = self.content_height
        )
        .entered();

        if self.state != SheetState::Dragging {
            tracing::debug!(target: TARGET_TRANSITION, state = self.state.name(), "release ignored outside drag");
            return ReleaseOutcome::Ignored;
        }

        let outcome = classify_release(dy, self.dismiss_threshold);
        tracing::debug!(target: TARGET_TRANSITION, outcome = outcome.name(), "release resolved");
        self.transition(SheetState::Visible);
        match outcome {
            ReleaseOutcome::Dismiss => self.begin_dismiss(),
            ReleaseOutcome::SnapBack => {
                let rest = self.rest_offset();
                self.animate(rest, self.duration);
            }
            // The release point or the content height may differ from the
            // last drag update.
            ReleaseOutcome::Settle => {
                self.reanchor();
            }
            ReleaseOutcome::Ignored => {}
        }
        outcome
    }

    /// Dismiss from a backdrop tap or the close control.
    ///
    /// Returns `false` when there is nothing to dismiss.
    pub fn dismiss(&mut self) -> bool {
        match self.state {
            SheetState::Visible | SheetState::Dragging => {
                self.begin_dismiss();
                true
            }
            SheetState::Hidden | SheetState::Dismissing => false,
        }
    }

    /// Advance the animation and report completions.
    pub fn tick(&mut self, delta: Duration) -> Vec<SheetEvent> {
        self.animator
            .tick(delta)
            .and_then(|ticket| self.on_animation_completed(ticket))
            .into_iter()
            .collect()
    }

    /// Deliver a completion from an externally driven animator.
    pub fn on_animation_completed(&mut self, ticket: AnimationTicket) -> Option<SheetEvent> {
        if self.pending_close == Some(ticket) {
            self.pending_close = None;
            self.transition(SheetState::Hidden);
            tracing::debug!(target: TARGET_TRANSITION, "sheet closed");
            return Some(SheetEvent::Closed);
        }
        if self.pending_open == Some(ticket) {
            self.pending_open = None;
            self.showing = false;
            return Some(SheetEvent::Opened);
        }
        None
    }
}
