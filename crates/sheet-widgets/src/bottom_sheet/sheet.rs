#![forbid(unsafe_code)]

//! The bottom sheet component.
//!
//! [`BottomSheet`] wires one panel instance together: the position state
//! machine, the drag tracker, the layout observer, and the keyboard
//! subscription. A host feeds it events and ticks; it reads back the offset
//! and the [`SheetLayout`] to draw.
//!
//! # Lifecycle
//!
//! The keyboard listeners are acquired in [`BottomSheet::new`] and released
//! when the sheet is dropped, whatever state it is in (mid-drag included).
//!
//! # Close notification
//!
//! The close callback runs from [`BottomSheet::tick`] after the controller
//! has finished its transition to `Hidden`. The host is expected to respond
//! by clearing its visibility flag; `set_visible(false)` on a hidden sheet is
//! a no-op.
//!
//! # Example
//!
//! ```ignore
//! let hub = KeyboardHub::shared();
//! let mut sheet = BottomSheet::new(SheetConfig::default(), hub.clone())?;
//! sheet.on_close(|| println!("closed"));
//! sheet.set_viewport(Size::new(390.0, 844.0));
//! sheet.set_visible(true);
//! sheet.on_layout(LayoutEvent::new(330.0));
//! for event in sheet.tick(Duration::from_millis(16)) { /* ... */ }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sheet_core::animation::{AnimatedOffset, AnimationTicket, Animator};
use sheet_core::event::{Event, KeyboardEvent, LayoutEvent, PointerEvent, PointerKind};
use sheet_core::geometry::Size;
use sheet_core::gesture::{DragEvent, DragTracker, GestureConfig};
use sheet_core::keyboard::{KeyboardError, KeyboardSource, KeyboardSubscription};
use sheet_core::logging::{TARGET_INPUT, TARGET_TRANSITION};

use super::config::SheetConfig;
use super::controller::{PositionController, SheetEvent, SheetState};
use super::layout::{LayoutObserver, SheetHit, SheetLayout};

/// Close notification callback.
pub type CloseCallback = Box<dyn FnMut()>;

/// What the current pointer press started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Drag,
    CloseIcon,
    Backdrop,
}

/// One draggable bottom sheet.
pub struct BottomSheet<A: Animator = AnimatedOffset> {
    config: SheetConfig,
    controller: PositionController<A>,
    tracker: DragTracker,
    observer: LayoutObserver,
    keyboard: KeyboardSubscription,
    viewport: Size,
    press: Option<Press>,
    on_close: Option<CloseCallback>,
    close_count: u64,
}

impl<A: Animator + fmt::Debug> fmt::Debug for BottomSheet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BottomSheet")
            .field("controller", &self.controller)
            .field("tracker", &self.tracker)
            .field("observer", &self.observer)
            .field("keyboard", &self.keyboard)
            .field("viewport", &self.viewport)
            .field("close_count", &self.close_count)
            .finish_non_exhaustive()
    }
}

impl BottomSheet {
    /// Create a sheet with the built-in animator.
    pub fn new(
        config: SheetConfig,
        keyboard: Arc<dyn KeyboardSource>,
    ) -> Result<Self, KeyboardError> {
        let animator = AnimatedOffset::new(0.0).with_easing(config.easing);
        Self::with_animator(config, keyboard, animator)
    }
}

impl<A: Animator> BottomSheet<A> {
    /// Create a sheet driving `animator`.
    ///
    /// Fails only when the keyboard listeners cannot be registered; nothing
    /// stays registered in that case.
    pub fn with_animator(
        config: SheetConfig,
        keyboard: Arc<dyn KeyboardSource>,
        animator: A,
    ) -> Result<Self, KeyboardError> {
        let keyboard = KeyboardSubscription::subscribe(keyboard)?;
        let mut controller = PositionController::with_animator(&config, animator);
        if config.visible {
            controller.set_visible(true);
        }
        Ok(Self {
            tracker: DragTracker::new(GestureConfig {
                drag_threshold: config.drag_threshold,
            }),
            observer: LayoutObserver::new(config.safety_margin),
            controller,
            keyboard,
            viewport: Size::default(),
            press: None,
            on_close: None,
            close_count: 0,
            config,
        })
    }

    /// Set the close notification. Replaces any previous callback.
    pub fn on_close(&mut self, callback: impl FnMut() + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    /// Builder form of [`on_close`](Self::on_close).
    #[must_use]
    pub fn with_on_close(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_close(callback);
        self
    }

    // --- Accessors ---

    /// Configuration in use.
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Read-only view of the state machine.
    pub fn controller(&self) -> &PositionController<A> {
        &self.controller
    }

    /// Current state.
    pub fn state(&self) -> SheetState {
        self.controller.state()
    }

    /// Live offset to draw at.
    pub fn offset(&self) -> f64 {
        self.controller.offset()
    }

    /// Space reserved at the bottom of the content for the keyboard.
    pub fn keyboard_spacer(&self) -> f64 {
        self.controller.keyboard_height()
    }

    /// Viewport the sheet is laid out in.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Number of close notifications delivered so far.
    pub fn close_count(&self) -> u64 {
        self.close_count
    }

    /// Whether the keyboard listeners are still registered.
    pub fn is_keyboard_subscribed(&self) -> bool {
        self.keyboard.is_active()
    }

    /// Geometry at the current offset.
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::compute(
            self.viewport,
            self.controller.offset(),
            self.controller.content_height(),
            self.controller.keyboard_height(),
            &self.config.style,
        )
    }

    // --- Inputs ---

    /// Apply the external visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.controller.set_visible(visible);
        if self.controller.state() != SheetState::Dragging {
            self.tracker.reset();
            self.press = None;
        }
    }

    /// Dismiss as if the backdrop was tapped. Returns `false` if not shown.
    pub fn dismiss(&mut self) -> bool {
        self.tracker.reset();
        self.press = None;
        self.controller.dismiss()
    }

    /// Update the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Feed a layout pass of the content subtree.
    pub fn on_layout(&mut self, event: LayoutEvent) {
        if let Some(height) = self.observer.observe(event.height) {
            tracing::debug!(target: TARGET_INPUT, content_height = height, "content measured");
            self.controller.on_content_height_changed(height);
        }
    }

    /// Feed a keyboard transition.
    pub fn on_keyboard(&mut self, event: KeyboardEvent) {
        let height = event.height();
        tracing::debug!(target: TARGET_INPUT, keyboard_height = height, "keyboard changed");
        self.controller.on_keyboard_height_changed(height);
    }

    /// Apply every keyboard event queued by the source. Returns how many.
    pub fn poll_keyboard(&mut self) -> usize {
        let events = self.keyboard.drain();
        let count = events.len();
        for event in events {
            self.on_keyboard(event);
        }
        count
    }

    /// Route a pointer event by what it lands on.
    ///
    /// A press on the panel drives the drag; a press and release on the
    /// close control or the backdrop dismisses. Returns `true` if the event
    /// was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => self.pointer_down(&event),
            PointerKind::Move => self.pointer_move(&event),
            PointerKind::Up => self.pointer_up(&event),
            PointerKind::Cancel => self.pointer_cancel(),
        }
    }

    /// Dispatch any host event.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Keyboard(keyboard) => {
                self.on_keyboard(keyboard);
                true
            }
            Event::Layout(layout) => {
                self.on_layout(layout);
                true
            }
            Event::Resize { width, height } => {
                self.set_viewport(Size::new(width, height));
                true
            }
        }
    }

    /// Advance by `delta`: apply queued keyboard events, step the animation,
    /// and deliver close notifications.
    pub fn tick(&mut self, delta: Duration) -> Vec<SheetEvent> {
        self.poll_keyboard();
        let events = self.controller.tick(delta);
        for event in &events {
            if *event == SheetEvent::Closed {
                self.notify_closed();
            }
        }
        events
    }

    /// Deliver a completion from an externally driven animator.
    pub fn on_animation_completed(&mut self, ticket: AnimationTicket) -> Option<SheetEvent> {
        let event = self.controller.on_animation_completed(ticket);
        if event == Some(SheetEvent::Closed) {
            self.notify_closed();
        }
        event
    }

    // --- Internals ---

    fn notify_closed(&mut self) {
        self.close_count += 1;
        tracing::debug!(target: TARGET_TRANSITION, count = self.close_count, "close notification");
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if self.press.is_some() || self.controller.state() != SheetState::Visible {
            return false;
        }
        let press = match self.layout().hit_test(event.position()) {
            SheetHit::CloseIcon => Press::CloseIcon,
            SheetHit::Backdrop => Press::Backdrop,
            SheetHit::Panel => {
                self.tracker.begin(event);
                self.controller.begin_drag();
                Press::Drag
            }
        };
        self.press = Some(press);
        true
    }

    fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        if self.press != Some(Press::Drag) {
            return false;
        }
        if let Some(DragEvent::Move { dy }) = self.tracker.update(event) {
            self.controller.on_drag_delta(dy);
        }
        true
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        let Some(press) = self.press.take() else {
            return false;
        };
        match press {
            Press::Drag => {
                if let Some(drag) = self.tracker.release(event) {
                    self.controller.on_drag_release(drag.dy());
                }
            }
            Press::CloseIcon | Press::Backdrop => {
                let hit = self.layout().hit_test(event.position());
                let tapped = matches!(
                    (press, hit),
                    (Press::CloseIcon, SheetHit::CloseIcon) | (Press::Backdrop, SheetHit::Backdrop)
                );
                if tapped {
                    let close_icon = press == Press::CloseIcon;
                    tracing::debug!(target: TARGET_INPUT, close_icon, "dismiss tap");
                    self.controller.dismiss();
                }
            }
        }
        true
    }

    fn pointer_cancel(&mut self) -> bool {
        let Some(press) = self.press.take() else {
            return false;
        };
        if press == Press::Drag
            && let Some(drag) = self.tracker.cancel()
        {
            self.controller.on_drag_release(drag.dy());
        }
        true
    }
}
