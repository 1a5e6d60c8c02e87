// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: input events, drag tracking, offset animation, and keyboard signals.
//!
//! # Role in sheetui
//! `sheet-core` is the input layer. It owns the canonical event types a host
//! delivers to a sheet, the drag tracker that turns pointer sequences into
//! cumulative vertical displacements, the animation primitive that moves the
//! panel, and the keyboard event source with scoped listener lifetimes.
//!
//! # Primary responsibilities
//! - **Event**: pointer, keyboard, layout and resize events.
//! - **DragTracker**: pointer-down → move → up into `dy` since gesture start.
//! - **Animator / AnimatedOffset**: a scalar that animates from its live value.
//! - **KeyboardSubscription**: RAII ownership of keyboard listeners.
//!
//! # How it fits in the system
//! The widget crate (`sheet-widgets`) consumes these types and owns the
//! position state machine. Nothing here knows what a bottom sheet is.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod keyboard;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
