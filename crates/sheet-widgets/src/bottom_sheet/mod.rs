#![forbid(unsafe_code)]

//! Draggable bottom sheet.
//!
//! # Structure
//!
//! - [`controller`]: the position state machine, the only writer of the
//!   panel offset.
//! - [`layout`]: content measurement glue, panel geometry and hit testing.
//! - [`config`]: props and tunables, loadable from TOML or JSON.
//! - [`style`]: colors and optional visual parts.
//! - [`sheet`]: the component that wires everything to host events.
//!
//! # Data flow
//!
//! ```text
//!  pointer ──► DragTracker ──dy──►┐
//!  layout  ──► LayoutObserver ───►├─► PositionController ──► Animator ──► offset
//!  keyboard ─► KeyboardSubscription►┘           │
//!                                               └─► SheetEvent::Closed ──► on_close
//! ```

pub mod config;
pub mod controller;
pub mod layout;
pub mod sheet;
pub mod style;

pub use config::{DismissTarget, SheetConfig, SheetConfigError};
pub use controller::{
    PositionController, ReleaseOutcome, SheetEvent, SheetState, classify_release, drag_offset,
};
pub use layout::{LayoutObserver, SheetHit, SheetLayout};
pub use sheet::{BottomSheet, CloseCallback};
pub use style::{ParseColorError, Rgba, SheetStyle};
