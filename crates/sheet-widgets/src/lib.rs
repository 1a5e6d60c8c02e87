#![forbid(unsafe_code)]

//! Widgets for sheetui.
//!
//! Currently one component: a draggable [`bottom_sheet`] anchored to the
//! bottom edge of the viewport. It shows and hides with a timed animation,
//! follows the finger while dragged, dismisses on a long enough downward drag,
//! a backdrop tap or the close control, and re-anchors whenever its content
//! height or the on-screen keyboard changes.

pub mod bottom_sheet;

pub use bottom_sheet::{
    BottomSheet, CloseCallback, DismissTarget, LayoutObserver, PositionController,
    ReleaseOutcome, Rgba, SheetConfig, SheetConfigError, SheetEvent, SheetHit, SheetLayout,
    SheetState, SheetStyle, classify_release,
};
