#![forbid(unsafe_code)]

//! Deterministic replay harness for sheetui.
//!
//! - [`FrameClock`]: fixed-step simulated time.
//! - [`RecordingAnimator`]: the built-in animator plus a log of every
//!   animate command (`target`, `duration_ms`).
//! - [`SheetScript`]: JSON step scripts.
//! - [`SheetHarness`]: applies steps to a real [`sheet_widgets::BottomSheet`]
//!   and records one [`TraceLine`] per step, serializable as JSONL.
//!
//! The `sheet-replay` binary wraps [`cli::run`].

pub mod cli;
pub mod clock;
pub mod error;
pub mod harness;
pub mod recorder;
pub mod script;

pub use clock::FrameClock;
pub use error::{HarnessError, Result};
pub use harness::{SheetHarness, TraceLine, replay, to_jsonl};
pub use recorder::{AnimateCommand, CommandLog, RecordingAnimator};
pub use script::{SheetScript, Step, Viewport};
