#![forbid(unsafe_code)]

//! Structured logging re-exports.
//!
//! Library code logs through `tracing` and never installs a subscriber; the
//! embedding application decides where events go. Targets are prefixed with
//! `sheet` so a filter such as `RUST_LOG=sheet=debug` selects exactly the
//! sheet's transitions and animate commands.

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Log target for position state transitions.
pub const TARGET_TRANSITION: &str = "sheet.transition";
/// Log target for issued animate commands.
pub const TARGET_ANIMATE: &str = "sheet.animate";
/// Log target for gesture and observer input.
pub const TARGET_INPUT: &str = "sheet.input";

/// Build a JSON subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Intended for production hosts that ship logs to a collector.
#[cfg(feature = "tracing-json")]
pub fn json_subscriber() -> impl tracing::Subscriber + Send + Sync {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .finish()
}
