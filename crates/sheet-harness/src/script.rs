#![forbid(unsafe_code)]

//! JSON step scripts.
//!
//! ```json
//! {
//!   "viewport": { "width": 390, "height": 844 },
//!   "config": { "dismiss_threshold": 40.0 },
//!   "steps": [
//!     { "op": "visible", "value": true },
//!     { "op": "layout", "height": 330 },
//!     { "op": "advance_ms", "ms": 300 },
//!     { "op": "pointer_down", "x": 200, "y": 600 },
//!     { "op": "pointer_move", "x": 200, "y": 655 },
//!     { "op": "pointer_up", "x": 200, "y": 655 },
//!     { "op": "advance_ms", "ms": 300 }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sheet_core::geometry::Size;
use sheet_widgets::SheetConfig;

use crate::error::{HarnessError, Result};

/// Viewport dimensions of a script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

impl From<Viewport> for Size {
    fn from(v: Viewport) -> Self {
        Size::new(v.width, v.height)
    }
}

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Set the external visibility flag.
    Visible { value: bool },
    /// A layout pass measured `height` (before the safety margin).
    Layout { height: f64 },
    /// The keyboard appeared.
    KeyboardShown { height: f64 },
    /// The keyboard went away.
    KeyboardHidden,
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerCancel,
    /// Down and up at the same point.
    Tap { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    /// Run frames until at least `ms` of simulated time passed.
    AdvanceMs { ms: u64 },
}

impl Step {
    /// Stable op name, as written in scripts.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Visible { .. } => "visible",
            Self::Layout { .. } => "layout",
            Self::KeyboardShown { .. } => "keyboard_shown",
            Self::KeyboardHidden => "keyboard_hidden",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerCancel => "pointer_cancel",
            Self::Tap { .. } => "tap",
            Self::Resize { .. } => "resize",
            Self::AdvanceMs { .. } => "advance_ms",
        }
    }

    fn check(&self, index: usize) -> Result<()> {
        let finite = |name: &str, v: f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(HarnessError::invalid_step(
                    index,
                    format!("{name} must be finite"),
                ))
            }
        };
        match *self {
            Self::Layout { height } | Self::KeyboardShown { height } => finite("height", height),
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Tap { x, y } => finite("x", x).and(finite("y", y)),
            Self::Resize { width, height } => {
                finite("width", width)?;
                finite("height", height)?;
                if width <= 0.0 || height <= 0.0 {
                    return Err(HarnessError::invalid_step(index, "resize must be positive"));
                }
                Ok(())
            }
            Self::AdvanceMs { ms: 0 } => {
                Err(HarnessError::invalid_step(index, "advance_ms must be > 0"))
            }
            Self::Visible { .. }
            | Self::KeyboardHidden
            | Self::PointerCancel
            | Self::AdvanceMs { .. } => Ok(()),
        }
    }
}

/// A complete replay: configuration, viewport, and steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetScript {
    pub viewport: Viewport,
    pub config: SheetConfig,
    pub steps: Vec<Step>,
}

impl SheetScript {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Parse and validate a script.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    /// Read, parse and validate a script file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HarnessError::MissingScript {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration and every step.
    pub fn validate(&self) -> Result<()> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(sheet_widgets::SheetConfigError::Validation(errors).into());
        }
        for (index, step) in self.steps.iter().enumerate() {
            step.check(index)?;
        }
        Ok(())
    }
}
