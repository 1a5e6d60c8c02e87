use std::path::PathBuf;

use sheet_core::keyboard::KeyboardError;
use sheet_widgets::SheetConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] SheetConfigError),

    #[error("keyboard subscription failed: {0}")]
    Keyboard(#[from] KeyboardError),

    #[error("script not found: {path}")]
    MissingScript { path: PathBuf },

    #[error("invalid step {index}: {message}")]
    InvalidStep { index: usize, message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingScript { .. } | Self::InvalidStep { .. } | Self::Config(_) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid_step(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidStep {
            index,
            message: message.into(),
        }
    }
}
