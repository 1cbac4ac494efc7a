use std::path::PathBuf;

use slidelayer_core::{ConfigLoadError, LayerError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layer error: {0}")]
    Layer(#[from] LayerError),

    #[error("config error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("trace file does not exist: {path}")]
    MissingTrace { path: PathBuf },

    #[error("invalid trace: {message}")]
    InvalidTrace { message: String },

    #[error("failed to render config: {message}")]
    Render { message: String },

    #[error("{count} invariant violation(s), first: {message}")]
    Invariant { count: usize, message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invariant { .. } => 3,
            Self::InvalidTrace { .. } | Self::MissingTrace { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid_trace(message: impl Into<String>) -> Self {
        Self::InvalidTrace {
            message: message.into(),
        }
    }
}
