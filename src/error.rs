//! Error types for genpkg operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenpkgError>;

#[derive(Error, Debug)]
pub enum GenpkgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Generator error: {message}")]
    Generator { message: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Invalid snapshot directory: {}", path.display())]
    InvalidSnapshot { path: PathBuf },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl GenpkgError {
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::Generator {
            message: msg.into(),
        }
    }

    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
