//! Error types for keyword extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse error category, for callers that only care what went wrong
/// at the boundary (the CLI maps these to exit codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// missing or unreadable document / corpus path
    Input,
    /// empty corpus, corrupt snapshot, invalid parameters
    Configuration,
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum KweError {
    /// A document or corpus path that does not exist or cannot be read.
    #[error("input error: {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    /// Training or parameter problems.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failure.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_cbor::Error),

    /// Config file parse failure.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl KweError {
    pub fn input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        KweError::Input {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KweError::Input { .. } | KweError::Io(_) => ErrorKind::Input,
            KweError::Configuration(_) | KweError::Snapshot(_) | KweError::ConfigParse(_) => {
                ErrorKind::Configuration
            }
        }
    }
}

/// Result type for keyword extraction.
pub type Result<T> = std::result::Result<T, KweError>;
