//! Error types for the file, config and CLI boundary.
//!
//! Extraction and tracking never fail; only I/O and input parsing around them
//! produce a `TocError`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for tocsync operations.
pub type Result<T> = std::result::Result<T, TocError>;

#[derive(Error, Debug)]
pub enum TocError {
    #[error("{}: not found", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: permission denied", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad or unreadable configuration file.
    #[error("config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Positions input that is not a `{ id: offset }` map.
    #[error("invalid positions: {reason}")]
    InvalidPositions { reason: String },

    #[error("invalid glob {pattern:?}: {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TocError {
    /// Classify an I/O error against the path it happened on.
    pub fn from_io(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        let path = path.into();
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source: e },
        }
    }
}
