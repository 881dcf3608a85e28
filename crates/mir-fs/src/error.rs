//! Error types for mir-fs

use std::path::PathBuf;

/// Result type for mir-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mir-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid relative path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid checksum '{value}': {reason}")]
    InvalidChecksum { value: String, reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
