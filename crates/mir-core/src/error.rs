//! Error types for mir-core

use std::path::PathBuf;

/// Result type for mir-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mir-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Track id not present in the dataset index
    #[error("{track_id} is not a valid track ID in {dataset}")]
    InvalidTrackId { track_id: String, dataset: String },

    /// Role not available for a track
    #[error("Track {track_id} has no '{role}' file")]
    RoleNotAvailable { track_id: String, role: String },

    /// Settings file could not be parsed
    #[error("Invalid settings at {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    /// Dataset has no download instructions
    #[error("No download instructions available for {dataset}")]
    DownloadUnavailable { dataset: String },

    // Transparent wrappers for underlying crate errors
    /// Metadata error from mir-meta
    #[error(transparent)]
    Meta(#[from] mir_meta::Error),

    /// Filesystem error from mir-fs
    #[error(transparent)]
    Fs(#[from] mir_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
