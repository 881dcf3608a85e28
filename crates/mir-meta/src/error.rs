//! Error types for mir-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] mir_fs::Error),

    #[error("Invalid dataset name '{name}': {reason}")]
    InvalidDatasetName { name: String, reason: String },

    #[error("Invalid directory name '{directory}': {reason}")]
    InvalidDirectoryName { directory: String, reason: String },

    #[error("Module key '{declared}' does not match '{derived}' derived from directory '{directory}'")]
    ModuleKeyMismatch {
        directory: String,
        declared: String,
        derived: String,
    },

    #[error("Dataset already registered: {module_key}")]
    DuplicateDataset { module_key: String },

    #[error("Dataset not found: {module_key}")]
    DatasetNotFound { module_key: String },

    #[error("Track not found in index: {track_id}")]
    TrackNotFound { track_id: String },

    #[error("Invalid index: {message}")]
    InvalidIndex { message: String },

    #[error("Failed to parse dataset definition at {path}: {message}")]
    DefinitionParse { path: PathBuf, message: String },
}
