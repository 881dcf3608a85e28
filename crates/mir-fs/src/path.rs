//! Normalized relative path handling for dataset indexes

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Index entries and on-disk scans are compared through this type, so a
/// file listed as `audio\track.wav` on one platform matches `audio/track.wav`
/// found by a directory walk on another. Conversion to the platform-native
/// form happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        self.inner.split('/').collect()
    }

    /// Resolve this relative path under `base` without touching the filesystem.
    pub fn under(&self, base: &Path) -> PathBuf {
        base.join(self.to_native())
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Validate a path taken from a dataset index and normalize it.
///
/// Index paths must stay inside the dataset directory: they are non-empty,
/// relative, and free of `..` components. A leading `./` is dropped.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] describing the first violated rule.
pub fn validate_relative_path(raw: &str) -> Result<NormalizedPath> {
    let invalid = |reason: &str| Error::InvalidPath {
        path: raw.to_string(),
        reason: reason.to_string(),
    };

    let normalized = raw.replace('\\', "/");
    let trimmed = normalized.trim_start_matches("./");

    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    if trimmed.starts_with('/') || has_drive_prefix(trimmed) {
        return Err(invalid("path must be relative to the dataset directory"));
    }
    for component in trimmed.split('/') {
        match component {
            ".." => return Err(invalid("path must not contain '..'")),
            "" => return Err(invalid("path contains an empty component")),
            _ => {}
        }
    }

    Ok(NormalizedPath {
        inner: trimmed.to_string(),
    })
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
