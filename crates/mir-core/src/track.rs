//! Tracks: resolved file paths for one recording
//!
//! A [`Track`] is built without touching the filesystem. Accessors that read
//! files do so when called, and report missing files as errors at that
//! point.

use serde_json::Value;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Strings longer than this are shortened in `Display` output.
const MAX_STR_LEN: usize = 100;

/// One track of a dataset, bound to a data home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    track_id: String,
    data_home: PathBuf,
    dataset_home: PathBuf,
    files: Vec<(String, PathBuf)>,
    metadata_path: Option<PathBuf>,
}

impl Track {
    pub(crate) fn new(
        track_id: impl Into<String>,
        data_home: PathBuf,
        dataset_home: PathBuf,
        files: Vec<(String, PathBuf)>,
        metadata_path: Option<PathBuf>,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            data_home,
            dataset_home,
            files,
            metadata_path,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// The data home exactly as resolved; never normalized.
    pub fn data_home(&self) -> &Path {
        &self.data_home
    }

    /// `<data_home>/<dataset directory>`
    pub fn dataset_home(&self) -> &Path {
        &self.dataset_home
    }

    /// Roles this track has files for, in index order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(role, _)| role.as_str())
    }

    pub fn files(&self) -> &[(String, PathBuf)] {
        &self.files
    }

    pub fn path(&self, role: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, path)| path.as_path())
    }

    /// Whether the file for `role` is present on disk.
    pub fn exists(&self, role: &str) -> bool {
        self.path(role).is_some_and(Path::is_file)
    }

    fn require(&self, role: &str) -> Result<&Path> {
        self.path(role).ok_or_else(|| Error::RoleNotAvailable {
            track_id: self.track_id.clone(),
            role: role.to_string(),
        })
    }

    /// Open the file for `role`.
    ///
    /// # Errors
    ///
    /// - [`Error::RoleNotAvailable`] if the track has no such role
    /// - [`Error::Fs`] if the file cannot be opened
    pub fn open(&self, role: &str) -> Result<File> {
        let path = self.require(role)?;
        File::open(path).map_err(|e| mir_fs::Error::io(path, e).into())
    }

    /// Read the whole file for `role`.
    pub fn read(&self, role: &str) -> Result<Vec<u8>> {
        let path = self.require(role)?;
        fs::read(path).map_err(|e| mir_fs::Error::io(path, e).into())
    }

    /// This track's record from the dataset metadata file.
    ///
    /// Returns `Ok(None)` when the dataset has no metadata file, the file has
    /// not been downloaded, or it has no record for this track.
    pub fn metadata(&self) -> Result<Option<Value>> {
        let Some(path) = &self.metadata_path else {
            return Ok(None);
        };
        if !path.is_file() {
            tracing::info!(?path, "Metadata file not found");
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| mir_fs::Error::io(path, e))?;
        let mut document: Value = serde_json::from_str(&content)?;
        Ok(document
            .as_object_mut()
            .and_then(|records| records.remove(&self.track_id)))
    }
}

fn shorten(value: &str) -> String {
    let count = value.chars().count();
    if count <= MAX_STR_LEN {
        return value.to_string();
    }
    let tail: String = value.chars().skip(count - MAX_STR_LEN).collect();
    format!("...{tail}")
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Track(")?;
        writeln!(f, "  track_id=\"{}\",", shorten(&self.track_id))?;
        writeln!(
            f,
            "  data_home=\"{}\",",
            shorten(&self.data_home.to_string_lossy())
        )?;
        for (role, path) in &self.files {
            writeln!(f, "  {role}_path=\"{}\",", shorten(&path.to_string_lossy()))?;
        }
        write!(f, ")")
    }
}
