//! Per-dataset file index
//!
//! An index lists, for every track, the files the dataset is expected to
//! contain along with their checksums. Indexes are JSON documents:
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "tracks": {
//!     "<track_id>": { "<role>": ["<relative path>" | null, "<checksum>" | null] }
//!   },
//!   "metadata": { "<role>": ["<relative path>", "<checksum>" | null] }
//! }
//! ```
//!
//! The older flat layout, where the top-level object maps track ids straight
//! to their files, is accepted too. Track order in the document is the index
//! order used everywhere else.

use mir_fs::{ExpectedChecksum, NormalizedPath, validate_relative_path};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::{Error, Result};

/// One expected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the dataset directory.
    pub relative_path: NormalizedPath,
    /// `None` means only presence is checked.
    pub checksum: Option<ExpectedChecksum>,
}

/// Expected files of one track, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIndexEntry {
    track_id: String,
    files: Vec<(String, FileEntry)>,
}

impl TrackIndexEntry {
    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Roles with a file in this track, in index order.
    ///
    /// Roles listed with a `null` path in the index are not available for
    /// this track and do not appear here.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(role, _)| role.as_str())
    }

    pub fn file(&self, role: &str) -> Option<&FileEntry> {
        self.files
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, entry)| entry)
    }

    pub fn files(&self) -> &[(String, FileEntry)] {
        &self.files
    }
}

/// Immutable index of a dataset's expected files.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    version: Option<String>,
    tracks: Vec<TrackIndexEntry>,
    positions: HashMap<String, usize>,
    metadata: Vec<(String, FileEntry)>,
}

impl DatasetIndex {
    /// Parse an index document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] for malformed JSON or entries, and
    /// [`Error::Fs`] for paths that escape the dataset directory or
    /// malformed checksums.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content).map_err(|e| Error::InvalidIndex {
            message: e.to_string(),
        })?;
        let Value::Object(root) = document else {
            return Err(invalid("index document must be a JSON object"));
        };

        let versioned = matches!(root.get("tracks"), Some(Value::Object(_)));
        let (version, tracks, metadata) = if versioned {
            let version = match root.get("version") {
                None | Some(Value::Null) => None,
                Some(Value::String(v)) => Some(v.clone()),
                Some(other) => Some(other.to_string()),
            };
            let tracks = object_field(&root, "tracks")?;
            let metadata = match root.get("metadata") {
                None | Some(Value::Null) => Map::new(),
                Some(Value::Object(map)) => map.clone(),
                Some(_) => return Err(invalid("'metadata' must be an object")),
            };
            (version, tracks, metadata)
        } else {
            (None, root, Map::new())
        };

        let mut index = Self {
            version,
            ..Self::default()
        };

        for (track_id, files) in tracks {
            let Value::Object(files) = files else {
                return Err(invalid(&format!("track '{track_id}' must map roles to files")));
            };
            let entry = TrackIndexEntry {
                files: parse_files(&files, &track_id)?,
                track_id: track_id.clone(),
            };
            index.positions.insert(track_id, index.tracks.len());
            index.tracks.push(entry);
        }

        index.metadata = parse_files(&metadata, "metadata")?;
        if let Some((role, _)) = metadata
            .iter()
            .find(|(_, value)| matches!(value, Value::Array(items) if items.first() == Some(&Value::Null)))
        {
            return Err(invalid(&format!("metadata file '{role}' must have a path")));
        }

        tracing::debug!(
            tracks = index.tracks.len(),
            metadata_files = index.metadata.len(),
            version = ?index.version,
            "Parsed dataset index"
        );
        Ok(index)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Track ids in index order.
    pub fn track_ids(&self) -> Vec<&str> {
        self.tracks.iter().map(|t| t.track_id.as_str()).collect()
    }

    pub fn tracks(&self) -> &[TrackIndexEntry] {
        &self.tracks
    }

    /// Look up a track.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrackNotFound`] if the id is not indexed.
    pub fn entry(&self, track_id: &str) -> Result<&TrackIndexEntry> {
        self.positions
            .get(track_id)
            .map(|&pos| &self.tracks[pos])
            .ok_or_else(|| Error::TrackNotFound {
                track_id: track_id.to_string(),
            })
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.positions.contains_key(track_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Dataset-level files not bound to a track.
    pub fn metadata_files(&self) -> &[(String, FileEntry)] {
        &self.metadata
    }

    pub fn metadata_file(&self, role: &str) -> Option<&FileEntry> {
        self.metadata
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, entry)| entry)
    }

    /// Every relative path the index references, tracks and metadata alike.
    pub fn indexed_paths(&self) -> HashSet<&NormalizedPath> {
        self.tracks
            .iter()
            .flat_map(|t| t.files.iter())
            .chain(self.metadata.iter())
            .map(|(_, entry)| &entry.relative_path)
            .collect()
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidIndex {
        message: message.to_string(),
    }
}

fn object_field(root: &Map<String, Value>, key: &str) -> Result<Map<String, Value>> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(map.clone()),
        _ => Err(invalid(&format!("'{key}' must be an object"))),
    }
}

fn parse_files(files: &Map<String, Value>, owner: &str) -> Result<Vec<(String, FileEntry)>> {
    let mut parsed = Vec::with_capacity(files.len());
    for (role, value) in files {
        let Value::Array(items) = value else {
            return Err(invalid(&format!(
                "{owner}/{role}: expected [path, checksum]"
            )));
        };
        if items.is_empty() || items.len() > 2 {
            return Err(invalid(&format!(
                "{owner}/{role}: expected [path, checksum]"
            )));
        }

        let path = match &items[0] {
            Value::Null => continue,
            Value::String(p) => validate_relative_path(p)?,
            _ => return Err(invalid(&format!("{owner}/{role}: path must be a string or null"))),
        };
        let checksum = match items.get(1) {
            None | Some(Value::Null) => None,
            Some(Value::String(c)) => Some(ExpectedChecksum::parse(c)?),
            Some(_) => {
                return Err(invalid(&format!(
                    "{owner}/{role}: checksum must be a string or null"
                )));
            }
        };

        parsed.push((
            role.clone(),
            FileEntry {
                relative_path: path,
                checksum,
            },
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VERSIONED: &str = r#"{
        "version": "1.2",
        "tracks": {
            "zeta": {
                "audio": ["audio/zeta.wav", "5eb63bbbe01eeed093cb22bb8f5acdc3"],
                "beats": ["annotations/zeta.txt", null]
            },
            "alpha": {
                "audio": ["audio/alpha.wav", null],
                "beats": [null, null]
            }
        },
        "metadata": {
            "metadata": ["metadata.json", null]
        }
    }"#;

    #[test]
    fn track_ids_keep_document_order() {
        let index = DatasetIndex::from_json_str(VERSIONED).unwrap();
        assert_eq!(index.track_ids(), vec!["zeta", "alpha"]);
        assert_eq!(index.version(), Some("1.2"));
    }

    #[test]
    fn null_path_roles_are_dropped() {
        let index = DatasetIndex::from_json_str(VERSIONED).unwrap();
        let alpha = index.entry("alpha").unwrap();
        assert_eq!(alpha.roles().collect::<Vec<_>>(), vec!["audio"]);
        assert!(alpha.file("beats").is_none());
    }

    #[test]
    fn checksums_are_parsed() {
        let index = DatasetIndex::from_json_str(VERSIONED).unwrap();
        let zeta = index.entry("zeta").unwrap();
        assert!(zeta.file("audio").unwrap().checksum.is_some());
        assert!(zeta.file("beats").unwrap().checksum.is_none());
    }

    #[test]
    fn unknown_track_is_lookup_error() {
        let index = DatasetIndex::from_json_str(VERSIONED).unwrap();
        assert!(matches!(
            index.entry("~faketrackid~?!"),
            Err(Error::TrackNotFound { .. })
        ));
    }

    #[test]
    fn legacy_flat_layout() {
        let index = DatasetIndex::from_json_str(
            r#"{"0111": {"audio": ["audio/0111.wav", null]}, "0201": {"audio": ["audio/0201.wav", null]}}"#,
        )
        .unwrap();
        assert_eq!(index.track_ids(), vec!["0111", "0201"]);
        assert!(index.metadata_files().is_empty());
        assert_eq!(index.version(), None);
    }

    #[test]
    fn indexed_paths_include_metadata() {
        let index = DatasetIndex::from_json_str(VERSIONED).unwrap();
        let paths: Vec<&str> = {
            let mut v: Vec<&str> = index.indexed_paths().into_iter().map(|p| p.as_str()).collect();
            v.sort();
            v
        };
        assert_eq!(
            paths,
            vec!["annotations/zeta.txt", "audio/alpha.wav", "audio/zeta.wav", "metadata.json"]
        );
    }

    #[test]
    fn escaping_path_is_rejected() {
        let err = DatasetIndex::from_json_str(r#"{"t": {"audio": ["../outside.wav", null]}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Fs(mir_fs::Error::InvalidPath { .. })));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        for doc in [
            "[]",
            r#"{"t": ["audio.wav"]}"#,
            r#"{"t": {"audio": "audio.wav"}}"#,
            r#"{"t": {"audio": [42, null]}}"#,
            r#"{"t": {"audio": ["a.wav", null, "extra"]}}"#,
        ] {
            assert!(DatasetIndex::from_json_str(doc).is_err(), "accepted: {doc}");
        }
    }
}
