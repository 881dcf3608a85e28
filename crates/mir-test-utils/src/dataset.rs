//! [`TestDataset`] builder for validation and loading scenarios.
//!
//! A fixture owns a temporary data home and a registered dataset whose
//! index lists the files added through the builder. Nothing is written to
//! disk until the test asks for it, so "never downloaded" is the starting
//! state.

use md5::{Digest, Md5};
use mir_meta::{DatasetDescriptor, DatasetIndex, RegisteredDataset};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Lowercase MD5 hex of `content`, as stored in dataset indexes.
pub fn md5_hex(content: &[u8]) -> String {
    format!("{:x}", Md5::digest(content))
}

/// Builder for [`TestDataset`].
///
/// # Example
///
/// ```rust
/// use mir_test_utils::TestDataset;
///
/// let fixture = TestDataset::builder("Tiny Set", "Tiny-Set")
///     .file("t1", "audio", "audio/t1.wav", b"RIFF")
///     .presence_only("t1", "beats", "beats/t1.txt", b"0.5\n")
///     .build();
/// fixture.write_all();
/// assert!(fixture.dataset_home().join("audio/t1.wav").is_file());
/// ```
pub struct TestDatasetBuilder {
    name: String,
    directory: String,
    tracks: Map<String, Value>,
    metadata: Map<String, Value>,
    contents: HashMap<String, Vec<u8>>,
}

impl TestDatasetBuilder {
    fn add(&mut self, track_id: &str, role: &str, path: &str, content: &[u8], checksum: Value) {
        let files = self
            .tracks
            .entry(track_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(files) = files {
            files.insert(role.to_string(), json!([path, checksum]));
        }
        self.contents.insert(path.to_string(), content.to_vec());
    }

    /// Add a file with its MD5 recorded in the index.
    pub fn file(mut self, track_id: &str, role: &str, path: &str, content: &[u8]) -> Self {
        let checksum = Value::String(md5_hex(content));
        self.add(track_id, role, path, content, checksum);
        self
    }

    /// Add a file whose index entry has no checksum.
    pub fn presence_only(mut self, track_id: &str, role: &str, path: &str, content: &[u8]) -> Self {
        self.add(track_id, role, path, content, Value::Null);
        self
    }

    /// Add a role the index lists with a `null` path.
    pub fn unavailable(mut self, track_id: &str, role: &str) -> Self {
        let files = self
            .tracks
            .entry(track_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(files) = files {
            files.insert(role.to_string(), json!([null, null]));
        }
        self
    }

    /// Add a dataset-level metadata file.
    pub fn metadata_file(mut self, role: &str, path: &str, content: &[u8]) -> Self {
        self.metadata
            .insert(role.to_string(), json!([path, md5_hex(content)]));
        self.contents.insert(path.to_string(), content.to_vec());
        self
    }

    /// The index document the fixture will register.
    pub fn index_json(&self) -> String {
        json!({
            "version": "test",
            "tracks": Value::Object(self.tracks.clone()),
            "metadata": Value::Object(self.metadata.clone()),
        })
        .to_string()
    }

    pub fn build(self) -> TestDataset {
        let descriptor = DatasetDescriptor::new(&self.name, &self.directory)
            .expect("TestDataset: invalid name or directory")
            .with_citation("@misc{fixture}")
            .with_download_instructions("Copy the fixture into {data_home}");
        let index = DatasetIndex::from_json_str(&self.index_json())
            .expect("TestDataset: generated index must parse");

        TestDataset {
            temp_dir: TempDir::new().unwrap(),
            dataset: RegisteredDataset::new(descriptor, index),
            contents: self.contents,
        }
    }
}

/// A registered dataset with a temporary data home.
pub struct TestDataset {
    temp_dir: TempDir,
    dataset: RegisteredDataset,
    contents: HashMap<String, Vec<u8>>,
}

impl TestDataset {
    pub fn builder(name: &str, directory: &str) -> TestDatasetBuilder {
        TestDatasetBuilder {
            name: name.to_string(),
            directory: directory.to_string(),
            tracks: Map::new(),
            metadata: Map::new(),
            contents: HashMap::new(),
        }
    }

    /// Three tracks, each with a checksummed audio file and a presence-only
    /// annotation.
    pub fn three_tracks() -> Self {
        let mut builder = Self::builder("Fixture Set", "Fixture-Set");
        for track in ["track_01", "track_02", "track_03"] {
            builder = builder
                .file(
                    track,
                    "audio",
                    &format!("audio/{track}.wav"),
                    format!("audio of {track}").as_bytes(),
                )
                .presence_only(
                    track,
                    "beats",
                    &format!("annotations/{track}.beats"),
                    b"0.5\t1\n1.0\t2\n",
                );
        }
        builder.build()
    }

    pub fn dataset(&self) -> &RegisteredDataset {
        &self.dataset
    }

    /// The data home root (parent of the dataset directory).
    pub fn data_home(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `<data_home>/<directory_name>`
    pub fn dataset_home(&self) -> PathBuf {
        self.data_home()
            .join(self.dataset.descriptor().directory_name())
    }

    /// Write the expected content of one indexed file.
    pub fn write(&self, relative_path: &str) {
        let content = self
            .contents
            .get(relative_path)
            .unwrap_or_else(|| panic!("TestDataset: {relative_path} is not indexed"));
        self.write_raw(relative_path, content);
    }

    /// Write every indexed file with its expected content.
    pub fn write_all(&self) {
        let mut paths: Vec<&String> = self.contents.keys().collect();
        paths.sort();
        for path in paths {
            self.write(path);
        }
    }

    /// Write arbitrary bytes under the dataset directory.
    pub fn write_raw(&self, relative_path: &str, content: &[u8]) {
        let path = self.dataset_home().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Remove a file under the dataset directory.
    pub fn remove(&self, relative_path: &str) {
        fs::remove_file(self.dataset_home().join(relative_path)).unwrap();
    }

    /// Assert that a file exists under the dataset directory.
    pub fn assert_file_exists(&self, relative_path: &str) {
        let path = self.dataset_home().join(relative_path);
        assert!(path.is_file(), "Expected file to exist: {}", path.display());
    }
}
