//! Uniform access to one registered dataset

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use mir_meta::{
    DatasetDescriptor, DatasetIndex, RegisteredDataset, TrackIndexEntry, builtin_registry,
};

use crate::validate::{ValidationReport, Validator};
use crate::{DataHome, Error, PathResolver, Result, Track};

/// Role of the dataset-level metadata file in an index.
const METADATA_ROLE: &str = "metadata";

/// Open a built-in dataset by module key with the process-wide resolver.
///
/// # Errors
///
/// - [`mir_meta::Error::DatasetNotFound`] for unknown keys
/// - [`Error::InvalidSettings`] if the user's settings file is malformed
pub fn dataset(module_key: &str) -> Result<Dataset<'static>> {
    let entry = builtin_registry().get(module_key)?;
    Ok(Dataset::new(entry, PathResolver::global()?))
}

/// A registered dataset together with the resolver for its data home.
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    entry: &'a RegisteredDataset,
    resolver: &'a PathResolver,
}

impl<'a> Dataset<'a> {
    pub fn new(entry: &'a RegisteredDataset, resolver: &'a PathResolver) -> Self {
        Self { entry, resolver }
    }

    pub fn descriptor(&self) -> &'a DatasetDescriptor {
        self.entry.descriptor()
    }

    pub fn index(&self) -> &'a DatasetIndex {
        self.entry.index()
    }

    pub fn name(&self) -> &'a str {
        self.entry.descriptor().name()
    }

    /// Track ids in index order.
    pub fn track_ids(&self) -> Vec<&'a str> {
        self.entry.index().track_ids()
    }

    fn index_entry(&self, track_id: &str) -> Result<&'a TrackIndexEntry> {
        self.entry
            .index()
            .entry(track_id)
            .map_err(|_| Error::InvalidTrackId {
                track_id: track_id.to_string(),
                dataset: self.name().to_string(),
            })
    }

    /// `<data root>/<directory_name>` for the given data home.
    pub fn dataset_home(&self, data_home: &DataHome) -> PathBuf {
        self.resolver
            .resolve(data_home, self.entry.descriptor().directory_name())
    }

    /// Construct the track `track_id` bound to `data_home`.
    ///
    /// Nothing is read from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTrackId`] when the id is not in the index.
    pub fn track(&self, track_id: &str, data_home: &DataHome) -> Result<Track> {
        let entry = self.index_entry(track_id)?;

        let data_root = self.resolver.data_root(data_home);
        let dataset_home = self.dataset_home(data_home);
        let files = entry
            .files()
            .iter()
            .map(|(role, file)| (role.clone(), file.relative_path.under(&dataset_home)))
            .collect();
        let metadata_path = self
            .entry
            .index()
            .metadata_file(METADATA_ROLE)
            .map(|file| file.relative_path.under(&dataset_home));

        Ok(Track::new(
            track_id,
            data_root,
            dataset_home,
            files,
            metadata_path,
        ))
    }

    /// Construct every track in the index, keyed by track id.
    ///
    /// The key set always equals [`Dataset::track_ids`], whatever exists on
    /// disk.
    pub fn load(&self, data_home: &DataHome) -> Result<BTreeMap<String, Track>> {
        self.track_ids()
            .into_iter()
            .map(|track_id| Ok((track_id.to_string(), self.track(track_id, data_home)?)))
            .collect()
    }

    /// A track picked uniformly at random, `None` for an empty index.
    pub fn choice(&self, data_home: &DataHome) -> Result<Option<Track>> {
        self.choice_with(&mut rand::thread_rng(), data_home)
    }

    /// [`Dataset::choice`] with a caller-supplied random source.
    pub fn choice_with(&self, rng: &mut impl Rng, data_home: &DataHome) -> Result<Option<Track>> {
        self.track_ids()
            .choose(rng)
            .map(|track_id| self.track(track_id, data_home))
            .transpose()
    }

    /// Validate the on-disk dataset against the index.
    ///
    /// With `silence == false` a summary is also printed to stdout; the
    /// returned report is the same either way. A dataset that was never
    /// downloaded yields a report listing every file as missing.
    pub fn validate(&self, data_home: &DataHome, silence: bool) -> Result<ValidationReport> {
        if silence {
            Validator::new(self.entry, self.dataset_home(data_home)).run()
        } else {
            self.validate_to(data_home, &mut io::stdout().lock())
        }
    }

    /// Validate and write the summary to `out`.
    ///
    /// A failed write is logged; the report is returned regardless.
    pub fn validate_to(
        &self,
        data_home: &DataHome,
        out: &mut impl Write,
    ) -> Result<ValidationReport> {
        let report = Validator::new(self.entry, self.dataset_home(data_home)).run()?;
        let written = out
            .write_all(report.summary(self.name()).as_bytes())
            .and_then(|()| out.flush());
        if let Err(e) = written {
            tracing::warn!(dataset = self.name(), error = %e, "Failed to write validation summary");
        }
        Ok(report)
    }

    /// Validate the files of one track.
    pub fn validate_track(&self, track_id: &str, data_home: &DataHome) -> Result<ValidationReport> {
        let entry = self.index_entry(track_id)?;
        Validator::new(self.entry, self.dataset_home(data_home)).check_track(entry)
    }

    /// Dataset metadata records keyed by track id.
    ///
    /// Returns `Ok(None)` when the dataset has no metadata file or it has
    /// not been downloaded.
    pub fn metadata(&self, data_home: &DataHome) -> Result<Option<Map<String, Value>>> {
        let Some(file) = self.entry.index().metadata_file(METADATA_ROLE) else {
            return Ok(None);
        };
        let path = file.relative_path.under(&self.dataset_home(data_home));
        if !path.is_file() {
            tracing::info!(?path, "Metadata file not found");
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| mir_fs::Error::io(&path, e))?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(records) => Ok(Some(records)),
            _ => Ok(None),
        }
    }

    /// Write the dataset citation to `out`.
    pub fn cite_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "========== BibTeX ==========")?;
        match self.descriptor().citation() {
            Some(citation) => writeln!(out, "{}", citation.trim_end()),
            None => writeln!(out, "No citation available for {}", self.name()),
        }
    }

    /// Print the dataset citation to stdout.
    pub fn cite(&self) -> io::Result<()> {
        self.cite_to(&mut io::stdout().lock())
    }
}
