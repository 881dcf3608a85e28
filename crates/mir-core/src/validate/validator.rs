//! Validation of a dataset directory against its index

use mir_fs::list_relative_files;
use mir_meta::{FileEntry, RegisteredDataset, TrackIndexEntry};
use std::path::{Path, PathBuf};

use super::report::{FileRef, ValidationReport};
use crate::Result;

/// Compares the files under one dataset directory with the dataset index.
///
/// Integrity problems are collected into a [`ValidationReport`]; they never
/// abort the run. Only an I/O failure while digesting a file that exists is
/// returned as an error.
pub struct Validator<'a> {
    dataset: &'a RegisteredDataset,
    dataset_home: PathBuf,
}

impl<'a> Validator<'a> {
    /// Create a validator for `dataset` rooted at `dataset_home`
    /// (`<data_home>/<directory_name>`).
    pub fn new(dataset: &'a RegisteredDataset, dataset_home: impl Into<PathBuf>) -> Self {
        Self {
            dataset,
            dataset_home: dataset_home.into(),
        }
    }

    pub fn dataset_home(&self) -> &Path {
        &self.dataset_home
    }

    /// Validate every track, the dataset metadata files, and scan for
    /// files the index does not reference.
    pub fn run(&self) -> Result<ValidationReport> {
        let index = self.dataset.index();
        tracing::info!(
            dataset = self.dataset.descriptor().name(),
            dataset_home = ?self.dataset_home,
            tracks = index.len(),
            "Validating dataset"
        );

        let mut report = ValidationReport::new();
        for track in index.tracks() {
            report = report.merge(self.check_track(track)?);
        }

        for (role, entry) in index.metadata_files() {
            self.check_file(None, role, entry, &mut report)?;
        }

        report.unindexed_files = self.unindexed_files()?;

        tracing::info!(
            dataset = self.dataset.descriptor().name(),
            status = ?report.status(),
            missing = report.missing.len(),
            mismatched = report.mismatched_checksum.len(),
            unindexed = report.unindexed_files.len(),
            "Validation finished"
        );
        Ok(report)
    }

    /// Validate the files of a single track. No unindexed scan is done.
    pub fn check_track(&self, track: &TrackIndexEntry) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        for (role, entry) in track.files() {
            self.check_file(Some(track.track_id()), role, entry, &mut report)?;
        }
        Ok(report)
    }

    fn check_file(
        &self,
        track_id: Option<&str>,
        role: &str,
        entry: &FileEntry,
        report: &mut ValidationReport,
    ) -> Result<()> {
        let path = entry.relative_path.under(&self.dataset_home);
        let file_ref = || FileRef {
            track_id: track_id.map(String::from),
            role: role.to_string(),
            relative_path: entry.relative_path.to_string(),
        };

        if !path.is_file() {
            tracing::debug!(?track_id, role, ?path, "File missing");
            report.missing.push(file_ref());
            return Ok(());
        }

        if let Some(expected) = &entry.checksum {
            if !expected.matches_file(&path)? {
                tracing::debug!(?track_id, role, ?path, %expected, "Checksum mismatch");
                report.mismatched_checksum.push(file_ref());
            }
        }
        Ok(())
    }

    fn unindexed_files(&self) -> Result<Vec<String>> {
        let indexed = self.dataset.index().indexed_paths();
        let on_disk = list_relative_files(&self.dataset_home)?;
        Ok(on_disk
            .into_iter()
            .filter(|path| !indexed.contains(path))
            .map(|path| path.to_string())
            .collect())
    }
}
