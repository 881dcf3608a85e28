//! Validation report types
//!
//! Provides types for reporting discrepancies between a dataset index and
//! the files found on disk.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Overall status of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// Every indexed file is present with a matching checksum
    Valid,
    /// Files exist on disk that the index does not reference
    Unindexed,
    /// Some indexed files are absent
    Missing,
    /// Some files are present but have the wrong checksum
    Corrupted,
}

/// A file expected by the index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    /// Owning track; `None` for dataset-level metadata files
    pub track_id: Option<String>,
    /// Role of the file within its track, e.g. `audio`
    pub role: String,
    /// Path relative to the dataset directory
    pub relative_path: String,
}

impl FileRef {
    fn owner(&self) -> &str {
        self.track_id.as_deref().unwrap_or("(dataset)")
    }
}

/// Report from validating a dataset directory against its index
///
/// Entries are in index order: tracks in the order the index lists them,
/// roles in the order each track lists them, dataset metadata last.
/// Unindexed files are sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Indexed files absent from disk
    pub missing: Vec<FileRef>,
    /// Indexed files present with a different checksum
    pub mismatched_checksum: Vec<FileRef>,
    /// Files on disk not referenced by the index
    pub unindexed_files: Vec<String>,
}

impl ValidationReport {
    /// Create an empty, valid report
    pub fn new() -> Self {
        Self::default()
    }

    /// The worst problem in the report:
    /// Corrupted > Missing > Unindexed > Valid
    pub fn status(&self) -> ValidationStatus {
        if !self.mismatched_checksum.is_empty() {
            ValidationStatus::Corrupted
        } else if !self.missing.is_empty() {
            ValidationStatus::Missing
        } else if !self.unindexed_files.is_empty() {
            ValidationStatus::Unindexed
        } else {
            ValidationStatus::Valid
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status() == ValidationStatus::Valid
    }

    /// Append another report's findings, keeping order
    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.missing.extend(other.missing);
        self.mismatched_checksum.extend(other.mismatched_checksum);
        self.unindexed_files.extend(other.unindexed_files);
        self
    }

    /// Human-readable summary, identical for identical reports
    pub fn summary(&self, dataset_name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{dataset_name}: {} missing, {} invalid checksums, {} unindexed",
            self.missing.len(),
            self.mismatched_checksum.len(),
            self.unindexed_files.len()
        );

        if self.is_valid() {
            let _ = writeln!(out, "Success: the dataset is complete and all files are valid.");
            return out;
        }

        if !self.missing.is_empty() {
            let _ = writeln!(out, "Files missing:");
            for file in &self.missing {
                let _ = writeln!(out, "  {} {}: {}", file.owner(), file.role, file.relative_path);
            }
        }
        if !self.mismatched_checksum.is_empty() {
            let _ = writeln!(out, "Files with invalid checksums:");
            for file in &self.mismatched_checksum {
                let _ = writeln!(out, "  {} {}: {}", file.owner(), file.role, file.relative_path);
            }
        }
        if !self.unindexed_files.is_empty() {
            let _ = writeln!(out, "Files not in the index:");
            for path in &self.unindexed_files {
                let _ = writeln!(out, "  {path}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(track_id: Option<&str>, role: &str, path: &str) -> FileRef {
        FileRef {
            track_id: track_id.map(String::from),
            role: role.to_string(),
            relative_path: path.to_string(),
        }
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert_eq!(report.status(), ValidationStatus::Valid);
        assert!(report.is_valid());
    }

    #[test]
    fn test_status_is_worst_problem() {
        let mut report = ValidationReport::new();
        report.unindexed_files.push("stray.txt".to_string());
        assert_eq!(report.status(), ValidationStatus::Unindexed);

        report.missing.push(file(Some("0111"), "audio", "audio/0111.wav"));
        assert_eq!(report.status(), ValidationStatus::Missing);

        report
            .mismatched_checksum
            .push(file(Some("0201"), "beat", "beat/0201.txt"));
        assert_eq!(report.status(), ValidationStatus::Corrupted);
    }

    #[test]
    fn test_merge_keeps_order() {
        let first = ValidationReport {
            missing: vec![file(Some("a"), "audio", "a.wav")],
            ..Default::default()
        };
        let second = ValidationReport {
            missing: vec![file(Some("b"), "audio", "b.wav")],
            ..Default::default()
        };

        let merged = first.merge(second);
        let ids: Vec<_> = merged.missing.iter().map(|f| f.owner()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_summary_text() {
        let report = ValidationReport {
            missing: vec![
                file(Some("0111"), "audio", "audio/0111.wav"),
                file(None, "metadata", "metadata.json"),
            ],
            mismatched_checksum: vec![file(Some("0201"), "beat", "beat/0201.txt")],
            unindexed_files: vec!["notes.txt".to_string()],
        };

        assert_eq!(
            report.summary("Beatles"),
            "Beatles: 2 missing, 1 invalid checksums, 1 unindexed\n\
             Files missing:\n  \
             0111 audio: audio/0111.wav\n  \
             (dataset) metadata: metadata.json\n\
             Files with invalid checksums:\n  \
             0201 beat: beat/0201.txt\n\
             Files not in the index:\n  \
             notes.txt\n"
        );
    }

    #[test]
    fn test_summary_for_valid_report() {
        let summary = ValidationReport::new().summary("Beatles");
        assert!(summary.starts_with("Beatles: 0 missing, 0 invalid checksums, 0 unindexed\n"));
        assert!(summary.contains("Success"));
    }

    #[test]
    fn test_report_serializes() {
        let report = ValidationReport {
            missing: vec![file(Some("0111"), "audio", "audio/0111.wav")],
            ..Default::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
