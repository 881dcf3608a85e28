//! Enumeration of files present under a dataset directory

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// List every regular file under `root`, relative to `root`, sorted.
///
/// A missing `root` yields an empty list: a dataset that was never
/// downloaded simply has no files on disk. Symlinks are followed so that
/// datasets assembled from linked directories are scanned like plain ones.
/// Dangling links and link cycles are logged and skipped.
///
/// # Errors
///
/// Returns [`Error::Io`] if a directory under `root` cannot be read.
pub fn list_relative_files(root: &Path) -> Result<Vec<NormalizedPath>> {
    if !root.is_dir() {
        tracing::debug!(?root, "Dataset directory absent, nothing to enumerate");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_unfollowable_link(&e) => {
                tracing::warn!(path = ?e.path(), error = %e, "Skipping unfollowable symlink");
                continue;
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                return Err(Error::io(path, e.into()));
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        // Every entry yielded by the walk lives under `root`.
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(NormalizedPath::new(relative));
        }
    }

    files.sort();
    Ok(files)
}

/// A link cycle, or a symlink whose target does not exist.
fn is_unfollowable_link(error: &walkdir::Error) -> bool {
    if error.loop_ancestor().is_some() {
        return true;
    }
    let dangling = error
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    dangling
        && error
            .path()
            .and_then(|path| fs::symlink_metadata(path).ok())
            .is_some_and(|meta| meta.file_type().is_symlink())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_relative_files(&dir.path().join("never-downloaded")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn lists_nested_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::create_dir_all(dir.path().join("annotations/beats")).unwrap();
        std::fs::write(dir.path().join("audio/b.wav"), b"b").unwrap();
        std::fs::write(dir.path().join("audio/a.wav"), b"a").unwrap();
        std::fs::write(dir.path().join("annotations/beats/a.txt"), b"0.5").unwrap();

        let files: Vec<String> = list_relative_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.to_string())
            .collect();

        assert_eq!(
            files,
            vec!["annotations/beats/a.txt", "audio/a.wav", "audio/b.wav"]
        );
    }

    #[test]
    fn directories_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        assert!(list_relative_files(dir.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/a.wav"), b"a").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("audio/never-there.wav"),
            dir.path().join("audio/partial.wav"),
        )
        .unwrap();

        let files: Vec<String> = list_relative_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(files, vec!["audio/a.wav"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/a.wav"), b"a").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("audio/loop")).unwrap();

        let files: Vec<String> = list_relative_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(files, vec!["audio/a.wav"]);
    }
}
