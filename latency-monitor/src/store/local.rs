//! Real filesystem store.

use super::{MarkerStore, StoreError};
use chrono::{DateTime, Utc};
use latency_core::first_line;
use latency_types::MarkerEntry;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads marker directories from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    /// Create a new local store.
    pub fn new() -> Self {
        Self
    }
}

impl MarkerStore for LocalStore {
    fn list(&self, dir: &Path, suffix: &str) -> Result<Vec<MarkerEntry>, StoreError> {
        let unavailable = |source| StoreError::DirectoryUnavailable {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;

            // Name check first: only markers cost a stat
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(suffix) {
                continue;
            }
            let path = entry.path();

            // Follows symlinks, so a linked marker reports its target's mtime
            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::debug!("Skipping {}: no mtime: {}", path.display(), e);
                    continue;
                }
            };

            entries.push(MarkerEntry {
                name,
                path,
                modified_millis: DateTime::<Utc>::from(modified).timestamp_millis(),
            });
        }

        Ok(entries)
    }

    fn read_first_line(&self, path: &Path) -> Result<String, StoreError> {
        let read_failed = |source| StoreError::ReadFailed {
            path: path.to_path_buf(),
            source,
        };

        // The handle is dropped on every return path
        let mut reader = BufReader::new(File::open(path).map_err(read_failed)?);
        let mut buf = Vec::new();
        reader.read_until(b'\n', &mut buf).map_err(read_failed)?;

        Ok(first_line(&String::from_utf8_lossy(&buf)).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn lists_regular_marker_files_with_mtimes() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.fst"), "ts=1").unwrap();
        std::fs::write(dir.path().join("b.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("nested.fst")).unwrap();

        let entries = LocalStore.list(dir.path(), ".fst").unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.fst"]);
        assert_eq!(entries[0].path, dir.path().join("a.fst"));
        assert!(entries[0].modified_millis > 0);
    }

    #[cfg(unix)]
    #[test]
    fn suffix_is_checked_before_metadata() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.fst"), "ts=1").unwrap();
        // Dangling links fail metadata(); only the marker one reaches it
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.txt"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.fst"))
            .unwrap();

        let entries = LocalStore.list(dir.path(), ".fst").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.fst");

        let entries = LocalStore.list(dir.path(), ".txt").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = LocalStore.list(&missing, ".fst").unwrap_err();
        match err {
            StoreError::DirectoryUnavailable { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_only_the_first_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.fst");
        std::fs::write(&path, "ts=1700000000000&foo=bar\r\nsecond line\n").unwrap();

        assert_eq!(
            LocalStore.read_first_line(&path).unwrap(),
            "ts=1700000000000&foo=bar"
        );
    }

    #[test]
    fn reads_file_without_terminator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.fst");
        std::fs::write(&path, "ts=5").unwrap();

        assert_eq!(LocalStore.read_first_line(&path).unwrap(), "ts=5");
    }

    #[test]
    fn empty_file_reads_as_empty_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.fst");
        std::fs::write(&path, "").unwrap();

        assert_eq!(LocalStore.read_first_line(&path).unwrap(), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.fst");
        std::fs::write(&path, [b't', b's', b'=', 0xFF, b'\n']).unwrap();

        assert_eq!(LocalStore.read_first_line(&path).unwrap(), "ts=\u{FFFD}");
    }

    #[test]
    fn missing_file_is_read_failure() {
        let dir = tempdir().unwrap();
        let err = LocalStore
            .read_first_line(&dir.path().join("nope.fst"))
            .unwrap_err();
        assert!(matches!(err, StoreError::ReadFailed { .. }));
    }
}
