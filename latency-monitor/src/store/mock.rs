//! In-memory store for testing.
//!
//! Files live in a shared map so a test can keep a clone, mutate the
//! "directory" between cycles and observe what the monitor reports.

use super::{MarkerStore, StoreError};
use latency_types::MarkerEntry;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory marker directory.
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct MockStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug)]
struct MockStoreInner {
    directory_present: bool,
    files: Vec<MockFile>,
    list_calls: usize,
    reads: Vec<String>,
}

#[derive(Debug, Clone)]
struct MockFile {
    name: String,
    modified_millis: i64,
    /// `None` makes every read fail.
    contents: Option<String>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Create an empty, present directory.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockStoreInner {
                directory_present: true,
                files: Vec::new(),
                list_calls: 0,
                reads: Vec::new(),
            })),
        }
    }

    /// Create or replace a file.
    pub fn put(&self, name: &str, modified_millis: i64, contents: &str) {
        self.upsert(MockFile {
            name: name.to_string(),
            modified_millis,
            contents: Some(contents.to_string()),
        });
    }

    /// Create or replace a file whose reads always fail.
    pub fn put_unreadable(&self, name: &str, modified_millis: i64) {
        self.upsert(MockFile {
            name: name.to_string(),
            modified_millis,
            contents: None,
        });
    }

    /// Change a file's mtime, keeping its contents.
    pub fn touch(&self, name: &str, modified_millis: i64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(file) = inner.files.iter_mut().find(|f| f.name == name) {
            file.modified_millis = modified_millis;
        }
    }

    /// Delete a file.
    pub fn remove(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.files.retain(|f| f.name != name);
    }

    /// Make the directory appear or disappear.
    pub fn set_directory_present(&self, present: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.directory_present = present;
    }

    /// Number of `list()` calls so far.
    pub fn list_calls(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.list_calls
    }

    /// Names of files read so far, in read order.
    pub fn reads(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.reads.clone()
    }

    fn upsert(&self, file: MockFile) {
        let mut inner = self.inner.lock().unwrap();
        match inner.files.iter_mut().find(|f| f.name == file.name) {
            Some(existing) => *existing = file,
            None => inner.files.push(file),
        }
    }
}

impl MarkerStore for MockStore {
    fn list(&self, dir: &Path, suffix: &str) -> Result<Vec<MarkerEntry>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.list_calls += 1;

        if !inner.directory_present {
            return Err(StoreError::DirectoryUnavailable {
                path: dir.to_path_buf(),
                source: Error::new(ErrorKind::NotFound, "mock directory absent"),
            });
        }

        Ok(inner
            .files
            .iter()
            .filter(|f| f.name.ends_with(suffix))
            .map(|f| MarkerEntry::new(f.name.clone(), dir.join(&f.name), f.modified_millis))
            .collect())
    }

    fn read_first_line(&self, path: &Path) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        inner.reads.push(name.clone());

        let read_failed = |kind: ErrorKind, msg: &str| StoreError::ReadFailed {
            path: PathBuf::from(path),
            source: Error::new(kind, msg),
        };

        match inner.files.iter().find(|f| f.name == name) {
            Some(MockFile {
                contents: Some(contents),
                ..
            }) => Ok(latency_core::first_line(contents).to_string()),
            Some(_) => Err(read_failed(ErrorKind::PermissionDenied, "mock unreadable")),
            None => Err(read_failed(ErrorKind::NotFound, "mock file absent")),
        }
    }
}
