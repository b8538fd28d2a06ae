//! Filesystem abstraction for marker directories.
//!
//! The scanner only needs two operations:
//! - `list()` returns the regular files in a directory whose names end with
//!   the marker suffix, with their mtimes
//! - `read_first_line()` returns the first line of one file
//!
//! [`LocalStore`] talks to the real filesystem; [`MockStore`] keeps files in
//! memory so scans can be tested without touching disk or waiting on mtime
//! granularity.

mod local;
mod mock;

pub use local::LocalStore;
pub use mock::MockStore;

use latency_types::MarkerEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The directory is missing or cannot be listed.
    #[error("directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file could not be opened or read.
    #[error("read failed: {path}: {source}")]
    ReadFailed {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Read access to a directory of marker files.
pub trait MarkerStore {
    /// List the regular files in `dir` whose names end with `suffix`, in
    /// whatever order the store yields.
    fn list(&self, dir: &Path, suffix: &str) -> Result<Vec<MarkerEntry>, StoreError>;

    /// Read the first line of the file at `path`, without its terminator.
    fn read_first_line(&self, path: &Path) -> Result<String, StoreError>;
}
