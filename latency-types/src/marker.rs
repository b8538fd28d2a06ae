//! Marker files and report rows.

use std::path::PathBuf;

/// File name suffix that identifies marker files.
pub const DEFAULT_MARKER_SUFFIX: &str = ".fst";

/// A marker file as returned by a directory listing.
///
/// Ephemeral: it describes the file at listing time only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEntry {
    /// File name, unique within the directory.
    pub name: String,
    /// Full path used to read the file.
    pub path: PathBuf,
    /// Filesystem modification time, milliseconds since the Unix epoch.
    pub modified_millis: i64,
}

impl MarkerEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, modified_millis: i64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            modified_millis,
        }
    }
}

/// One line of the latency table.
///
/// Built once per newly observed marker file, printed, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Local wall-clock time at detection.
    pub detected_at: String,
    /// Formatted file modification time.
    pub file_modified_at: String,
    /// First line of the file, unmodified.
    pub raw_contents: String,
    /// Formatted timestamp parsed from the contents, or `null date`.
    pub inner_timestamp: String,
    /// File name.
    pub file_name: String,
}

impl ReportRow {
    /// Fields in column order.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.detected_at,
            &self.file_modified_at,
            &self.raw_contents,
            &self.inner_timestamp,
            &self.file_name,
        ]
    }
}
