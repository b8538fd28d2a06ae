//! One pass over the marker directory.
//!
//! For every file whose name ends with the marker suffix, the scanner builds
//! a [`SeenKey`] from the name and formatted mtime. Unseen keys are recorded
//! and turned into [`ReportRow`]s; seen keys are skipped.
//!
//! Keys are recorded before the file is read, so a file that cannot be read
//! is still reported once (with empty contents) and is not retried until its
//! mtime changes.

use crate::store::MarkerStore;
use latency_core::{extract_inner_timestamp, Clock, SeenSet, TimestampFormatter, Zone};
use latency_types::{ReportRow, SeenKey};
use std::convert::Infallible;
use std::path::{Path, PathBuf};

/// Result of one scan, with the new rows collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The directory was listed; these rows are new, in listing order.
    Rows(Vec<ReportRow>),
    /// The directory could not be listed; nothing was recorded.
    DirectoryUnavailable,
}

impl ScanOutcome {
    /// The new rows, empty when the directory was unavailable.
    pub fn rows(&self) -> &[ReportRow] {
        match self {
            Self::Rows(rows) => rows,
            Self::DirectoryUnavailable => &[],
        }
    }
}

/// Result of one streamed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// The directory was listed and this many rows were emitted.
    Listed {
        /// Rows handed to the sink.
        rows: usize,
    },
    /// The directory could not be listed; nothing was recorded.
    DirectoryUnavailable,
}

/// Scans one directory for new marker events.
#[derive(Debug, Clone)]
pub struct Scanner<S, C, Z: Zone> {
    store: S,
    clock: C,
    formatter: TimestampFormatter<Z>,
    directory: PathBuf,
    suffix: String,
}

impl<S: MarkerStore, C: Clock, Z: Zone> Scanner<S, C, Z> {
    /// Create a scanner over `directory` matching names ending in `suffix`.
    pub fn new(
        store: S,
        clock: C,
        formatter: TimestampFormatter<Z>,
        directory: impl Into<PathBuf>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            formatter,
            directory: directory.into(),
            suffix: suffix.into(),
        }
    }

    /// Directory being scanned.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// List the directory and report every marker event not yet in `seen`.
    ///
    /// Rows are collected; see [`Scanner::scan_with`] to handle each row as
    /// soon as it is built.
    pub fn scan(&self, seen: &mut SeenSet) -> ScanOutcome {
        let mut rows = Vec::new();
        let status = self.scan_with(seen, |row| {
            rows.push(row);
            Ok::<(), Infallible>(())
        });

        match status {
            Ok(ScanStatus::Listed { .. }) => ScanOutcome::Rows(rows),
            Ok(ScanStatus::DirectoryUnavailable) => ScanOutcome::DirectoryUnavailable,
            Err(never) => match never {},
        }
    }

    /// List the directory and hand every new marker event to `emit` as soon
    /// as its file has been read.
    ///
    /// A missing or unreadable directory is logged and yields
    /// [`ScanStatus::DirectoryUnavailable`]. The only error is one returned
    /// by `emit`, which stops the scan; keys already recorded stay recorded.
    pub fn scan_with<F, E>(&self, seen: &mut SeenSet, mut emit: F) -> Result<ScanStatus, E>
    where
        F: FnMut(ReportRow) -> Result<(), E>,
    {
        let entries = match self.store.list(&self.directory, &self.suffix) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Scan skipped: {}", e);
                return Ok(ScanStatus::DirectoryUnavailable);
            }
        };

        let mut emitted = 0;
        for entry in entries {
            let file_modified_at = self.formatter.format_millis(Some(entry.modified_millis));
            if !seen.add(SeenKey::new(&entry.name, &file_modified_at)) {
                continue;
            }

            let detected_at = self.formatter.format_millis(Some(self.clock.now_millis()));
            let contents = match self.store.read_first_line(&entry.path) {
                Ok(line) => Some(line),
                Err(e) => {
                    tracing::warn!("Marker unreadable, reporting without contents: {}", e);
                    None
                }
            };
            let inner_timestamp = self
                .formatter
                .format_millis(extract_inner_timestamp(contents.as_deref()));

            tracing::debug!(file = %entry.name, "New marker event");
            emit(ReportRow {
                detected_at,
                file_modified_at,
                raw_contents: contents.unwrap_or_default(),
                inner_timestamp,
                file_name: entry.name,
            })?;
            emitted += 1;
        }

        Ok(ScanStatus::Listed { rows: emitted })
    }
}
