//! # latency-monitor
//!
//! Polls a synchronized directory for marker files and reports each new
//! event as a row of the latency table.
//!
//! ## Architecture
//!
//! ```text
//!  Monitor::run ──► Scanner::scan_with ──► MarkerStore::list / read_first_line
//!       │                  │
//!       │                  ├──► SeenSet (dedup by name + mtime)
//!       │                  ├──► TimestampFormatter
//!       │                  └──► row sink ──► TableWriter ──► stdout
//!       └──► heartbeat ──► TableWriter
//! ```
//!
//! The loop is single-threaded: one scan at a time, and the seen-set is
//! owned by the [`Monitor`] so no locking is needed. Cancellation is
//! cooperative through a [`tokio_util::sync::CancellationToken`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod monitor;
pub mod scanner;
pub mod store;

pub use monitor::{Monitor, MonitorConfig, RunSummary};
pub use scanner::{ScanOutcome, ScanStatus, Scanner};
pub use store::{LocalStore, MarkerStore, MockStore, StoreError};
