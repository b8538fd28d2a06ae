//! # latency-core
//!
//! Pure logic for fst-latency (no filesystem I/O, instant tests).
//!
//! This crate holds everything about a poll cycle that can be decided
//! without touching the disk:
//! - [`timestamp`] - the diffable `YYYY/M/D_H:MM:SS.mmm,Z<h>,D<h>` format
//! - [`payload`] - first-line handling and inner timestamp extraction
//! - [`seen`] - the append-only set of already reported events
//! - [`table`] - fixed-width column layout for the report table
//! - [`state`] - the poll loop state machine
//!
//! Directory listing, file reads and sleeping are done by `latency-monitor`,
//! which drives these pieces.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod payload;
pub mod seen;
pub mod state;
pub mod table;
pub mod timestamp;

pub use payload::{extract_inner_timestamp, first_line};
pub use seen::SeenSet;
pub use state::{PollAction, PollEvent, PollPhase, PollSchedule};
pub use table::{TableLayout, TableWriter, COLUMN_TITLES, DEFAULT_COLUMN_WIDTH};
pub use timestamp::{
    Clock, FixedClock, FixedZone, LocalZone, MonthBase, SystemClock, TimestampFormatter, Zone,
    ZonedInstant, NULL_DATE,
};
