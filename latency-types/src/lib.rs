//! # latency-types
//!
//! Value types shared by the fst-latency crates:
//! - [`SeenKey`] - identity of one observed marker-file event
//! - [`MarkerEntry`] - a marker file as seen in a directory listing
//! - [`ReportRow`] - one printed line of the latency table
//! - [`LatencyError`] - error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod marker;

pub use error::LatencyError;
pub use ids::SeenKey;
pub use marker::{MarkerEntry, ReportRow, DEFAULT_MARKER_SUFFIX};
