//! Error types for fst-latency.

use thiserror::Error;

/// Errors that can stop a latency monitor.
///
/// Per-file and per-directory problems are not errors: they degrade to
/// placeholder values or skipped cycles and never reach this type.
#[derive(Debug, Error)]
pub enum LatencyError {
    /// Writing the report table failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Monitor settings are unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
