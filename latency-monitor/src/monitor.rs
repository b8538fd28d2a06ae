//! The poll loop.
//!
//! [`Monitor`] owns everything a run needs: the scanner, the seen-set and
//! the table writer. It drives [`PollPhase`] and performs the actions it
//! asks for. Sleeping races against a [`CancellationToken`], so Ctrl+C (or a
//! test) ends the run between cycles without interrupting a scan.

use crate::scanner::{ScanStatus, Scanner};
use crate::store::MarkerStore;
use latency_core::{
    Clock, MonthBase, PollAction, PollEvent, PollPhase, PollSchedule, SeenSet, TableLayout,
    TableWriter, TimestampFormatter, Zone, DEFAULT_COLUMN_WIDTH,
};
use latency_types::{LatencyError, DEFAULT_MARKER_SUFFIX};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Settings for one monitor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Directory to poll.
    pub directory: PathBuf,
    /// Sleep between cycles.
    pub interval: Duration,
    /// Marker file name suffix.
    pub suffix: String,
    /// Minimum width of every column except the last.
    pub column_width: usize,
    /// Month numbering in timestamps.
    pub month_base: MonthBase,
    /// Stop after this many cycles; `None` runs until cancelled.
    pub max_cycles: Option<u64>,
}

impl MonitorConfig {
    /// Defaults for everything but the directory and interval.
    pub fn new(directory: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            directory: directory.into(),
            interval,
            suffix: DEFAULT_MARKER_SUFFIX.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
            month_base: MonthBase::Zero,
            max_cycles: None,
        }
    }

    /// Reject settings the loop cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`LatencyError::InvalidConfig`] for an empty suffix, a zero
    /// column width or a zero cycle bound.
    pub fn validate(&self) -> Result<(), LatencyError> {
        if self.suffix.is_empty() {
            return Err(LatencyError::InvalidConfig(
                "marker suffix must not be empty".into(),
            ));
        }
        if self.column_width == 0 {
            return Err(LatencyError::InvalidConfig(
                "column width must be at least 1".into(),
            ));
        }
        if self.max_cycles == Some(0) {
            return Err(LatencyError::InvalidConfig(
                "cycle bound must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn schedule(&self) -> PollSchedule {
        PollSchedule {
            interval: self.interval,
            max_cycles: self.max_cycles,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Scan cycles completed.
    pub cycles: u64,
    /// Rows printed.
    pub rows: u64,
    /// Distinct events recorded.
    pub seen: usize,
}

/// Polls a directory and prints new marker events.
pub struct Monitor<S, C, Z: Zone, W: Write> {
    scanner: Scanner<S, C, Z>,
    seen: SeenSet,
    table: TableWriter<W>,
    schedule: PollSchedule,
}

impl<S: MarkerStore, C: Clock, Z: Zone, W: Write> Monitor<S, C, Z, W> {
    /// Build a monitor from validated settings and injected collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`LatencyError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        config: &MonitorConfig,
        store: S,
        clock: C,
        zone: Z,
        out: W,
    ) -> Result<Self, LatencyError> {
        config.validate()?;

        let formatter = TimestampFormatter::new(zone).with_month_base(config.month_base);
        Ok(Self {
            scanner: Scanner::new(
                store,
                clock,
                formatter,
                config.directory.clone(),
                config.suffix.clone(),
            ),
            seen: SeenSet::new(),
            table: TableWriter::new(out, TableLayout::new(config.column_width)),
            schedule: config.schedule(),
        })
    }

    /// Events recorded so far.
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Consume the monitor and return the output stream.
    pub fn into_output(self) -> W {
        self.table.into_inner()
    }

    /// Print the table header.
    ///
    /// # Errors
    ///
    /// Returns [`LatencyError::Output`] if the stream cannot be written.
    pub fn write_header(&mut self) -> Result<(), LatencyError> {
        self.table.write_header()?;
        self.table.flush()?;
        Ok(())
    }

    /// Run one scan, printing each row as soon as it is built. Returns the
    /// number of rows printed.
    ///
    /// # Errors
    ///
    /// Returns [`LatencyError::Output`] if the stream cannot be written.
    /// Directory and file problems are not errors.
    pub fn cycle(&mut self) -> Result<usize, LatencyError> {
        let table = &mut self.table;
        let mut first = true;
        let status = self.scanner.scan_with(&mut self.seen, |row| {
            if first {
                table.begin_rows()?;
                first = false;
            }
            table.write_row(&row)?;
            table.flush()
        })?;

        Ok(match status {
            ScanStatus::Listed { rows } => rows,
            ScanStatus::DirectoryUnavailable => 0,
        })
    }

    /// Print the header, then poll until cancelled or the cycle bound is hit.
    ///
    /// # Errors
    ///
    /// Returns [`LatencyError::Output`] if the stream cannot be written.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<RunSummary, LatencyError> {
        tracing::info!(
            "Poll loop started (interval: {}ms, directory: {})",
            self.schedule.interval.as_millis(),
            self.scanner.directory().display()
        );
        self.write_header()?;

        let mut summary = RunSummary::default();
        let mut phase = PollPhase::new();
        let mut event = PollEvent::Start;

        loop {
            let (next, actions) = phase.on_event(event, &self.schedule);
            phase = next;

            let mut next_event = None;
            for action in actions {
                match action {
                    PollAction::Scan => {
                        if cancel.is_cancelled() {
                            next_event = Some(PollEvent::CancelRequested);
                            break;
                        }
                        summary.rows += self.cycle()? as u64;
                        summary.cycles += 1;
                        next_event = Some(PollEvent::ScanCompleted);
                    }
                    PollAction::Heartbeat => {
                        self.table.write_heartbeat()?;
                        self.table.flush()?;
                    }
                    PollAction::Sleep(interval) => {
                        next_event = Some(tokio::select! {
                            biased;
                            _ = cancel.cancelled() => {
                                tracing::info!("Poll loop interrupted during sleep");
                                PollEvent::CancelRequested
                            }
                            _ = tokio::time::sleep(interval) => PollEvent::IntervalElapsed,
                        });
                    }
                    PollAction::Stop => {}
                }
            }

            match next_event {
                Some(e) => event = e,
                None => break,
            }
        }

        self.table.flush()?;
        summary.seen = self.seen.len();
        tracing::info!(
            "Poll loop stopped after {} cycles ({} rows)",
            summary.cycles,
            summary.rows
        );
        Ok(summary)
    }
}
