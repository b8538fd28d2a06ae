//! # fst-latency
//!
//! Detects sync latency across cluster nodes. Run it simultaneously on two
//! or more nodes that share a synchronized folder; each prints exactly when
//! it sees marker files (`*.fst`) appear or change.
//!
//! ## Example
//!
//! ```bash
//! # Poll every 50ms
//! fst-latency 50 /home/csuser/Shared/clustersync
//!
//! # Settings from a file, normalized months, stop after 100 cycles
//! fst-latency --config fst-latency.toml --one-based-month --cycles 100
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`); the table goes to stdout.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use latency_core::{LocalZone, SystemClock};
use latency_monitor::{LocalStore, Monitor};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod config;
mod diagnostics;

use config::{CliOverrides, Config};

const BANNER: &str = "\
This utility tries to detect latency issues across cluster nodes.
Run it simultaneously on two or more cluster nodes and they will
report exactly when changes are seen on the clustersync folder.";

const EXAMPLE: &str = " e.g.: fst-latency 50 /home/csuser/Shared/clustersync";

/// Report when cluster-sync marker files appear on this node.
#[derive(Parser, Debug)]
#[command(name = "fst-latency")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sleep between directory scans, in milliseconds
    interval_ms: Option<u64>,

    /// Shared directory to watch
    directory: Option<PathBuf>,

    /// TOML file with [poll], [output] and [diagnostics] sections
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Marker file suffix
    #[arg(long)]
    suffix: Option<String>,

    /// Minimum width of every column except the last
    #[arg(long)]
    column_width: Option<usize>,

    /// Print months as 1-12 instead of 0-11
    #[arg(long)]
    one_based_month: bool,

    /// Stop after this many scan cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Skip the startup configuration/host/environment dump
    #[arg(long)]
    no_diagnostics: bool,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            interval_ms: cli.interval_ms,
            directory: cli.directory.clone(),
            suffix: cli.suffix.clone(),
            column_width: cli.column_width,
            one_based_month: cli.one_based_month,
            cycles: cli.cycles,
            no_diagnostics: cli.no_diagnostics,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let file_config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Nothing to watch is not an error
    let Some(settings) = file_config.resolve(&CliOverrides::from(&cli)) else {
        print_usage();
        return Ok(());
    };

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone()).await;

    let mut stdout = std::io::stdout();
    if settings.diagnostics {
        diagnostics::dump(&mut stdout, &settings.monitor)
            .context("Failed to print diagnostics")?;
    }

    let mut monitor = Monitor::new(
        &settings.monitor,
        LocalStore::new(),
        SystemClock,
        LocalZone,
        stdout,
    )
    .context("Invalid monitor settings")?;

    let summary = monitor.run(cancel).await.context("Report output failed")?;

    println!();
    tracing::info!(
        "Observed {} marker events in {} cycles",
        summary.seen,
        summary.cycles
    );

    Ok(())
}

/// Spawn a task that cancels `cancel` on Ctrl+C.
///
/// The handler is installed on the task's first poll, so yield once to let
/// it run before any blocking work starts.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => cancel.cancel(),
            Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });
    tokio::task::yield_now().await;
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("{}", BANNER);
    println!("{}", Cli::command().render_usage());
    println!("{}", EXAMPLE);
}
