//! Configuration loading for fst-latency.
//!
//! Settings come from an optional TOML file (`--config`) and the command
//! line; command-line values win. The interval and directory have no
//! defaults: if neither source provides them the tool prints usage.

use latency_core::{MonthBase, DEFAULT_COLUMN_WIDTH};
use latency_monitor::MonitorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Polling configuration.
    #[serde(default)]
    pub poll: PollConfig,
    /// Table output configuration.
    #[serde(default)]
    pub output: OutputConfig,
    /// Startup dump configuration.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Polling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Sleep between scans in milliseconds.
    pub interval_ms: Option<u64>,
    /// Shared directory to watch.
    pub directory: Option<PathBuf>,
    /// Marker file suffix (default: `.fst`).
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

/// Table output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Minimum column width (default: 32).
    #[serde(default = "default_column_width")]
    pub column_width: usize,
    /// Print months as 1-12 instead of 0-11 (default: false).
    #[serde(default)]
    pub one_based_month: bool,
}

/// Startup dump configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    /// Print configuration, host facts and environment before polling
    /// (default: true).
    #[serde(default = "default_diagnostics_enabled")]
    pub enabled: bool,
}

fn default_suffix() -> String {
    ".fst".to_string()
}

fn default_column_width() -> usize {
    DEFAULT_COLUMN_WIDTH
}

fn default_diagnostics_enabled() -> bool {
    true
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: None,
            directory: None,
            suffix: default_suffix(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            column_width: default_column_width(),
            one_based_month: false,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_diagnostics_enabled(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Positional interval.
    pub interval_ms: Option<u64>,
    /// Positional directory.
    pub directory: Option<PathBuf>,
    /// `--suffix`
    pub suffix: Option<String>,
    /// `--column-width`
    pub column_width: Option<usize>,
    /// `--one-based-month`
    pub one_based_month: bool,
    /// `--cycles`
    pub cycles: Option<u64>,
    /// `--no-diagnostics`
    pub no_diagnostics: bool,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Monitor settings.
    pub monitor: MonitorConfig,
    /// Whether to print the startup dump.
    pub diagnostics: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Merge command-line values over this file configuration.
    ///
    /// Returns `None` when the interval or directory is missing from both.
    pub fn resolve(self, cli: &CliOverrides) -> Option<Settings> {
        let interval_ms = cli.interval_ms.or(self.poll.interval_ms)?;
        let directory = cli.directory.clone().or(self.poll.directory)?;

        let month_base = if cli.one_based_month || self.output.one_based_month {
            MonthBase::One
        } else {
            MonthBase::Zero
        };

        Some(Settings {
            monitor: MonitorConfig {
                directory,
                interval: Duration::from_millis(interval_ms),
                suffix: cli.suffix.clone().unwrap_or(self.poll.suffix),
                column_width: cli.column_width.unwrap_or(self.output.column_width),
                month_base,
                max_cycles: cli.cycles,
            },
            diagnostics: self.diagnostics.enabled && !cli.no_diagnostics,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn positional(interval_ms: u64, directory: &str) -> CliOverrides {
        CliOverrides {
            interval_ms: Some(interval_ms),
            directory: Some(PathBuf::from(directory)),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn default_config_has_no_target() {
        let config = Config::default();
        assert_eq!(config.poll.interval_ms, None);
        assert_eq!(config.poll.directory, None);
        assert_eq!(config.poll.suffix, ".fst");
        assert_eq!(config.output.column_width, 32);
        assert!(!config.output.one_based_month);
        assert!(config.diagnostics.enabled);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[poll]
interval_ms = 50
directory = "/home/csuser/Shared/clustersync"
suffix = ".mark"

[output]
column_width = 40
one_based_month = true

[diagnostics]
enabled = false
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.poll.interval_ms, Some(50));
        assert_eq!(
            config.poll.directory,
            Some(PathBuf::from("/home/csuser/Shared/clustersync"))
        );
        assert_eq!(config.poll.suffix, ".mark");
        assert_eq!(config.output.column_width, 40);
        assert!(config.output.one_based_month);
        assert!(!config.diagnostics.enabled);
    }

    #[test]
    fn config_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[poll]\ninterval_ms = 10\n").unwrap();
        assert_eq!(config.poll.interval_ms, Some(10));
        assert_eq!(config.poll.suffix, ".fst");
        assert_eq!(config.output.column_width, 32);
        assert!(config.diagnostics.enabled);
    }

    #[test]
    fn positional_arguments_alone_resolve() {
        let settings = Config::default()
            .resolve(&positional(50, "/sync"))
            .unwrap();
        assert_eq!(
            settings.monitor,
            MonitorConfig::new("/sync", Duration::from_millis(50))
        );
        assert!(settings.diagnostics);
    }

    #[test]
    fn missing_interval_or_directory_is_unresolved() {
        let only_interval = CliOverrides {
            interval_ms: Some(50),
            ..CliOverrides::default()
        };
        assert!(Config::default().resolve(&only_interval).is_none());

        let only_directory = CliOverrides {
            directory: Some(PathBuf::from("/sync")),
            ..CliOverrides::default()
        };
        assert!(Config::default().resolve(&only_directory).is_none());
        assert!(Config::default().resolve(&CliOverrides::default()).is_none());
    }

    #[test]
    fn command_line_overrides_file() {
        let config: Config = toml::from_str(
            r#"
[poll]
interval_ms = 1000
directory = "/from/file"
suffix = ".mark"
[output]
column_width = 20
"#,
        )
        .unwrap();
        let cli = CliOverrides {
            suffix: Some(".fst".into()),
            column_width: Some(36),
            one_based_month: true,
            cycles: Some(3),
            no_diagnostics: true,
            ..positional(25, "/from/cli")
        };

        let settings = config.resolve(&cli).unwrap();
        assert_eq!(settings.monitor.directory, PathBuf::from("/from/cli"));
        assert_eq!(settings.monitor.interval, Duration::from_millis(25));
        assert_eq!(settings.monitor.suffix, ".fst");
        assert_eq!(settings.monitor.column_width, 36);
        assert_eq!(settings.monitor.month_base, MonthBase::One);
        assert_eq!(settings.monitor.max_cycles, Some(3));
        assert!(!settings.diagnostics);
    }

    #[test]
    fn file_fills_in_missing_positionals() {
        let config: Config =
            toml::from_str("[poll]\ninterval_ms = 75\ndirectory = \"/from/file\"\n").unwrap();
        let settings = config.resolve(&CliOverrides::default()).unwrap();
        assert_eq!(settings.monitor.interval, Duration::from_millis(75));
        assert_eq!(settings.monitor.directory, PathBuf::from("/from/file"));
    }

    #[test]
    fn from_file_reports_path_on_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::from_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("nope.toml"));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[poll\ninterval_ms = ").unwrap();
        let err = Config::from_file(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn from_file_loads_valid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fst-latency.toml");
        std::fs::write(&path, "[poll]\ninterval_ms = 5\ndirectory = \"/d\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.poll.interval_ms, Some(5));
    }
}
