//! Logging setup
//!
//! The dashboard owns the terminal while it runs, so the client logs to
//! `<state>/log/rcondeck.log`. Stderr output is kept for non-interactive use.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{paths, DeckError, Result};

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "RCONDECK_LOG";

/// Default log file name inside the log directory
pub const LOG_FILE_NAME: &str = "rcondeck.log";

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    File,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub output: LogOutput,
    /// `EnvFilter` directives, e.g. "warn,rcondeck_protocol=debug"
    pub filter: String,
    /// Include source file and line
    pub file_line: bool,
    /// Overrides [`LOG_FILE_NAME`]
    pub file_name: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: LogOutput::Stderr,
            filter: "info".into(),
            file_line: false,
            file_name: None,
        }
    }
}

impl LogConfig {
    /// File logging filtered by `RCONDECK_LOG` (default "warn")
    pub fn client() -> Self {
        Self {
            output: LogOutput::File,
            filter: std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| "warn".into()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    fn log_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(LOG_FILE_NAME)
    }
}

/// Install the global subscriber. Fails if the filter does not parse, the log
/// file cannot be opened, or a subscriber is already installed.
pub fn init_logging_with_config(config: LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| DeckError::config(format!("Invalid log filter '{}': {}", config.filter, e)))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(config.file_line)
        .with_line_number(config.file_line);

    let installed = match config.output {
        LogOutput::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_writer(std::io::stderr))
            .try_init(),
        LogOutput::File => {
            let log_dir = paths::log_dir();
            paths::ensure_dir(&log_dir).map_err(|e| DeckError::FileWrite {
                path: log_dir.clone(),
                source: e,
            })?;

            let log_path = log_dir.join(config.log_file_name());
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .map_err(|e| DeckError::FileWrite {
                    path: log_path,
                    source: e,
                })?;

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.with_writer(file).with_ansi(false))
                .try_init()
        }
    };

    installed.map_err(|e| DeckError::config(format!("Failed to init logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logs_info_to_stderr() {
        let config = LogConfig::default();
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.filter, "info");
        assert!(!config.file_line);
        assert_eq!(config.log_file_name(), "rcondeck.log");
    }

    #[test]
    fn test_client_logs_to_file() {
        let config = LogConfig::client();
        assert_eq!(config.output, LogOutput::File);
        assert!(config.file_name.is_none());
    }

    #[test]
    fn test_with_filter_keeps_output() {
        let config = LogConfig::client().with_filter("rcondeck_client=trace");
        assert_eq!(config.output, LogOutput::File);
        assert_eq!(config.filter, "rcondeck_client=trace");
    }

    #[test]
    fn test_custom_file_name() {
        let config = LogConfig {
            file_name: Some("check.log".into()),
            ..LogConfig::client()
        };
        assert_eq!(config.log_file_name(), "check.log");
    }

    #[test]
    fn test_invalid_filter_rejected() {
        // Rejected before any subscriber is installed
        let config = LogConfig::default().with_filter("rcondeck=loud");
        let result = init_logging_with_config(config);
        assert!(matches!(result, Err(DeckError::Config(_))));
    }
}
