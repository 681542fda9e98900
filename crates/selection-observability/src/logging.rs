//! Tracing subscriber setup.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Pretty,
    /// JSON format (for log aggregation).
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Error installing the global subscriber.
#[derive(Debug, thiserror::Error)]
#[error("Failed to initialize tracing: {0}")]
pub struct TracingInitError(String);

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default level when `RUST_LOG` is not set.
    pub level: Level,
    pub format: LogFormat,
    pub with_target: bool,
    pub with_file_and_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            with_target: true,
            with_file_and_line: false,
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn debug() -> Self {
        Self::default().with_level(Level::DEBUG)
    }

    /// Quiet JSON output for non-interactive runs.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            with_target: false,
            with_file_and_line: false,
        }
    }

    /// Filter honouring `RUST_LOG`, else the configured level.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
    }
}

/// Install the global subscriber. Logs go to stderr.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingInitError> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    match config.format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_file(config.with_file_and_line)
                .with_line_number(config.with_file_and_line);
            registry
                .with(layer)
                .try_init()
                .map_err(|e| TracingInitError(e.to_string()))?;
        }
        LogFormat::Pretty => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_file(config.with_file_and_line)
                .with_line_number(config.with_file_and_line);
            registry
                .with(layer)
                .try_init()
                .map_err(|e| TracingInitError(e.to_string()))?;
        }
    }

    info!(level = %config.level, format = %config.format, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(TracingConfig::debug().level, Level::DEBUG);
        assert_eq!(TracingConfig::production().format, LogFormat::Json);
        assert_eq!(TracingConfig::default().format, LogFormat::Pretty);
    }

    #[test]
    fn test_second_init_reports_error() {
        // Only the first install in a process can succeed.
        let _ = init_tracing(TracingConfig::default());
        let err = init_tracing(TracingConfig::production()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to initialize tracing"));
    }

    #[test]
    fn test_format_serde() {
        let f: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(f, LogFormat::Json);
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
    }
}
