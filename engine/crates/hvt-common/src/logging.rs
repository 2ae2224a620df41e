//! Logging setup using tracing

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event, for log shipping
    Json,
    /// Single-line format for terminals
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = hvt_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(hvt_core::Error::InvalidConfig {
                key: "logging.format".into(),
                message: format!("unknown log format '{}' (pretty, json, compact)", other),
            }),
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset (default: info)
    pub level: String,
    pub format: LogFormat,
    /// Include file/line information
    pub with_file: bool,
    /// Include target (module path)
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::Pretty,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    pub fn with_file(mut self) -> Self {
        self.with_file = true;
        self
    }

    /// Build from the `[logging]` section of the configuration file
    pub fn from_settings(settings: &LoggingConfig) -> hvt_core::Result<Self> {
        Ok(Self {
            level: settings.level.clone(),
            format: settings.format.parse()?,
            ..Self::default()
        })
    }
}

/// Initialize the global tracing subscriber with default settings
pub fn init_logging() {
    init_logging_with_config(LogConfig::default());
}

/// Initialize the global tracing subscriber. Logs go to stderr so that
/// report output on stdout stays machine-readable.
pub fn init_logging_with_config(config: LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file)
                    .with_target(config.with_target),
            )
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new().level("debug").json().with_file();

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_file);
    }

    #[test]
    fn test_log_format_from_settings() {
        let settings = LoggingConfig {
            level: "warn".into(),
            format: "Compact".into(),
        };
        let config = LogConfig::from_settings(&settings).unwrap();
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.level, "warn");

        let bad = LoggingConfig {
            level: "info".into(),
            format: "xml".into(),
        };
        assert!(LogConfig::from_settings(&bad).is_err());
    }
}
