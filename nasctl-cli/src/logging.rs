//! Logging setup
//!
//! Human-readable events go to stderr so stdout stays parseable. A JSON
//! rolling file is added when a log directory is configured.

use anyhow::Result;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "nasctl.log";

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => LogRotation::Hourly,
            "never" => LogRotation::Never,
            _ => LogRotation::Daily,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// `--verbose` count beats the configured level
    pub fn from_settings(
        verbose: u8,
        config_level: &str,
        log_dir: Option<&str>,
        rotation: &str,
    ) -> Self {
        let level = match verbose {
            0 if config_level.is_empty() => "warn".to_string(),
            0 => config_level.to_string(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        };

        let file_path = std::env::var("NASCTL_LOG_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| log_dir.map(str::to_string));

        Self {
            level,
            file_path,
            rotation: LogRotation::parse(rotation),
        }
    }

    /// Install the global subscriber. RUST_LOG overrides `level`.
    ///
    /// Keep the returned guard alive until exit or buffered file output is lost.
    pub fn init(&self) -> Result<Option<WorkerGuard>> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let console_layer = fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(io::stderr);

        match self.file_path {
            Some(ref path) => {
                let file_appender = match self.rotation {
                    LogRotation::Hourly => rolling::hourly(path, LOG_FILE),
                    LogRotation::Daily => rolling::daily(path, LOG_FILE),
                    LogRotation::Never => rolling::never(path, LOG_FILE),
                };
                let (writer, guard) = non_blocking(file_appender);

                let file_layer = fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(writer);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console_layer)
                    .with(file_layer)
                    .try_init()?;

                Ok(Some(guard))
            }
            None => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console_layer)
                    .try_init()?;

                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_parse() {
        assert_eq!(LogRotation::parse("hourly"), LogRotation::Hourly);
        assert_eq!(LogRotation::parse("NEVER"), LogRotation::Never);
        assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    }

    #[test]
    fn test_verbose_overrides_config_level() {
        assert_eq!(LoggingConfig::from_settings(0, "error", None, "daily").level, "error");
        assert_eq!(LoggingConfig::from_settings(0, "", None, "daily").level, "warn");
        assert_eq!(LoggingConfig::from_settings(1, "error", None, "daily").level, "info");
        assert_eq!(LoggingConfig::from_settings(2, "error", None, "daily").level, "debug");
        assert_eq!(LoggingConfig::from_settings(5, "error", None, "daily").level, "trace");
    }
}
