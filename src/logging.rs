//! Tracing setup for the `canvas` binary.
//!
//! Logs go to stderr so stdout stays free for command output and the MCP
//! stdio transport. With a log directory configured they go to a daily
//! rolling JSON file instead.

use std::{error::Error, path::PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "CANVAS_LOG";
pub const LOG_DIR_ENV: &str = "CANVAS_LOG_DIR";

const LOG_FILE_PREFIX: &str = "canvas.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `canvas_lms=debug`
    pub filter: String,
    pub log_dir: Option<PathBuf>,
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            log_dir: None,
            enabled: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            filter: std::env::var(LOG_ENV).unwrap_or(defaults.filter),
            log_dir: std::env::var(LOG_DIR_ENV).ok().map(PathBuf::from),
            enabled: true,
        }
    }

    /// Apply a level from the config file or command line; `off` disables
    /// logging entirely.
    pub fn with_level(mut self, level: Option<&str>) -> Self {
        match level {
            Some(level) if level.eq_ignore_ascii_case("off") => self.enabled = false,
            Some(level) if !level.is_empty() => self.filter = level.to_lowercase(),
            _ => {},
        }
        self
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn Error + Send + Sync>> {
    if !config.enabled {
        return Ok(None);
    }

    let filter = EnvFilter::try_new(&config.filter)?;

    match config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                .try_init()?;

            Ok(Some(guard))
        },
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init()?;

            Ok(None)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_overrides_default() {
        let config = LoggingConfig::default().with_level(Some("DEBUG"));
        assert_eq!(config.filter, "debug");
        assert!(config.enabled);
    }

    #[test]
    fn off_disables_logging() {
        let config = LoggingConfig::default().with_level(Some("Off"));
        assert!(!config.enabled);

        let unchanged = LoggingConfig::default().with_level(None);
        assert_eq!(unchanged, LoggingConfig::default());
    }
}
