// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Filter selection, first match wins:
//! 1. `--log-level` on the command line
//! 2. `RUNWATCH_LOG`, read as `EnvFilter` directives (`debug`,
//!    `runwatch::engine=trace`, ...)
//! 3. `info`
//!
//! Logs go to stderr; stdout carries the output of the triggered commands.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "RUNWATCH_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::default().add_directive(LevelFilter::from(level).into());
    }
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_overrides_environment() {
        let filter = build_filter(Some(LogLevel::Warn));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn cli_levels_map_one_to_one() {
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
    }
}
