// src/config/validate.rs

use crate::config::model::{RawWatchConfig, WatchConfig};
use crate::errors::{Result, RunwatchError};
use crate::exec::CommandSpec;

impl TryFrom<RawWatchConfig> for WatchConfig {
    type Error = crate::errors::RunwatchError;

    fn try_from(raw: RawWatchConfig) -> std::result::Result<Self, Self::Error> {
        ensure_has_roots(&raw)?;
        ensure_poll_interval(&raw)?;
        let commands = parse_commands(&raw)?;
        Ok(WatchConfig::new_unchecked(raw, commands))
    }
}

fn ensure_has_roots(cfg: &RawWatchConfig) -> Result<()> {
    if cfg.roots.is_empty() {
        return Err(RunwatchError::ConfigError(
            "at least one path to watch is required".to_string(),
        ));
    }
    Ok(())
}

fn ensure_poll_interval(cfg: &RawWatchConfig) -> Result<()> {
    if cfg.poll_interval_ms == 0 {
        return Err(RunwatchError::ConfigError(
            "--poll-interval must be >= 1 millisecond (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn parse_commands(cfg: &RawWatchConfig) -> Result<CommandSpec> {
    if cfg.commands.is_empty() {
        return Err(RunwatchError::ConfigError(
            "at least one command is required".to_string(),
        ));
    }
    CommandSpec::parse(&cfg.commands)
}
