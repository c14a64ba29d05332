// src/config/model.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::exec::CommandSpec;

/// Startup settings gathered from the CLI and the ignore file, before any
/// validation.
///
/// Built by [`crate::config::loader::load_config`]; turned into a
/// [`WatchConfig`] through `TryFrom`, which is where validation happens.
#[derive(Debug, Clone)]
pub struct RawWatchConfig {
    /// Working directory; all glob patterns are relative to it.
    pub base_dir: PathBuf,
    /// Roots to watch recursively.
    pub roots: Vec<PathBuf>,
    /// Include globs (`--glob`).
    pub include: Vec<String>,
    /// Patterns read from `--ignore-file`, if one was given.
    pub ignore_file_patterns: Option<Vec<String>>,
    /// Inline ignore globs (`--ignore`).
    pub ignore: Vec<String>,
    /// Raw command lines, one per positional argument.
    pub commands: Vec<String>,
    /// Poll interval of the watch source, in milliseconds.
    pub poll_interval_ms: u64,
}

/// Validated, immutable configuration for one process lifetime.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub base_dir: PathBuf,
    pub roots: Vec<PathBuf>,
    pub include: Vec<String>,
    pub ignore_file_patterns: Option<Vec<String>>,
    pub ignore: Vec<String>,
    pub commands: Arc<CommandSpec>,
    pub poll_interval: Duration,
}

impl WatchConfig {
    /// Only `validate.rs` constructs this, after checking the raw input.
    pub(crate) fn new_unchecked(raw: RawWatchConfig, commands: CommandSpec) -> Self {
        Self {
            base_dir: raw.base_dir,
            roots: raw.roots,
            include: raw.include,
            ignore_file_patterns: raw.ignore_file_patterns,
            ignore: raw.ignore,
            commands: Arc::new(commands),
            poll_interval: Duration::from_millis(raw.poll_interval_ms),
        }
    }
}
