// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::config::model::{RawWatchConfig, WatchConfig};
use crate::errors::{Result, RunwatchError};
use crate::fs::FileSystem;

/// Gather the raw startup settings from CLI arguments.
///
/// This resolves the working directory and reads the ignore file, both of
/// which are fatal when they fail. It does **not** validate the result; use
/// [`load_config`] for that.
pub fn load_raw(args: &CliArgs, fs: &dyn FileSystem) -> Result<RawWatchConfig> {
    let base_dir = fs.current_dir().map_err(RunwatchError::WorkingDir)?;

    let ignore_file_patterns = match args.ignore_file.as_deref() {
        Some(path) if !path.as_os_str().is_empty() => Some(read_ignore_file(fs, path)?),
        _ => None,
    };

    let roots = args
        .watch
        .iter()
        .map(|root| resolve_root(&base_dir, root))
        .collect();

    Ok(RawWatchConfig {
        base_dir,
        roots,
        include: args.glob.clone(),
        ignore_file_patterns,
        ignore: args.ignore.clone(),
        commands: args.commands.clone(),
        poll_interval_ms: args.poll_interval,
    })
}

/// Load and validate the configuration for this process.
///
/// This is the entry point used by [`crate::run`].
pub fn load_config(args: &CliArgs, fs: &dyn FileSystem) -> Result<WatchConfig> {
    let raw = load_raw(args, fs)?;
    WatchConfig::try_from(raw)
}

/// Read newline-separated glob patterns from `path`.
pub fn read_ignore_file(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>> {
    let contents = fs
        .read_to_string(path)
        .map_err(|source| RunwatchError::IgnoreFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_ignore_patterns(&contents))
}

/// One pattern per line; surrounding whitespace is trimmed and blank lines
/// are dropped.
pub fn parse_ignore_patterns(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_root(base_dir: &Path, root: &Path) -> PathBuf {
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        base_dir.join(root)
    }
}
