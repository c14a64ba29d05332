#![allow(dead_code)]

use std::path::PathBuf;

use runwatch::config::{RawWatchConfig, WatchConfig};

/// Builder for `WatchConfig` to simplify test setup.
///
/// Defaults mirror the CLI defaults: watch `.`, ignore `.git/*`, poll every
/// second, base directory `/work`, a single `true` command.
pub struct WatchConfigBuilder {
    raw: RawWatchConfig,
}

impl WatchConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawWatchConfig {
                base_dir: PathBuf::from("/work"),
                roots: vec![PathBuf::from("/work")],
                include: Vec::new(),
                ignore_file_patterns: None,
                ignore: vec![".git/*".to_string()],
                commands: Vec::new(),
                poll_interval_ms: 1000,
            },
        }
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.base_dir = dir.into();
        self
    }

    /// Replace the watched roots.
    pub fn roots(mut self, roots: &[&str]) -> Self {
        self.raw.roots = roots.iter().map(PathBuf::from).collect();
        self
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.raw.include.push(pattern.to_string());
        self
    }

    /// Replace the default inline ignore list.
    pub fn ignore(mut self, patterns: &[&str]) -> Self {
        self.raw.ignore = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn ignore_file_patterns(mut self, patterns: &[&str]) -> Self {
        self.raw.ignore_file_patterns = Some(patterns.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn command(mut self, line: &str) -> Self {
        self.raw.commands.push(line.to_string());
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.raw.poll_interval_ms = ms;
        self
    }

    pub fn build_raw(mut self) -> RawWatchConfig {
        if self.raw.commands.is_empty() {
            self.raw.commands.push("true".to_string());
        }
        self.raw
    }

    pub fn build(self) -> WatchConfig {
        WatchConfig::try_from(self.build_raw()).expect("Failed to build valid config from builder")
    }
}

impl Default for WatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
