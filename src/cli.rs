// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `runwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runwatch",
    version,
    about = "File watcher for triggering commands on file changes.",
    override_usage = "runwatch <COMMANDS>... [OPTIONS]",
    long_about = None
)]
pub struct CliArgs {
    /// Commands to run, in order, on every change.
    ///
    /// Each argument is one command line, split on whitespace (no shell
    /// quoting). The sequence stops at the first command that fails.
    #[arg(value_name = "COMMANDS", required = true, num_args = 1..)]
    pub commands: Vec<String>,

    /// Files or directories to watch recursively.
    #[arg(
        short = 'w',
        long = "watch",
        value_name = "PATH",
        value_delimiter = ',',
        default_value = "."
    )]
    pub watch: Vec<PathBuf>,

    /// File with newline-separated ignore glob patterns.
    #[arg(short = 'I', long = "ignore-file", value_name = "PATH")]
    pub ignore_file: Option<PathBuf>,

    /// Ignore glob patterns, relative to the working directory.
    #[arg(
        short = 'i',
        long = "ignore",
        value_name = "GLOB",
        value_delimiter = ',',
        default_value = ".git/*"
    )]
    pub ignore: Vec<String>,

    /// Only react to paths matching one of these glob patterns.
    ///
    /// Ignore patterns still apply on top of this filter.
    #[arg(short = 'g', long = "glob", value_name = "GLOB", value_delimiter = ',')]
    pub glob: Vec<String>,

    /// How often the watched roots are polled, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub poll_interval: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
