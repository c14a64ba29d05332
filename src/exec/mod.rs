// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] holds the parsed, immutable command sequence.
//! - [`runner`] runs a sequence with `tokio::process::Command`, fail-fast,
//!   streaming combined output.
//! - [`backend`] provides the `CommandBackend` trait and the production
//!   `ProcessBackend`, which tests replace with fakes.

pub mod backend;
pub mod command;
pub mod runner;

pub use backend::{CommandBackend, ProcessBackend};
pub use command::{CommandLine, CommandSpec};
pub use runner::run_sequence;

/// How a single command of a sequence ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Exited with a non-zero status (`-1` when killed by a signal).
    Failed(i32),
    /// Could not be spawned, or its output could not be forwarded.
    Error(String),
    /// Killed because shutdown was requested.
    Cancelled,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

/// Result of one run of the command sequence.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Combined output of every command that ran, in order.
    pub output: Vec<u8>,
    /// One entry per command that was started.
    pub outcomes: Vec<CommandOutcome>,
    /// True when the sequence stopped before its last command completed
    /// successfully.
    pub early_abort: bool,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        !self.early_abort && self.outcomes.iter().all(CommandOutcome::is_success)
    }

    pub fn was_cancelled(&self) -> bool {
        self.outcomes.last() == Some(&CommandOutcome::Cancelled)
    }
}
