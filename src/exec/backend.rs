// src/exec/backend.rs

//! Pluggable command backend abstraction.
//!
//! The runtime talks to a `CommandBackend` instead of spawning processes
//! itself, so tests can swap in a fake that controls when a run finishes.
//!
//! - `ProcessBackend` is the production implementation: it runs the command
//!   sequence with [`run_sequence`] and streams output to stdout.
//! - Test backends live in the `runwatch-test-utils` crate.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

use super::command::CommandSpec;
use super::runner::run_sequence;
use super::RunReport;

/// Trait abstracting how one command sequence is executed.
pub trait CommandBackend: Send {
    /// Run the whole sequence and resolve once it is over (finished,
    /// aborted on failure, or cancelled).
    fn run_commands(
        &mut self,
        commands: Arc<CommandSpec>,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = RunReport> + Send + '_>>;
}

/// Real backend: spawns OS processes and passes their output through.
pub struct ProcessBackend {
    sink: Box<dyn AsyncWrite + Send + Unpin>,
}

impl ProcessBackend {
    /// Backend writing command output to the process's stdout.
    pub fn stdout() -> Self {
        Self::with_sink(tokio::io::stdout())
    }

    pub fn with_sink(sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl std::fmt::Debug for ProcessBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessBackend").finish_non_exhaustive()
    }
}

impl CommandBackend for ProcessBackend {
    fn run_commands(
        &mut self,
        commands: Arc<CommandSpec>,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = RunReport> + Send + '_>> {
        Box::pin(async move { run_sequence(&commands, &cancel, &mut self.sink).await })
    }
}
