// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{Result, RunwatchError};
use crate::exec::{CommandBackend, CommandSpec, RunReport};
use crate::types::WatchEvent;

use super::coalescer::{Coalescer, EventDecision};
use super::drain::DrainListener;

/// Counters reported when the runtime stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeSummary {
    /// Command sequences started.
    pub runs: usize,
    /// Runs that stopped early because a command failed.
    pub failed_runs: usize,
}

/// The orchestrator loop.
///
/// Waits on the filtered event channel, and for each trigger runs the command
/// sequence through a [`CommandBackend`] while a [`DrainListener`] keeps
/// consuming events. Runs never overlap: the next one starts only after the
/// backend future has resolved and the listener has been joined.
pub struct Runtime<B: CommandBackend> {
    coalescer: Coalescer,
    /// `None` only while a drain listener owns the receiver.
    events_rx: Option<mpsc::Receiver<WatchEvent>>,
    backend: B,
    commands: Arc<CommandSpec>,
    cancel: CancellationToken,
    summary: RuntimeSummary,
}

impl<B: CommandBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("coalescer", &self.coalescer)
            .field("commands", &self.commands)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<B: CommandBackend> Runtime<B> {
    pub fn new(
        commands: Arc<CommandSpec>,
        events_rx: mpsc::Receiver<WatchEvent>,
        backend: B,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            coalescer: Coalescer::new(),
            events_rx: Some(events_rx),
            backend,
            commands,
            cancel,
            summary: RuntimeSummary::default(),
        }
    }

    /// Main event loop.
    ///
    /// Returns when the cancellation token fires or the event source closes.
    pub async fn run(mut self) -> Result<RuntimeSummary> {
        info!("runwatch runtime started");

        let mut pending: Option<WatchEvent> = None;

        loop {
            let trigger = match pending.take() {
                Some(rerun) => rerun,
                None => match self.next_event().await? {
                    Some(event) => event,
                    None => break,
                },
            };

            if self.cancel.is_cancelled() {
                break;
            }

            pending = self.run_cycle(trigger).await?;
        }

        info!(
            runs = self.summary.runs,
            failed_runs = self.summary.failed_runs,
            "runtime exiting"
        );
        Ok(self.summary)
    }

    /// Wait in `Idle` for the next event, or `None` on shutdown / closed source.
    async fn next_event(&mut self) -> Result<Option<WatchEvent>> {
        let cancel = &self.cancel;
        let rx = self
            .events_rx
            .as_mut()
            .ok_or_else(|| RunwatchError::Other(anyhow::anyhow!("event receiver is in use")))?;

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("shutdown requested, stopping runtime");
                Ok(None)
            }
            event = rx.recv() => {
                if event.is_none() {
                    info!("event channel closed; exiting");
                }
                Ok(event)
            }
        }
    }

    /// One Idle -> Running -> Idle cycle. Returns the synthetic rerun trigger
    /// if events arrived while the commands were running.
    async fn run_cycle(&mut self, trigger: WatchEvent) -> Result<Option<WatchEvent>> {
        match self.coalescer.on_event() {
            EventDecision::StartRun => {}
            other => {
                // Only reachable if a previous cycle did not settle.
                warn!(?other, "trigger received while not idle; ignoring");
                return Ok(None);
            }
        }

        let mut rx = self
            .events_rx
            .take()
            .ok_or_else(|| RunwatchError::Other(anyhow::anyhow!("event receiver is in use")))?;

        // Everything already queued belongs to the burst that fired this run.
        let mut absorbed = 0usize;
        while let Ok(event) = rx.try_recv() {
            debug!(path = ?event.path(), "absorbed into current trigger");
            self.coalescer.absorb_into_current();
            absorbed += 1;
        }

        let run = self.coalescer.runs_started();
        if trigger.is_rerun() {
            info!(run, "changes during previous run; running commands again");
        } else {
            info!(run, path = ?trigger.path(), op = %trigger.op(), absorbed, "change detected; running commands");
        }

        let (done_tx, done_rx) = oneshot::channel::<()>();
        let listener = DrainListener::spawn(rx, done_rx, self.cancel.clone());

        let report = self
            .backend
            .run_commands(Arc::clone(&self.commands), self.cancel.child_token())
            .await;

        // Completion signal; the listener may already have stopped on cancel.
        let _ = done_tx.send(());
        let drained = listener.join().await?;

        for _ in 0..drained.events_seen {
            self.coalescer.on_event();
        }
        self.events_rx = Some(drained.receiver);

        self.record_report(run, &report);

        if self.cancel.is_cancelled() || drained.cancelled {
            self.coalescer.cancel_pending();
        }
        Ok(self.coalescer.on_run_finished())
    }

    fn record_report(&mut self, run: usize, report: &RunReport) {
        self.summary.runs += 1;

        if report.was_cancelled() {
            info!(run, "run cancelled");
        } else if report.early_abort {
            self.summary.failed_runs += 1;
            warn!(
                run,
                commands_run = report.outcomes.len(),
                last = ?report.outcomes.last(),
                "run aborted; waiting for next change"
            );
        } else {
            info!(run, "run finished");
        }
    }
}
