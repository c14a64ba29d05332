// src/engine/drain.rs

//! Drain listener: keeps consuming watch events while a run is in progress.
//!
//! Exactly one listener exists per run. It owns the event receiver for the
//! duration of the run and hands it back through its `JoinHandle`, together
//! with how many events it saw, so the orchestrator never shares state with
//! it.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{Result, RunwatchError};
use crate::types::WatchEvent;

/// What the listener observed while the run was in progress.
#[derive(Debug)]
pub struct DrainOutcome {
    /// The event receiver, returned to the orchestrator.
    pub receiver: mpsc::Receiver<WatchEvent>,
    /// Events received before the completion signal fired.
    pub events_seen: usize,
    /// Shutdown was requested during the run.
    pub cancelled: bool,
}

impl DrainOutcome {
    pub fn saw_event(&self) -> bool {
        self.events_seen > 0
    }
}

/// Handle to the single in-flight drain task.
#[derive(Debug)]
pub struct DrainListener {
    handle: JoinHandle<DrainOutcome>,
}

impl DrainListener {
    /// Start draining `receiver` until `done` fires (or its sender is
    /// dropped) or `cancel` is cancelled.
    pub fn spawn(
        receiver: mpsc::Receiver<WatchEvent>,
        done: oneshot::Receiver<()>,
        cancel: CancellationToken,
    ) -> Self {
        let handle = tokio::spawn(drain_until_done(receiver, done, cancel));
        Self { handle }
    }

    /// Wait for the listener to stop and take back the receiver.
    pub async fn join(self) -> Result<DrainOutcome> {
        self.handle.await.map_err(|e| {
            RunwatchError::Other(anyhow::anyhow!("drain listener task failed: {e}"))
        })
    }
}

async fn drain_until_done(
    mut receiver: mpsc::Receiver<WatchEvent>,
    mut done: oneshot::Receiver<()>,
    cancel: CancellationToken,
) -> DrainOutcome {
    let mut events_seen = 0usize;
    let mut source_closed = false;
    let mut cancelled = false;

    loop {
        tokio::select! {
            // Completion wins over a simultaneously ready event; that event
            // stays queued and starts the next run instead.
            biased;

            _ = &mut done => break,
            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            event = receiver.recv(), if !source_closed => match event {
                Some(event) => {
                    events_seen += 1;
                    debug!(path = ?event.path(), op = %event.op(), "event during run");
                }
                None => {
                    debug!("event source closed during run");
                    source_closed = true;
                }
            },
        }
    }

    DrainOutcome {
        receiver,
        events_seen,
        cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WatchOp;
    use std::time::Duration;

    #[tokio::test]
    async fn counts_events_until_done() {
        let (tx, rx) = mpsc::channel(8);
        let (done_tx, done_rx) = oneshot::channel();
        let listener = DrainListener::spawn(rx, done_rx, CancellationToken::new());

        for _ in 0..3 {
            tx.send(WatchEvent::new("a.txt", WatchOp::Write)).await.unwrap();
        }
        // Wait until the listener has pulled everything off the channel.
        while tx.capacity() < tx.max_capacity() {
            tokio::task::yield_now().await;
        }
        done_tx.send(()).unwrap();

        let outcome = listener.join().await.unwrap();
        assert_eq!(outcome.events_seen, 3);
        assert!(outcome.saw_event());
        assert!(!outcome.cancelled);
    }

    #[tokio::test]
    async fn stops_without_events() {
        let (_tx, rx) = mpsc::channel::<WatchEvent>(8);
        let (done_tx, done_rx) = oneshot::channel();
        let listener = DrainListener::spawn(rx, done_rx, CancellationToken::new());
        done_tx.send(()).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), listener.join())
            .await
            .expect("listener should stop on completion")
            .unwrap();
        assert!(!outcome.saw_event());
    }

    #[tokio::test]
    async fn closed_source_does_not_spin_or_stop_early() {
        let (tx, rx) = mpsc::channel::<WatchEvent>(8);
        let (done_tx, done_rx) = oneshot::channel();
        let listener = DrainListener::spawn(rx, done_rx, CancellationToken::new());
        drop(tx);
        tokio::time::sleep(Duration::from_millis(20)).await;
        done_tx.send(()).unwrap();

        let outcome = listener.join().await.unwrap();
        assert_eq!(outcome.events_seen, 0);
        assert!(!outcome.cancelled);
        assert!(outcome.receiver.is_closed());
    }

    #[tokio::test]
    async fn cancellation_stops_listener() {
        let (_tx, rx) = mpsc::channel::<WatchEvent>(8);
        let (_done_tx, done_rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let listener = DrainListener::spawn(rx, done_rx, cancel.clone());
        cancel.cancel();

        let outcome = listener.join().await.unwrap();
        assert!(outcome.cancelled);
    }
}
