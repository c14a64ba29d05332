use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use runwatch::exec::{CommandBackend, CommandOutcome, CommandSpec, RunReport};

/// Counters shared between a fake backend and the test driving it.
#[derive(Debug, Default)]
pub struct BackendStats {
    started: AtomicUsize,
    finished: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl BackendStats {
    fn enter(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Highest number of runs ever in flight at the same time.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Poll until at least `n` runs have started; panics after 5 seconds.
    pub async fn wait_for_started(&self, n: usize) {
        for _ in 0..1000 {
            if self.started() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {n} runs to start, saw {}", self.started());
    }
}

/// A fake command backend that:
/// - records how many runs started/finished and how many overlapped
/// - optionally holds every run until the test releases it through `gate`
/// - reports every command as succeeded (or the first one as failed).
pub struct ControllableBackend {
    stats: Arc<BackendStats>,
    gate: Option<Arc<Semaphore>>,
    fail: bool,
}

impl ControllableBackend {
    /// Runs block until a permit is added to [`ControllableBackend::gate`].
    pub fn gated() -> Self {
        Self {
            stats: Arc::new(BackendStats::default()),
            gate: Some(Arc::new(Semaphore::new(0))),
            fail: false,
        }
    }

    /// Runs complete as soon as they start.
    pub fn immediate() -> Self {
        Self {
            stats: Arc::new(BackendStats::default()),
            gate: None,
            fail: false,
        }
    }

    /// Make the first command of every run fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn stats(&self) -> Arc<BackendStats> {
        Arc::clone(&self.stats)
    }

    /// Add one permit per run that should be allowed to finish.
    pub fn gate(&self) -> Arc<Semaphore> {
        self.gate
            .clone()
            .expect("gate() called on a backend built with immediate()")
    }
}

impl CommandBackend for ControllableBackend {
    fn run_commands(
        &mut self,
        commands: Arc<CommandSpec>,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = RunReport> + Send + '_>> {
        let stats = Arc::clone(&self.stats);
        let gate = self.gate.clone();
        let fail = self.fail;

        Box::pin(async move {
            stats.enter();
            let mut report = RunReport::default();

            if let Some(gate) = gate {
                tokio::select! {
                    permit = gate.acquire() => {
                        if let Ok(permit) = permit {
                            permit.forget();
                        }
                    }
                    _ = cancel.cancelled() => {
                        report.outcomes.push(CommandOutcome::Cancelled);
                        report.early_abort = true;
                        stats.leave();
                        return report;
                    }
                }
            }

            if fail {
                report.outcomes.push(CommandOutcome::Failed(1));
                report.early_abort = true;
            } else {
                report
                    .outcomes
                    .extend(commands.iter().map(|_| CommandOutcome::Success));
            }

            stats.leave();
            report
        })
    }
}
