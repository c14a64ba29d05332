// src/watch/event_handler.rs

//! Turns raw `notify` events into filtered [`WatchEvent`]s.
//!
//! A poll scan reports every changed path of the scan back to back. All of
//! them are one change as far as the runtime is concerned, so the forwarder
//! sends at most one trigger per scan.

use std::time::Duration;

use notify::Event;
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace, warn};

use crate::types::{WatchEvent, WatchOp};
use crate::watch::patterns::PathFilter;

/// The first path of `event` that survives `filter`, as a trigger.
///
/// `None` for event kinds we do not react to (removals, access, ...) and for
/// events whose paths are all filtered out.
pub fn interesting_event(event: Event, filter: &PathFilter) -> Option<WatchEvent> {
    let Some(op) = WatchOp::from_kind(&event.kind) else {
        trace!(kind = ?event.kind, "ignoring event kind");
        return None;
    };

    let path = event.paths.into_iter().find(|p| filter.interested(p))?;
    debug!(?path, %op, "change of interest");
    Some(WatchEvent::new(path, op))
}

/// Forward filtered events from `notify_rx` to `runtime_tx`, one trigger per
/// poll scan.
///
/// After the first interesting event, everything arriving within
/// `scan_window` belongs to the same scan and is dropped. Returns when the
/// notify side closes or the runtime hangs up.
pub async fn forward_per_scan(
    mut notify_rx: mpsc::UnboundedReceiver<Event>,
    filter: &PathFilter,
    scan_window: Duration,
    runtime_tx: mpsc::Sender<WatchEvent>,
) {
    while let Some(event) = notify_rx.recv().await {
        let Some(trigger) = interesting_event(event, filter) else {
            continue;
        };

        let deadline = Instant::now() + scan_window;
        let mut absorbed = 0usize;
        while let Ok(Some(event)) = timeout_at(deadline, notify_rx.recv()).await {
            if interesting_event(event, filter).is_some() {
                absorbed += 1;
            }
        }
        if absorbed > 0 {
            debug!(absorbed, "same-scan changes folded into one trigger");
        }

        if let Err(err) = runtime_tx.send(trigger).await {
            warn!("failed to forward watch event: {err}");
            return;
        }
    }
    debug!("notify event stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::patterns::FilterStage;
    use notify::EventKind;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
    use std::path::PathBuf;

    const WINDOW: Duration = Duration::from_millis(50);

    fn filter() -> PathFilter {
        PathFilter::new("/work").with_stage(FilterStage::exclude("ignore", &[".git/*", "*.tmp"]))
    }

    fn write(path: &str) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from(path))
    }

    #[test]
    fn picks_first_interesting_path() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/work/.git/HEAD"))
            .add_path(PathBuf::from("/work/notes.tmp"))
            .add_path(PathBuf::from("/work/main.go"));

        let ev = interesting_event(event, &filter()).unwrap();
        assert_eq!(ev.path(), Some(PathBuf::from("/work/main.go").as_path()));
        assert_eq!(ev.op(), WatchOp::Create);
    }

    #[test]
    fn removals_and_filtered_paths_are_dropped() {
        let removal = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(PathBuf::from("/work/main.go"));
        assert!(interesting_event(removal, &filter()).is_none());
        assert!(interesting_event(write("/work/a.tmp"), &filter()).is_none());
    }

    #[tokio::test]
    async fn one_scan_becomes_one_trigger() {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::channel(64);

        notify_tx.send(write("/work/main.go")).unwrap();
        for i in 0..30 {
            notify_tx.send(write(&format!("/work/gen/{i}.go"))).unwrap();
        }
        drop(notify_tx);

        forward_per_scan(notify_rx, &filter(), WINDOW, tx).await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.path(), Some(PathBuf::from("/work/main.go").as_path()));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn separate_scans_give_separate_triggers() {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::channel(64);
        let forwarder = tokio::spawn(async move {
            forward_per_scan(notify_rx, &filter(), WINDOW, tx).await;
        });

        notify_tx.send(write("/work/a.go")).unwrap();
        notify_tx.send(write("/work/b.go")).unwrap();
        tokio::time::sleep(WINDOW * 3).await;
        notify_tx.send(write("/work/c.go")).unwrap();
        drop(notify_tx);
        forwarder.await.unwrap();

        let mut paths = Vec::new();
        while let Some(ev) = rx.recv().await {
            paths.push(ev.path().map(PathBuf::from));
        }
        assert_eq!(
            paths,
            vec![Some(PathBuf::from("/work/a.go")), Some(PathBuf::from("/work/c.go"))]
        );
    }

    #[tokio::test]
    async fn filtered_events_do_not_open_a_window() {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::channel(64);

        notify_tx.send(write("/work/.git/index")).unwrap();
        notify_tx.send(write("/work/main.go")).unwrap();
        drop(notify_tx);

        forward_per_scan(notify_rx, &filter(), WINDOW, tx).await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.path(), Some(PathBuf::from("/work/main.go").as_path()));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn closed_runtime_stops_forwarding() {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        notify_tx.send(write("/work/main.go")).unwrap();
        // Sender still alive: only the runtime hang-up can end the loop.
        tokio::time::timeout(Duration::from_secs(5), forward_per_scan(notify_rx, &filter(), WINDOW, tx))
            .await
            .expect("forwarder should stop once the runtime is gone");
        drop(notify_tx);
    }
}
