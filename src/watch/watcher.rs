// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{Result, RunwatchError};
use crate::types::WatchEvent;
use crate::watch::event_handler::forward_per_scan;
use crate::watch::patterns::PathFilter;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `PollWatcher` is kept alive for as
/// long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: PollWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a polling watcher over `roots` (each watched recursively) that
/// sends one [`WatchEvent`] per poll scan in which at least one
/// create/write/rename survives `filter`.
///
/// Registration failures are returned as [`RunwatchError::WatchRoot`]; the
/// caller treats them as fatal.
pub fn spawn_watcher(
    roots: &[PathBuf],
    filter: PathFilter,
    poll_interval: Duration,
    runtime_tx: mpsc::Sender<WatchEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = PollWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("notify event dropped; forwarder has stopped");
                }
            }
            Err(err) => warn!(error = %err, "file watch error"),
        },
        Config::default().with_poll_interval(poll_interval),
    )
    .map_err(|e| RunwatchError::Other(anyhow::Error::new(e).context("creating poll watcher")))?;

    for root in roots {
        register_root(&mut watcher, root)?;
    }

    info!(?roots, ?poll_interval, "file watcher started");

    // One scan reports its changes back to back; the next scan starts a
    // full interval after this one ends.
    let scan_window = poll_interval / 2;
    tokio::spawn(async move {
        forward_per_scan(event_rx, &filter, scan_window, runtime_tx).await;
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn register_root(watcher: &mut PollWatcher, root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(RunwatchError::WatchRoot {
            path: root.to_path_buf(),
            source: notify::Error::path_not_found().add_path(root.to_path_buf()),
        });
    }

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|source| RunwatchError::WatchRoot {
            path: root.to_path_buf(),
            source,
        })
}
