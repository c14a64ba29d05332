mod common;
use crate::common::backends::ControllableBackend;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use runwatch::engine::{Runtime, EVENT_CHANNEL_CAPACITY};
use runwatch::errors::RunwatchError;
use runwatch::exec::CommandSpec;
use runwatch::types::WatchEvent;
use runwatch::watch::{spawn_watcher, FilterStage, PathFilter};

type TestResult = Result<(), Box<dyn Error>>;

const POLL: Duration = Duration::from_millis(50);

#[tokio::test]
async fn only_interesting_changes_reach_the_runtime() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    // "." is the watched directory itself, whose mtime changes on every add.
    let filter = PathFilter::new(dir.path())
        .with_stage(FilterStage::exclude("ignore", &["*.tmp", "."]));

    let (tx, mut rx) = mpsc::channel::<WatchEvent>(64);
    let _handle = spawn_watcher(&[dir.path().to_path_buf()], filter, POLL, tx)?;

    std::fs::write(dir.path().join("ignored.tmp"), "scratch")?;
    tokio::time::sleep(POLL * 4).await;
    assert!(rx.try_recv().is_err(), "excluded change produced a trigger");

    std::fs::write(dir.path().join("keep.txt"), "hello")?;
    let event = with_timeout(rx.recv()).await.ok_or("watcher stopped")?;
    assert_eq!(event.path(), Some(dir.path().join("keep.txt").as_path()));
    Ok(())
}

#[tokio::test]
async fn missing_root_fails_registration() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let missing = dir.path().join("nope");
    let (tx, _rx) = mpsc::channel::<WatchEvent>(1);

    let err = spawn_watcher(&[missing.clone()], PathFilter::new(dir.path()), POLL, tx)
        .unwrap_err();

    match err {
        RunwatchError::WatchRoot { path, .. } => assert_eq!(path, missing),
        other => panic!("expected WatchRoot error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn changes_seen_by_one_poll_scan_start_one_run() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().join("project");
    let staging = dir.path().join("staging");
    std::fs::create_dir(&root)?;
    std::fs::create_dir(&staging)?;
    for i in 0..30 {
        std::fs::write(staging.join(format!("gen_{i}.go")), "package gen")?;
    }

    let (tx, rx) = mpsc::channel::<WatchEvent>(EVENT_CHANNEL_CAPACITY);
    let poll = POLL * 2;
    let _handle = spawn_watcher(&[root.clone()], PathFilter::new(&root), poll, tx)?;

    let backend = ControllableBackend::gated();
    let stats = backend.stats();
    let gate = backend.gate();
    let cancel = CancellationToken::new();
    let commands = Arc::new(CommandSpec::parse(&["go generate"])?);
    let runtime = tokio::spawn(Runtime::new(commands, rx, backend, cancel.clone()).run());

    // A single rename makes all 31 new paths visible to the same scan.
    std::fs::rename(&staging, root.join("gen"))?;

    stats.wait_for_started(1).await;
    tokio::time::sleep(poll * 4).await;
    gate.add_permits(8);
    tokio::time::sleep(poll * 4).await;

    assert_eq!(stats.started(), 1, "one scan must not produce a follow-up run");

    cancel.cancel();
    let summary = with_timeout(runtime).await??;
    assert_eq!(summary.runs, 1);
    Ok(())
}
