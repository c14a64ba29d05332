// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_config, WatchConfig};
use crate::engine::{Runtime, EVENT_CHANNEL_CAPACITY};
use crate::exec::ProcessBackend;
use crate::fs::RealFileSystem;
use crate::types::WatchEvent;
use crate::watch::{spawn_watcher, PathFilter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (working dir, ignore file, commands)
/// - path filter + polling watcher
/// - the orchestrator runtime and the process backend
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args, &RealFileSystem)?;
    log_startup(&cfg);

    let filter = PathFilter::from_config(&cfg);
    debug!(?filter, "compiled path filter");

    let (event_tx, event_rx) = mpsc::channel::<WatchEvent>(EVENT_CHANNEL_CAPACITY);
    let _watcher_handle = spawn_watcher(&cfg.roots, filter, cfg.poll_interval, event_tx)?;

    // Ctrl-C cancels everything, including a command that is mid-run.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    let runtime = Runtime::new(
        cfg.commands.clone(),
        event_rx,
        ProcessBackend::stdout(),
        cancel,
    );
    runtime.run().await?;
    Ok(())
}

fn log_startup(cfg: &WatchConfig) {
    let commands: Vec<String> = cfg.commands.iter().map(|c| c.to_string()).collect();
    info!(
        base_dir = ?cfg.base_dir,
        roots = ?cfg.roots,
        ?commands,
        "runwatch starting"
    );
    if !cfg.include.is_empty() {
        info!(globs = ?cfg.include, "only paths matching include globs trigger runs");
    }
    if let Some(patterns) = &cfg.ignore_file_patterns {
        debug!(count = patterns.len(), "loaded ignore-file patterns");
    }
}
