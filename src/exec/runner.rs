// src/exec/runner.rs

//! Sequential command runner.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::exec::command::{CommandLine, CommandSpec};
use crate::exec::{CommandOutcome, RunReport};

const PIPE_READ_BUF: usize = 8 * 1024;

/// Run every command of `commands` in order, stopping at the first one that
/// does not succeed.
///
/// Combined stdout/stderr of each command is written to `sink` as soon as it
/// is read, and accumulated in [`RunReport::output`]. Cancelling `cancel`
/// kills the command currently running and aborts the sequence.
pub async fn run_sequence<W>(
    commands: &CommandSpec,
    cancel: &CancellationToken,
    sink: &mut W,
) -> RunReport
where
    W: AsyncWrite + Unpin + Send,
{
    let mut report = RunReport::default();
    let total = commands.len();

    for (index, command) in commands.iter().enumerate() {
        let outcome = match run_command(command, cancel, sink, &mut report.output).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(cmd = %command, error = %format!("{err:#}"), "could not run command");
                CommandOutcome::Error(format!("{err:#}"))
            }
        };

        let success = outcome.is_success();
        report.outcomes.push(outcome);

        if !success {
            report.early_abort = true;
            let skipped = total - index - 1;
            if skipped > 0 {
                info!(cmd = %command, skipped, "skipping remaining commands");
            }
            break;
        }
    }

    report
}

async fn run_command<W>(
    command: &CommandLine,
    cancel: &CancellationToken,
    sink: &mut W,
    output: &mut Vec<u8>,
) -> Result<CommandOutcome>
where
    W: AsyncWrite + Unpin + Send,
{
    if cancel.is_cancelled() {
        return Ok(CommandOutcome::Cancelled);
    }

    info!(cmd = %command, "starting command");

    let mut cmd = Command::new(command.program());
    cmd.args(command.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{command}'"))?;

    // Both pipes feed one channel so output is written in arrival order.
    let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(16);
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_pipe(stdout, chunk_tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_pipe(stderr, chunk_tx.clone()));
    }
    drop(chunk_tx);

    loop {
        tokio::select! {
            chunk = chunk_rx.recv() => match chunk {
                Some(bytes) => {
                    sink.write_all(&bytes).await.context("writing command output")?;
                    sink.flush().await.context("flushing command output")?;
                    output.extend_from_slice(&bytes);
                }
                None => break,
            },
            _ = cancel.cancelled() => {
                kill_child(command, &mut child).await;
                return Ok(CommandOutcome::Cancelled);
            }
        }
    }

    let status = tokio::select! {
        status = child.wait() => {
            status.with_context(|| format!("waiting for '{command}'"))?
        }
        _ = cancel.cancelled() => {
            kill_child(command, &mut child).await;
            return Ok(CommandOutcome::Cancelled);
        }
    };

    let code = status.code().unwrap_or(-1);
    if status.success() {
        info!(cmd = %command, "command finished");
        Ok(CommandOutcome::Success)
    } else {
        warn!(cmd = %command, exit_code = code, "command failed");
        Ok(CommandOutcome::Failed(code))
    }
}

async fn forward_pipe<R>(mut reader: R, tx: mpsc::Sender<Vec<u8>>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; PIPE_READ_BUF];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
            Err(err) => {
                debug!(error = %err, "error reading command output");
                break;
            }
        }
    }
}

async fn kill_child(command: &CommandLine, child: &mut Child) {
    info!(cmd = %command, "cancellation requested; killing command");
    if let Err(e) = child.kill().await {
        warn!(cmd = %command, error = %e, "failed to kill command on cancellation");
    }
}
