// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `outbox watch`: drain the queue in the foreground.
//!
//! Only one worker may drain a queue at a time; an exclusive lock on
//! `watch.lock` in the state directory enforces this across processes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use outbox_core::ProbeWorker;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::error::{Error, Result};

use super::open;

pub async fn run(state_dir: &Path) -> Result<()> {
    fs::create_dir_all(state_dir)?;
    let lock_path = config::lock_path(state_dir);
    let lock_file = acquire_lock(&lock_path)?;

    let ctx = open(state_dir, false).await?;
    tracing::info!("watch started in {}", ctx.state_dir.display());
    eprintln!(
        "watching {} with {} queued (Ctrl-C to stop)",
        ctx.config.base_url,
        ctx.outbox.pending_count()
    );

    let worker = ProbeWorker::new(Arc::clone(&ctx.outbox), ctx.config.probe_config());
    let cancel = worker.cancel_token();
    let handle = worker.spawn();

    wait_for_shutdown(&cancel).await;
    cancel.cancel();
    if let Err(e) = handle.await {
        tracing::warn!("probe worker ended abnormally: {}", e);
    }

    tracing::info!("watch stopped with {} queued", ctx.outbox.pending_count());
    drop(lock_file);
    Ok(())
}

async fn wait_for_shutdown(cancel: &CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!("could not listen for Ctrl-C: {}", e);
                cancel.cancelled().await;
            }
        }
        _ = cancel.cancelled() => {}
    }
}

/// Take the single-worker lock, or fail if another worker holds it.
pub(crate) fn acquire_lock(lock_path: &Path) -> Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::WorkerRunning(lock_path.display().to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
