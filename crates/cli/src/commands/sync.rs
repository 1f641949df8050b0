// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `outbox sync`: one pass over the queue, unless a worker already owns it.

use std::fs;
use std::path::Path;

use outbox_core::{SkipReason, SyncOutcome, SyncReport};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config;
use crate::error::{Error, Result};

use super::open;
use super::watch::acquire_lock;

/// JSON output structure for the sync command.
#[derive(Serialize)]
struct SyncJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<SyncReport>,
    pending: usize,
}

pub async fn run(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let (outcome, pending) = run_impl(state_dir).await?;
    println!("{}", render(&outcome, pending, output)?);
    Ok(())
}

/// Run one pass while holding the worker lock, so a pass never overlaps one
/// from `outbox watch` or another `outbox sync`. Returns the outcome and the
/// pending count afterwards.
pub(crate) async fn run_impl(state_dir: &Path) -> Result<(SyncOutcome, usize)> {
    fs::create_dir_all(state_dir)?;
    let _lock = match acquire_lock(&config::lock_path(state_dir)) {
        Ok(file) => file,
        Err(Error::WorkerRunning(path)) => {
            tracing::info!("{} is held, leaving the queue to its worker", path);
            let ctx = open(state_dir, false).await?;
            let pending = ctx.outbox.pending_count();
            return Ok((SyncOutcome::Skipped(SkipReason::AlreadySyncing), pending));
        }
        Err(e) => return Err(e),
    };

    let ctx = open(state_dir, true).await?;
    let outcome = ctx.outbox.sync_now().await;
    Ok((outcome, ctx.outbox.pending_count()))
}

pub(crate) fn render(outcome: &SyncOutcome, pending: usize, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => {
            let json = match *outcome {
                SyncOutcome::Skipped(reason) => SyncJson {
                    skipped: Some(reason),
                    report: None,
                    pending,
                },
                SyncOutcome::Completed(report) => SyncJson {
                    skipped: None,
                    report: Some(report),
                    pending,
                },
            };
            Ok(serde_json::to_string_pretty(&json)?)
        }
        OutputFormat::Text => Ok(match outcome {
            SyncOutcome::Skipped(SkipReason::Offline) => {
                format!("skipped: backend unreachable ({} pending)", pending)
            }
            SyncOutcome::Skipped(SkipReason::AlreadySyncing) => {
                "skipped: a sync pass is already running".to_string()
            }
            SyncOutcome::Completed(report) => format!(
                "replayed {} of {}, {} failed, {} pending",
                report.replayed, report.attempted, report.failed, pending
            ),
        }),
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
