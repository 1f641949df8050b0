// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync coordinator: drains the queue against the network, one pass at a time.
//!
//! State machine: `IDLE -> SYNCING -> IDLE`. A pass:
//! 1. Enters `SYNCING` atomically, or returns immediately when offline or
//!    when another pass is running
//! 2. Snapshots the queue once; actions enqueued later wait for the next pass
//! 3. Replays each action in id order, removing it as soon as it succeeds
//! 4. Leaves failed actions queued and moves on (no head-of-line blocking)
//! 5. Returns to `IDLE` and recomputes the pending count from the store
//!
//! Individual failures never propagate to the caller. An action that can
//! never succeed stays queued and is retried on every pass.
//!
//! Store calls made during a pass run on the blocking pool, since SQLite may
//! wait up to its busy timeout when another process holds the database.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::state::{SkipReason, SyncState};
use crate::store::QueueStore;
use crate::transport::{ReplayRequest, Transport};

/// Counts from one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Actions in the snapshot.
    pub attempted: usize,
    /// Actions confirmed by the network and removed.
    pub replayed: usize,
    /// Actions left queued after a failed replay.
    pub failed: usize,
    /// Pending count after the pass, if the store could be read.
    pub remaining: Option<usize>,
}

/// Result of [`SyncCoordinator::attempt_sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Skipped(SkipReason),
    Completed(SyncReport),
}

/// Drains a [`QueueStore`] through a [`Transport`].
pub struct SyncCoordinator {
    store: Arc<dyn QueueStore>,
    transport: Arc<dyn Transport>,
    state: Arc<SyncState>,
}

/// Returns the coordinator to `IDLE` even if the pass future is dropped.
struct PassGuard<'a> {
    coordinator: &'a SyncCoordinator,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.state.end_sync();
    }
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<dyn QueueStore>,
        transport: Arc<dyn Transport>,
        state: Arc<SyncState>,
    ) -> Self {
        SyncCoordinator {
            store,
            transport,
            state,
        }
    }

    /// Recompute the pending count from a fresh store read.
    ///
    /// On a read failure the previous count is kept and `None` is returned.
    pub fn refresh_pending(&self) -> Option<usize> {
        refresh(self.store.as_ref(), &self.state)
    }

    /// [`SyncCoordinator::refresh_pending`] on the blocking pool.
    async fn refresh_pending_off_thread(&self) -> Option<usize> {
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || refresh(store.as_ref(), &state))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("pending count refresh did not finish: {}", e);
                None
            })
    }

    /// Run a store call on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn QueueStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| Error::StorageUnavailable(format!("store task failed: {}", e)))?
    }

    /// Run one sync pass if online and no other pass is in progress.
    pub async fn attempt_sync(&self) -> SyncOutcome {
        // Guard-then-set happens before the first suspension point
        if let Err(reason) = self.state.try_begin_sync() {
            tracing::debug!("sync skipped: {:?}", reason);
            return SyncOutcome::Skipped(reason);
        }
        let guard = PassGuard { coordinator: self };

        let mut report = self.run_pass().await;

        drop(guard);
        report.remaining = self.refresh_pending_off_thread().await;
        tracing::info!(
            "sync pass complete: {} attempted, {} replayed, {} failed",
            report.attempted,
            report.replayed,
            report.failed
        );
        SyncOutcome::Completed(report)
    }

    async fn run_pass(&self) -> SyncReport {
        let mut report = SyncReport::default();

        let snapshot = match self.with_store(|store| store.list_all()).await {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!("sync pass could not read queue: {}", e);
                return report;
            }
        };
        report.attempted = snapshot.len();

        for action in &snapshot {
            match self.transport.replay(ReplayRequest::from(action)).await {
                Ok(()) => {
                    // Remove before moving on so a crash never re-sends a confirmed action
                    let id = action.id;
                    if let Err(e) = self.with_store(move |store| store.remove(id)).await {
                        tracing::warn!("replayed {} but could not remove it: {}", action.summary(), e);
                    } else {
                        tracing::debug!("replayed {}", action.summary());
                    }
                    report.replayed += 1;
                    self.refresh_pending_off_thread().await;
                }
                Err(e) => {
                    tracing::warn!("replay of {} failed, keeping it queued: {}", action.summary(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Recompute `state`'s pending count from `store`.
fn refresh(store: &dyn QueueStore, state: &SyncState) -> Option<usize> {
    match state.refresh_pending(|| store.count()) {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("could not refresh pending count: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
