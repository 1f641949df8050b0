// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local sync state.
//!
//! [`SyncState`] is shared by the connectivity monitor, the sync coordinator
//! and the facade. Fields are atomics for lock-free reads; every change is
//! republished as a [`QueueStatus`] on a watch channel for UI observers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;

/// Read model exposed to the UI layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub is_online: bool,
    pub pending_count: usize,
    pub is_syncing: bool,
}

/// Why a sync attempt did not start a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Offline,
    AlreadySyncing,
}

/// Shared online/syncing/pending flags. Not persisted.
pub struct SyncState {
    online: AtomicBool,
    syncing: AtomicBool,
    pending: AtomicUsize,
    /// Held across a store count and the store of its result.
    refresh: Mutex<()>,
    changes: watch::Sender<QueueStatus>,
}

impl SyncState {
    pub fn new(is_online: bool, pending_count: usize) -> Self {
        let (changes, _) = watch::channel(QueueStatus {
            is_online,
            pending_count,
            is_syncing: false,
        });
        SyncState {
            online: AtomicBool::new(is_online),
            syncing: AtomicBool::new(false),
            pending: AtomicUsize::new(pending_count),
            refresh: Mutex::new(()),
            changes,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> QueueStatus {
        QueueStatus {
            is_online: self.is_online(),
            pending_count: self.pending_count(),
            is_syncing: self.is_syncing(),
        }
    }

    /// Receive a fresh [`QueueStatus`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<QueueStatus> {
        self.changes.subscribe()
    }

    /// Record connectivity. Returns the previous value.
    pub(crate) fn set_online(&self, online: bool) -> bool {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous != online {
            self.publish();
        }
        previous
    }

    /// Enter `SYNCING` if online and no pass is running.
    ///
    /// The check and the transition are a single atomic step, so two
    /// triggers racing each other cannot both start a pass.
    pub(crate) fn try_begin_sync(&self) -> Result<(), SkipReason> {
        if !self.is_online() {
            return Err(SkipReason::Offline);
        }
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SkipReason::AlreadySyncing)?;
        self.publish();
        Ok(())
    }

    /// Return to `IDLE`.
    pub(crate) fn end_sync(&self) {
        self.syncing.store(false, Ordering::Release);
        self.publish();
    }

    pub(crate) fn set_pending(&self, count: usize) {
        let previous = self.pending.swap(count, Ordering::AcqRel);
        if previous != count {
            self.publish();
        }
    }

    /// Replace the pending count with the value `count` reads.
    ///
    /// Refreshes are serialized, so a count taken before a later mutation
    /// can never overwrite one taken after it. On error the previous count
    /// is kept.
    pub(crate) fn refresh_pending<E>(
        &self,
        count: impl FnOnce() -> Result<usize, E>,
    ) -> Result<usize, E> {
        let _serial = self.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        let count = count()?;
        self.set_pending(count);
        Ok(count)
    }

    /// Publish the current flags. The status is read under the channel's
    /// lock so the last publish always carries the latest values.
    fn publish(&self) {
        self.changes.send_modify(|status| *status = self.snapshot());
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
