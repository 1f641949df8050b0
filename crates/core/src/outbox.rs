// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue status facade.
//!
//! [`Outbox`] is the only surface the rest of an application touches. It owns
//! the wiring between the store, the connectivity monitor and the sync
//! coordinator, and exposes:
//! - the read model (`is_online`, `pending_count`, `is_syncing`)
//! - `enqueue` for deferred mutations and `submit` for "send now or defer"
//! - manual sync triggers
//!
//! The pending count is always recomputed from the store after a mutation,
//! never adjusted arithmetically.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::action::{Method, QueuedAction, QueuedActionInput};
use crate::connectivity::{ConnectivityEvent, ConnectivityMonitor};
use crate::coordinator::{SyncCoordinator, SyncOutcome};
use crate::error::Result;
use crate::state::{QueueStatus, SkipReason, SyncState};
use crate::store::QueueStore;
use crate::transport::{ReplayRequest, Transport};

/// Result of [`Outbox::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The network accepted the request immediately.
    Sent,
    /// The request was deferred and is now queued.
    Queued { id: i64 },
    /// The request could not be sent and could not be queued.
    Lost,
}

/// Offline action queue with automatic background draining.
pub struct Outbox {
    store: Arc<dyn QueueStore>,
    transport: Arc<dyn Transport>,
    state: Arc<SyncState>,
    monitor: Arc<ConnectivityMonitor>,
    coordinator: Arc<SyncCoordinator>,
}

impl Outbox {
    /// Wire up an outbox over `store` and `transport`.
    ///
    /// `is_online` is the platform's connectivity signal at start-up. Storage
    /// that cannot be opened does not fail construction: the outbox starts
    /// with a pending count of zero and `enqueue` reports `false` until the
    /// store becomes usable.
    pub fn new(
        store: Arc<dyn QueueStore>,
        transport: Arc<dyn Transport>,
        is_online: bool,
    ) -> Self {
        if let Err(e) = store.initialize() {
            tracing::warn!("offline queue unavailable: {}", e);
        }
        let pending = store.count().unwrap_or_else(|e| {
            tracing::warn!("could not read offline queue: {}", e);
            0
        });

        let state = Arc::new(SyncState::new(is_online, pending));
        let monitor = Arc::new(ConnectivityMonitor::new(Arc::clone(&state)));
        let coordinator = Arc::new(SyncCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&transport),
            Arc::clone(&state),
        ));

        let trigger = Arc::clone(&coordinator);
        monitor.subscribe(Arc::new(move |event: ConnectivityEvent| match event {
            ConnectivityEvent::BecameOnline | ConnectivityEvent::SyncHintReceived => {
                spawn_sync(&trigger);
            }
            ConnectivityEvent::BecameOffline => {}
        }));

        Outbox {
            store,
            transport,
            state,
            monitor,
            coordinator,
        }
    }

    /// The connectivity monitor the host feeds platform signals into.
    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    pub fn is_syncing(&self) -> bool {
        self.state.is_syncing()
    }

    pub fn pending_count(&self) -> usize {
        self.state.pending_count()
    }

    pub fn status(&self) -> QueueStatus {
        self.state.snapshot()
    }

    /// Watch every status change.
    pub fn subscribe(&self) -> watch::Receiver<QueueStatus> {
        self.state.subscribe()
    }

    /// Queue a mutating request for later replay.
    ///
    /// Returns `false` if the action could not be persisted; it is then lost
    /// and the caller must surface the failure.
    pub fn enqueue(
        &self,
        kind: impl Into<String>,
        endpoint: impl Into<String>,
        method: Method,
        payload: Option<Value>,
    ) -> bool {
        let input = QueuedActionInput {
            kind: kind.into(),
            endpoint: endpoint.into(),
            method,
            payload,
        };
        self.enqueue_action(&input).is_some()
    }

    /// Like [`Outbox::enqueue`], but reports the id the store assigned.
    pub fn enqueue_action(&self, input: &QueuedActionInput) -> Option<i64> {
        match self.store.append(input) {
            Ok(id) => {
                tracing::debug!("queued #{} {} {}", id, input.method, input.endpoint);
                self.coordinator.refresh_pending();
                Some(id)
            }
            Err(e) => {
                tracing::warn!(
                    "could not queue {} {}: {}",
                    input.method,
                    input.endpoint,
                    e
                );
                None
            }
        }
    }

    /// Send a mutating request now, or queue it if that is not possible.
    pub async fn submit(
        &self,
        kind: impl Into<String>,
        endpoint: impl Into<String>,
        method: Method,
        payload: Option<Value>,
    ) -> SubmitOutcome {
        let input = QueuedActionInput {
            kind: kind.into(),
            endpoint: endpoint.into(),
            method,
            payload,
        };

        if self.is_online() {
            let request = ReplayRequest::new(
                input.endpoint.clone(),
                input.method,
                input.payload.clone(),
            );
            match self.transport.replay(request).await {
                Ok(()) => return SubmitOutcome::Sent,
                Err(e) => {
                    tracing::info!("deferring {} {}: {}", input.method, input.endpoint, e);
                }
            }
        }

        match self.enqueue_action(&input) {
            Some(id) => SubmitOutcome::Queued { id },
            None => SubmitOutcome::Lost,
        }
    }

    /// Ask the transport whether the backend is reachable and feed the answer
    /// to the monitor. Returns the new online flag.
    pub async fn probe_connectivity(&self) -> bool {
        let reachable = self.transport.probe().await;
        if let Some(event) = self.monitor.set_online(reachable) {
            tracing::info!("connectivity changed: {:?}", event);
        }
        reachable
    }

    /// Start a sync pass in the background if online. Fire and forget.
    pub fn trigger_manual_sync(&self) {
        if self.is_online() {
            spawn_sync(&self.coordinator);
        }
    }

    /// Run a sync pass and wait for it.
    pub async fn sync_now(&self) -> SyncOutcome {
        if !self.is_online() {
            return SyncOutcome::Skipped(SkipReason::Offline);
        }
        self.coordinator.attempt_sync().await
    }

    /// Queued actions in replay order.
    pub fn pending_actions(&self) -> Result<Vec<QueuedAction>> {
        self.store.list_all()
    }

    /// Drop every queued action.
    pub fn clear(&self) -> Result<()> {
        let result = self.store.clear();
        self.coordinator.refresh_pending();
        result
    }
}

/// Run a pass on the ambient runtime without waiting for it.
fn spawn_sync(coordinator: &Arc<SyncCoordinator>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let coordinator = Arc::clone(coordinator);
            handle.spawn(async move {
                coordinator.attempt_sync().await;
            });
        }
        Err(_) => tracing::warn!("sync trigger ignored: no async runtime"),
    }
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
