// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for coordinator and facade tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;

use crate::action::{Method, QueuedAction, QueuedActionInput};
use crate::error::{Error, Result};
use crate::store::{QueueStore, SqliteStore};
use crate::transport::{ReplayRequest, Transport, TransportError, TransportResult};

/// Mock transport for testing without real sockets.
///
/// Every replay is recorded before it resolves, so a held replay still counts
/// as a network call that has started.
pub struct MockTransport {
    /// Requests received via replay(), in call order.
    calls: Mutex<Vec<ReplayRequest>>,
    /// Endpoints that fail, and how.
    failures: Mutex<HashMap<String, TransportError>>,
    /// Value returned by probe().
    reachable: AtomicBool,
    /// Replays wait until this is true.
    gate: watch::Sender<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        MockTransport {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            reachable: AtomicBool::new(true),
            gate,
        }
    }

    /// Make every replay of `endpoint` fail with `err`.
    pub fn fail_endpoint(&self, endpoint: &str, err: TransportError) {
        self.failures
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), err);
    }

    /// Let `endpoint` succeed again.
    pub fn succeed_endpoint(&self, endpoint: &str) {
        self.failures.lock().unwrap().remove(endpoint);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Block replays until [`MockTransport::release`] is called.
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    pub fn calls(&self) -> Vec<ReplayRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Yield until at least `n` replays have started.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("timed out waiting for replays");
    }
}

impl Transport for MockTransport {
    fn replay(
        &self,
        request: ReplayRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let endpoint = request.endpoint.clone();
            self.calls.lock().unwrap().push(request);

            let mut gate = self.gate.subscribe();
            let _ = gate.wait_for(|open| *open).await;

            let failure = self.failures.lock().unwrap().get(&endpoint).cloned();
            match failure {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move { self.reachable.load(Ordering::SeqCst) })
    }
}

/// A store whose every operation fails the way an unavailable disk would.
pub struct UnavailableStore;

impl QueueStore for UnavailableStore {
    fn initialize(&self) -> Result<()> {
        Err(Error::StorageUnavailable("mock: storage denied".into()))
    }

    fn append(&self, _input: &QueuedActionInput) -> Result<i64> {
        Err(Error::StorageUnavailable("mock: storage denied".into()))
    }

    fn list_all(&self) -> Result<Vec<QueuedAction>> {
        Err(Error::StorageUnavailable("mock: storage denied".into()))
    }

    fn remove(&self, _id: i64) -> Result<()> {
        Err(Error::StorageUnavailable("mock: storage denied".into()))
    }

    fn clear(&self) -> Result<()> {
        Err(Error::StorageUnavailable("mock: storage denied".into()))
    }
}

/// An in-memory store whose reads block the calling thread, the way SQLite
/// does while another process holds the database.
pub struct SlowStore {
    inner: SqliteStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        SlowStore {
            inner: SqliteStore::in_memory(),
            delay,
        }
    }
}

impl QueueStore for SlowStore {
    fn initialize(&self) -> Result<()> {
        self.inner.initialize()
    }

    fn append(&self, input: &QueuedActionInput) -> Result<i64> {
        self.inner.append(input)
    }

    fn list_all(&self) -> Result<Vec<QueuedAction>> {
        std::thread::sleep(self.delay);
        self.inner.list_all()
    }

    fn remove(&self, id: i64) -> Result<()> {
        self.inner.remove(id)
    }

    fn clear(&self) -> Result<()> {
        self.inner.clear()
    }
}

/// Create a POST action input whose payload names the endpoint.
pub fn post(endpoint: &str) -> QueuedActionInput {
    QueuedActionInput::new("create_item", endpoint, Method::Post)
        .with_payload(json!({"endpoint": endpoint}))
}
