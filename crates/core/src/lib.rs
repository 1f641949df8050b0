// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: Offline action queue and sync engine
//!
//! Mutating requests made while the network is unavailable are persisted to
//! a local SQLite queue and replayed, in order, once connectivity returns.
//! This crate provides the queue store, the connectivity monitor, the sync
//! coordinator and the [`Outbox`] facade that ties them together.

pub mod action;
pub mod connectivity;
pub mod coordinator;
pub mod error;
pub mod outbox;
pub mod probe;
pub mod state;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use action::{Method, QueuedAction, QueuedActionInput};
pub use connectivity::{ConnectivityEvent, ConnectivityMonitor, Listener};
pub use coordinator::{SyncCoordinator, SyncOutcome, SyncReport};
pub use error::{Error, Result};
pub use outbox::{Outbox, SubmitOutcome};
pub use probe::{ProbeConfig, ProbeWorker};
pub use state::{QueueStatus, SkipReason, SyncState};
pub use store::{QueueStore, SqliteStore};
pub use transport::{
    HttpConfig, HttpTransport, ReplayRequest, Transport, TransportError, TransportResult,
};
