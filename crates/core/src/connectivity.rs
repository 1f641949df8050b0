// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor.
//!
//! Translates the host platform's binary connectivity signal into discrete
//! [`ConnectivityEvent`]s. The host calls [`ConnectivityMonitor::set_online`]
//! from whatever reachability source it has, and
//! [`ConnectivityMonitor::sync_hint`] when the platform offers a background
//! sync opportunity. The monitor holds no queue logic and never retries.

use std::sync::{Arc, Mutex};

use crate::state::SyncState;

/// Events raised by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    BecameOnline,
    BecameOffline,
    /// Conditions favour a sync attempt, independent of any transition.
    SyncHintReceived,
}

/// Callback invoked for every event. Must not block.
pub type Listener = Arc<dyn Fn(ConnectivityEvent) + Send + Sync>;

/// Pure notifier over the shared online flag.
pub struct ConnectivityMonitor {
    state: Arc<SyncState>,
    listeners: Mutex<Vec<Listener>>,
}

impl ConnectivityMonitor {
    pub fn new(state: Arc<SyncState>) -> Self {
        ConnectivityMonitor {
            state,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    /// Register a listener for all future events.
    pub fn subscribe(&self, listener: Listener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }

    /// Feed the current platform signal.
    ///
    /// Only transitions raise events. The online flag is updated before any
    /// listener runs. Returns the event raised, if any.
    pub fn set_online(&self, online: bool) -> Option<ConnectivityEvent> {
        let previous = self.state.set_online(online);
        let event = match (previous, online) {
            (false, true) => ConnectivityEvent::BecameOnline,
            (true, false) => ConnectivityEvent::BecameOffline,
            _ => return None,
        };
        tracing::info!("connectivity: {:?}", event);
        self.dispatch(event);
        Some(event)
    }

    /// Report a platform sync opportunity.
    pub fn sync_hint(&self) {
        tracing::debug!("connectivity: sync hint received");
        self.dispatch(ConnectivityEvent::SyncHintReceived);
    }

    fn dispatch(&self, event: ConnectivityEvent) {
        // Snapshot so a listener may subscribe without deadlocking
        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners.clone(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
