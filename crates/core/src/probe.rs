// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background connectivity worker.
//!
//! Hosts without a platform reachability signal run a [`ProbeWorker`]: it
//! probes the backend on a fixed interval and feeds the result to the
//! connectivity monitor, and periodically raises a sync hint so actions that
//! failed while online are retried without waiting for a transition.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::outbox::Outbox;

/// Timing for the background worker.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// How often to probe the backend.
    pub probe_interval: Duration,
    /// How often to raise a sync hint.
    pub sync_hint_interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            probe_interval: Duration::from_secs(15),
            sync_hint_interval: Duration::from_secs(300),
        }
    }
}

pub struct ProbeWorker {
    outbox: Arc<Outbox>,
    config: ProbeConfig,
    cancel_token: CancellationToken,
}

impl ProbeWorker {
    pub fn new(outbox: Arc<Outbox>, config: ProbeConfig) -> Self {
        ProbeWorker {
            outbox,
            config,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Token that stops the worker when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Probe immediately, then on every interval until cancelled.
    pub async fn run(self) {
        let mut probe = interval(self.config.probe_interval);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let hint_every = self.config.sync_hint_interval;
        let mut hint = interval_at(Instant::now() + hint_every, hint_every);
        hint.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "probe worker started: probe every {:?}, sync hint every {:?}",
            self.config.probe_interval,
            hint_every
        );

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    tracing::info!("probe worker stopped");
                    return;
                }
                _ = probe.tick() => {
                    let online = self.outbox.probe_connectivity().await;
                    tracing::debug!("probe: online={}", online);
                }
                _ = hint.tick() => {
                    self.outbox.monitor().sync_hint();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
