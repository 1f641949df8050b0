// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the outboxrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] outbox_core::Error),

    #[error("transport error: {0}")]
    Transport(#[from] outbox_core::TransportError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid payload: {0}\n  hint: --data must be a JSON document, e.g. '{{\"content\": \"buy milk\"}}'")]
    InvalidPayload(String),

    #[error("action was not queued\n  hint: the offline queue could not be written; run with --verbose for details")]
    NotQueued,

    #[error("another worker is already draining this queue\n  hint: lock held on {0}")]
    WorkerRunning(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for outboxrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
