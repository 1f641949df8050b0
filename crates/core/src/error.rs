// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for outbox-core operations.

use thiserror::Error;

/// All possible errors that can occur in outbox-core operations.
///
/// Network replay failures are not represented here. They never surface past
/// the sync coordinator (see [`crate::TransportError`]).
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage unavailable: {0}\n  hint: check that the state directory exists and is writable")]
    StorageUnavailable(String),

    #[error("storage write failed: {0}")]
    StorageWrite(#[source] rusqlite::Error),

    #[error("storage read failed: {0}")]
    StorageRead(#[source] rusqlite::Error),

    #[error("invalid method: '{0}'\n  hint: valid methods are: GET, POST, PUT, PATCH, DELETE")]
    InvalidMethod(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if the error means the store could not be opened at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::StorageUnavailable(_))
    }
}

/// A specialized Result type for outbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
