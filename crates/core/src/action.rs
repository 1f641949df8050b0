// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued action records.
//!
//! A [`QueuedAction`] is one deferred mutating network call. The `kind` tag is
//! only for diagnostics; replay uses `endpoint`, `method` and `payload`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// HTTP verb used when an action is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// The caller-supplied part of a queued action, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedActionInput {
    pub kind: String,
    pub endpoint: String,
    pub method: Method,
    pub payload: Option<Value>,
}

impl QueuedActionInput {
    pub fn new(kind: impl Into<String>, endpoint: impl Into<String>, method: Method) -> Self {
        QueuedActionInput {
            kind: kind.into(),
            endpoint: endpoint.into(),
            method,
            payload: None,
        }
    }

    /// Attach a JSON request body.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A durable record of one deferred network mutation awaiting replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    /// Store-assigned, strictly increasing, never reused.
    pub id: i64,
    pub kind: String,
    pub endpoint: String,
    pub method: Method,
    pub payload: Option<Value>,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedAction {
    /// One-line description for logs and listings.
    pub fn summary(&self) -> String {
        format!("#{} {} {} ({})", self.id, self.method, self.endpoint, self.kind)
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
