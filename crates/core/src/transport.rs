// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network transport abstraction.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP replays against the backend for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

use crate::action::{Method, QueuedAction};

/// Error type for transport operations.
///
/// Every variant is retryable: a failed replay leaves its action queued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    /// The server could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other failure building or sending the request.
    #[error("request failed: {0}")]
    Request(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// One network call, as replayed from a queued action.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRequest {
    pub endpoint: String,
    pub method: Method,
    pub payload: Option<Value>,
}

impl ReplayRequest {
    pub fn new(endpoint: impl Into<String>, method: Method, payload: Option<Value>) -> Self {
        ReplayRequest {
            endpoint: endpoint.into(),
            method,
            payload,
        }
    }
}

impl From<&QueuedAction> for ReplayRequest {
    fn from(action: &QueuedAction) -> Self {
        ReplayRequest {
            endpoint: action.endpoint.clone(),
            method: action.method,
            payload: action.payload.clone(),
        }
    }
}

/// Transport trait for replaying requests against the backend.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations. Implementations own the
/// per-request timeout.
pub trait Transport: Send + Sync {
    /// Perform the request. `Ok` means the backend accepted it.
    fn replay(
        &self,
        request: ReplayRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Check whether the backend is currently reachable.
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL that relative endpoints are joined onto.
    pub base_url: String,
    /// Path probed by [`Transport::probe`].
    pub health_path: String,
    /// Upper bound for a single request.
    pub timeout: Duration,
    /// Optional bearer token sent with every request.
    pub auth_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            base_url: "http://localhost:8000".to_string(),
            health_path: "/api/health".to_string(),
            timeout: Duration::from_secs(10),
            auth_token: None,
        }
    }
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: HttpConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(HttpTransport { client, config })
    }

    /// Resolve an endpoint against the configured base URL.
    ///
    /// Absolute `http(s)://` endpoints are used verbatim.
    pub fn url_for(&self, endpoint: &str) -> String {
        join_url(&self.config.base_url, endpoint)
    }
}

pub(crate) fn join_url(base: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    let base = base.trim_end_matches('/');
    if endpoint.is_empty() {
        base.to_string()
    } else if endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::ConnectionFailed(err.to_string())
    } else if let Some(status) = err.status() {
        TransportError::Status {
            status: status.as_u16(),
        }
    } else {
        TransportError::Request(err.to_string())
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    fn replay(
        &self,
        request: ReplayRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let url = self.url_for(&request.endpoint);
            let mut builder = self.client.request(to_reqwest(request.method), &url);
            if let Some(token) = &self.config.auth_token {
                builder = builder.bearer_auth(token);
            }
            if let Some(payload) = &request.payload {
                builder = builder.json(payload);
            }

            let response = builder.send().await.map_err(classify)?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(TransportError::Status {
                    status: status.as_u16(),
                })
            }
        })
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            let url = self.url_for(&self.config.health_path);
            match self.client.get(&url).send().await {
                Ok(response) => response.status().is_success(),
                Err(e) => {
                    tracing::debug!("probe of {} failed: {}", url, e);
                    false
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
