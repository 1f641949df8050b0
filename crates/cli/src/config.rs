// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host configuration.
//!
//! Everything lives in one state directory:
//! - `config.toml`: backend location and timings (every key optional)
//! - `queue.db`: the offline queue
//! - `watch.lock`: held by the running `outbox watch` worker
//! - `outbox.log`: worker log

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use outbox_core::{HttpConfig, ProbeConfig};

use crate::env;
use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_FILE_NAME: &str = "queue.db";
const LOCK_FILE_NAME: &str = "watch.lock";
const LOG_FILE_NAME: &str = "outbox.log";

/// Configuration stored in `<state dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL that queued endpoints are joined onto.
    pub base_url: String,
    /// Path probed to decide whether the backend is reachable.
    pub health_path: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How often `outbox watch` probes the backend.
    pub probe_interval_secs: u64,
    /// How often `outbox watch` retries the queue while staying online.
    pub sync_hint_interval_secs: u64,
    /// Bearer token sent with every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://localhost:8000".to_string(),
            health_path: "/api/health".to_string(),
            timeout_secs: 10,
            probe_interval_secs: 15,
            sync_hint_interval_secs: 300,
            auth_token: None,
        }
    }
}

impl Config {
    /// Loads `config.toml` from the state directory, or the defaults if absent.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the file, applies `OUTBOX_BASE_URL` / `OUTBOX_TOKEN`, and validates.
    pub fn resolve(state_dir: &Path) -> Result<Self> {
        let config = Config::load(state_dir)?.with_overrides(env::base_url(), env::token());
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL and token where an override is present.
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if token.is_some() {
            self.auth_token = token;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "invalid base_url '{}'\n  hint: base_url must start with http:// or https://",
                self.base_url
            )));
        }
        for (key, value) in [
            ("timeout_secs", self.timeout_secs),
            ("probe_interval_secs", self.probe_interval_secs),
            ("sync_hint_interval_secs", self.sync_hint_interval_secs),
        ] {
            if value == 0 {
                return Err(Error::Config(format!(
                    "{} must be greater than zero\n  hint: set it in {}",
                    key, CONFIG_FILE_NAME
                )));
            }
        }
        Ok(())
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            health_path: self.health_path.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            auth_token: self.auth_token.clone(),
        }
    }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            probe_interval: Duration::from_secs(self.probe_interval_secs),
            sync_hint_interval: Duration::from_secs(self.sync_hint_interval_secs),
        }
    }
}

/// The state directory: `$OUTBOX_STATE_DIR`, else `$XDG_STATE_HOME/outbox`,
/// else `~/.local/state/outbox`.
pub fn state_dir() -> PathBuf {
    resolve_state_dir(env::state_dir(), env::xdg_state_home(), dirs::home_dir())
}

pub(crate) fn resolve_state_dir(
    explicit: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Some(dir) = xdg_state_home {
        return dir.join("outbox");
    }
    home.map(|h| h.join(".local/state/outbox"))
        .unwrap_or_else(|| PathBuf::from(".local/state/outbox"))
}

pub fn queue_path(state_dir: &Path) -> PathBuf {
    state_dir.join(QUEUE_FILE_NAME)
}

pub fn lock_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOCK_FILE_NAME)
}

pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
