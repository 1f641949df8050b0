// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod completion;
pub mod enqueue;
pub mod list;
pub mod status;
pub mod submit;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use outbox_core::{
    HttpTransport, Method, Outbox, QueueStore, QueuedActionInput, SqliteStore, Transport,
};
use serde_json::Value;

use crate::cli::ActionArgs;
use crate::config::{self, Config};
use crate::error::{Error, Result};

/// An outbox wired to the real store and backend.
pub struct Context {
    pub outbox: Arc<Outbox>,
    pub config: Config,
    pub state_dir: PathBuf,
}

/// Helper to open the outbox in `state_dir`.
///
/// With `probe` set the backend is probed first and the answer becomes the
/// initial online flag, so no connectivity transition (and no background
/// pass) fires while the command runs. Otherwise the outbox starts offline.
pub async fn open(state_dir: &Path, probe: bool) -> Result<Context> {
    let config = Config::resolve(state_dir)?;
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.http_config())?);
    let online = if probe {
        transport.probe().await
    } else {
        false
    };
    tracing::debug!("opening {} (online={})", state_dir.display(), online);

    let store: Arc<dyn QueueStore> = Arc::new(SqliteStore::new(&config::queue_path(state_dir)));
    Ok(Context {
        outbox: Arc::new(Outbox::new(store, transport, online)),
        config,
        state_dir: state_dir.to_path_buf(),
    })
}

/// Build the queued action described on the command line.
pub(crate) fn action_input(args: &ActionArgs) -> Result<QueuedActionInput> {
    let kind = args
        .kind
        .clone()
        .unwrap_or_else(|| default_kind(args.method, &args.endpoint));
    let mut input = QueuedActionInput::new(kind, args.endpoint.clone(), args.method);
    input.payload = parse_payload(args.data.as_deref())?;
    Ok(input)
}

/// `<method>_<first path segment>`, lower-cased, e.g. `post_items`.
pub(crate) fn default_kind(method: Method, endpoint: &str) -> String {
    let method = method.as_str().to_lowercase();
    // Drop scheme and host from absolute URLs
    let path = match endpoint.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => endpoint,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.split('/').find(|s| !s.is_empty()) {
        Some(segment) => format!("{}_{}", method, segment.to_lowercase()),
        None => method,
    }
}

pub(crate) fn parse_payload(data: Option<&str>) -> Result<Option<Value>> {
    data.map(|raw| serde_json::from_str(raw).map_err(|e| Error::InvalidPayload(e.to_string())))
        .transpose()
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
