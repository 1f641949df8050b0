// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue store.
//!
//! [`QueueStore`] is the persistence seam used by the sync coordinator and the
//! facade. [`SqliteStore`] is the production implementation: one table with an
//! `AUTOINCREMENT` key, so ids are strictly increasing and never reused, even
//! after the newest row is deleted or the table is cleared.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::action::{Method, QueuedAction, QueuedActionInput};
use crate::error::{Error, Result};

/// SQL schema for the queue database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS queued_actions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    endpoint TEXT NOT NULL,
    method TEXT NOT NULL,
    payload TEXT,
    enqueued_at TEXT NOT NULL
);
"#;

/// Ordered, durable persistence of queued actions.
///
/// Implementations must return records in ascending id order and treat
/// removal of a missing id as a successful no-op: the coordinator's
/// "replay then remove" sequence is not atomic, so a removal may be retried
/// after a crash.
pub trait QueueStore: Send + Sync {
    /// Open or create the underlying storage. Idempotent.
    fn initialize(&self) -> Result<()>;

    /// Persist a new action and return its assigned id.
    ///
    /// On error the action was not queued.
    fn append(&self, input: &QueuedActionInput) -> Result<i64>;

    /// All queued actions in ascending id order.
    fn list_all(&self) -> Result<Vec<QueuedAction>>;

    /// Number of queued actions. Always equal to `list_all()?.len()`.
    fn count(&self) -> Result<usize> {
        Ok(self.list_all()?.len())
    }

    /// Delete the action with the given id, if present.
    fn remove(&self, id: i64) -> Result<()>;

    /// Delete every queued action.
    fn clear(&self) -> Result<()>;
}

/// Where a [`SqliteStore`] keeps its data.
#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite-backed [`QueueStore`].
///
/// The connection is opened lazily on first use and shared by every caller
/// through a mutex. A failed open is not remembered; the next operation tries
/// again.
pub struct SqliteStore {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Create a store backed by the database file at `path`.
    ///
    /// Nothing is touched on disk until [`QueueStore::initialize`] or the
    /// first operation.
    pub fn new(path: &Path) -> Self {
        SqliteStore {
            location: Location::File(path.to_path_buf()),
            conn: Mutex::new(None),
        }
    }

    /// Create a store that lives only as long as this value (for testing).
    pub fn in_memory() -> Self {
        SqliteStore {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    fn open(&self) -> Result<Connection> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            Error::StorageUnavailable(format!("{}: {}", parent.display(), e))
                        })?;
                    }
                }
                let conn = Connection::open(path).map_err(|e| {
                    Error::StorageUnavailable(format!("{}: {}", path.display(), e))
                })?;
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = FULL;
                     PRAGMA busy_timeout = 5000;",
                )
                .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
                conn
            }
            Location::Memory => {
                Connection::open_in_memory().map_err(|e| Error::StorageUnavailable(e.to_string()))?
            }
        };

        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
        tracing::debug!("queue store opened: {:?}", self.location);
        Ok(conn)
    }

    /// Run `f` against the shared connection, opening it first if needed.
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| Error::StorageUnavailable("queue store lock poisoned".to_string()))?;
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.open()?,
        };
        let conn = guard.insert(conn);
        f(conn)
    }
}

/// Build a conversion error for a column holding an unexpected value.
fn corrupted(column: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(Error::CorruptedData(format!(
            "invalid value '{value}' in column '{column}'"
        ))),
    )
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupted("enqueued_at", value))
}

fn row_to_action(row: &Row<'_>) -> std::result::Result<QueuedAction, rusqlite::Error> {
    let method: String = row.get(3)?;
    let payload: Option<String> = row.get(4)?;
    let enqueued_at: String = row.get(5)?;

    let payload = payload
        .map(|text| serde_json::from_str(&text).map_err(|_| corrupted("payload", &text)))
        .transpose()?;

    Ok(QueuedAction {
        id: row.get(0)?,
        kind: row.get(1)?,
        endpoint: row.get(2)?,
        method: method
            .parse::<Method>()
            .map_err(|_| corrupted("method", &method))?,
        payload,
        enqueued_at: parse_timestamp(&enqueued_at)?,
    })
}

impl QueueStore for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.with_conn(|_| Ok(()))
    }

    fn append(&self, input: &QueuedActionInput) -> Result<i64> {
        let payload = input
            .payload
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO queued_actions (kind, endpoint, method, payload, enqueued_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    input.kind,
                    input.endpoint,
                    input.method.as_str(),
                    payload,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(Error::StorageWrite)?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn list_all(&self) -> Result<Vec<QueuedAction>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, kind, endpoint, method, payload, enqueued_at
                     FROM queued_actions ORDER BY id ASC",
                )
                .map_err(Error::StorageRead)?;
            let actions = stmt
                .query_map([], row_to_action)
                .map_err(Error::StorageRead)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::StorageRead)?;
            Ok(actions)
        })
    }

    fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM queued_actions", [], |row| row.get(0))
                .map_err(Error::StorageRead)?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }

    fn remove(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM queued_actions WHERE id = ?1", params![id])
                .map_err(Error::StorageWrite)?;
            Ok(())
        })
    }

    fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM queued_actions", [])
                .map_err(Error::StorageWrite)?;
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
