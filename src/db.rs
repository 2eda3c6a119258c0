//! Local key-value persistence backed by SQLite.

use crate::error::DistanceError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// String-keyed storage for small serialized blobs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DistanceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DistanceError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), DistanceError>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DistanceError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, DistanceError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DistanceError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, DistanceError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DistanceError::Storage("connection lock poisoned".to_string()))?;
        Ok(f(&conn)?)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, DistanceError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
                .optional()
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DistanceError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                params![key, value],
            )
        })?;
        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DistanceError> {
        let removed = self.with_conn(|conn| conn.execute("DELETE FROM kv WHERE key = ?", [key]))?;
        debug!("Removed {} row(s) for '{}'", removed, key);
        Ok(())
    }
}
