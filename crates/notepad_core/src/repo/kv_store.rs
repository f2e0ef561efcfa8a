//! Key-value store contract and implementations.
//!
//! # Responsibility
//! - Define the string-keyed device store the gateway persists into.
//! - Provide a SQLite-backed store and an in-memory test double.
//!
//! # Invariants
//! - `set` unconditionally overwrites the previous value of a key.
//! - `get` on a missing key returns `Ok(None)`, never an error.
//! - Implementations are `Send` so a `StoreQueue` worker can own them.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a key-value store or its queue.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite transport or bootstrap failure.
    Db(DbError),
    /// Backend-specific failure described by a message.
    Backend(String),
    /// The store worker is gone; the operation was never executed.
    QueueClosed,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "store backend failure: {message}"),
            Self::QueueClosed => write!(f, "store queue is closed"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) | Self::QueueClosed => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed store with get/set/remove, no transactions or range queries.
pub trait KeyValueStore: Send + 'static {
    /// Reads one key.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Overwrites one key.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Deletes one key. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// SQLite-backed device store using the `kv_store` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (and migrates) a store file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a migrated in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory store. Clones share the same map, so a test can keep one
/// handle for inspection while a queue owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail until reset.
    pub fn fail_reads(&self, enabled: bool) {
        self.lock().fail_reads = enabled;
    }

    /// Makes every subsequent `set`/`remove` fail until reset.
    pub fn fail_writes(&self, enabled: bool) {
        self.lock().fail_writes = enabled;
    }

    /// Returns the raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Writes a raw value, bypassing failure injection.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.lock()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(StoreError::Backend(format!("injected read failure for `{key}`")));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(StoreError::Backend(format!("injected write failure for `{key}`")));
        }
        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(StoreError::Backend(format!("injected write failure for `{key}`")));
        }
        state.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError};

    #[test]
    fn sqlite_store_overwrites_and_removes() {
        let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(store.get("@Notes").unwrap(), None);

        store.set("@Notes", "[]").unwrap();
        store.set("@Notes", "[{}]").unwrap();
        assert_eq!(store.get("@Notes").unwrap().as_deref(), Some("[{}]"));

        store.remove("@Notes").unwrap();
        assert_eq!(store.get("@Notes").unwrap(), None);
        store.remove("@Notes").unwrap();
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let inspector = MemoryKeyValueStore::new();
        let mut writer = inspector.clone();

        writer.set("@NotesIndex", "25").unwrap();

        assert_eq!(inspector.raw("@NotesIndex").as_deref(), Some("25"));
    }

    #[test]
    fn memory_store_failure_injection() {
        let mut store = MemoryKeyValueStore::new();
        store.put_raw("k", "v");

        store.fail_reads(true);
        assert!(matches!(store.get("k"), Err(StoreError::Backend(_))));
        store.fail_reads(false);

        store.fail_writes(true);
        assert!(store.set("k", "w").is_err());
        assert!(store.remove("k").is_err());
        assert_eq!(store.raw("k").as_deref(), Some("v"));
    }
}
