//! Key-value blob store contracts and implementations.
//!
//! # Responsibility
//! - Provide the injected storage seam every feature persists through.
//! - Keep SQL details inside the SQLite implementation.
//!
//! # Invariants
//! - Values are opaque UTF-8 JSON documents; this layer never parses them.
//! - `set` replaces the whole value for a key (no partial writes).

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::keys::StorageKey;
use crate::repo::{RepoError, RepoResult};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Flat string-keyed blob storage.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: StorageKey) -> RepoResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: StorageKey, value: &str) -> RepoResult<()>;
    /// Deletes the key. Returns whether a value existed.
    fn remove(&self, key: StorageKey) -> RepoResult<bool>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: StorageKey) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: StorageKey, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: StorageKey) -> RepoResult<bool> {
        (**self).remove(key)
    }
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when `kv_entries` is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if has_table != 1 {
            return Err(RepoError::MissingRequiredTable("kv_entries"));
        }

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: StorageKey) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: StorageKey, value: &str) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key.as_str(), value],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=kv_set module=repo status=ok key={} bytes={}",
                    key,
                    value.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=kv_set module=repo status=error key={} error={}",
                    key, err
                );
                Err(err.into())
            }
        }
    }

    fn remove(&self, key: StorageKey) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])?;
        Ok(changed > 0)
    }
}

/// Process-local store for tests and previews.
///
/// Writes can be switched off to exercise persistence failure paths.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<StorageKey, String>>,
    read_only: Cell<bool>,
    writes: Cell<usize>,
    fail_in: Cell<Option<usize>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set`/`remove` fail with `Unavailable`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Lets `successful` more writes through, then fails exactly one.
    pub fn fail_write_after(&self, successful: usize) {
        self.fail_in.set(Some(successful));
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw stored value, bypassing any decoding.
    pub fn raw(&self, key: StorageKey) -> Option<String> {
        self.entries.borrow().get(&key).cloned()
    }

    fn ensure_writable(&self, key: StorageKey) -> RepoResult<()> {
        if self.read_only.get() {
            return Err(RepoError::Unavailable(format!(
                "memory store is read-only (key {key})"
            )));
        }
        match self.fail_in.get() {
            Some(0) => {
                self.fail_in.set(None);
                Err(RepoError::Unavailable(format!(
                    "memory store write failed (key {key})"
                )))
            }
            Some(left) => {
                self.fail_in.set(Some(left - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: StorageKey) -> RepoResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: StorageKey, value: &str) -> RepoResult<()> {
        self.ensure_writable(key)?;
        self.entries.borrow_mut().insert(key, value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> RepoResult<bool> {
        self.ensure_writable(key)?;
        Ok(self.entries.borrow_mut().remove(&key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
    use crate::db::open_db_in_memory;
    use crate::repo::{RepoError, StorageKey};

    #[test]
    fn sqlite_store_upserts_and_removes() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();

        assert_eq!(store.get(StorageKey::Notes).unwrap(), None);
        store.set(StorageKey::Notes, "[]").unwrap();
        store.set(StorageKey::Notes, "[1]").unwrap();
        assert_eq!(store.get(StorageKey::Notes).unwrap().as_deref(), Some("[1]"));

        assert!(store.remove(StorageKey::Notes).unwrap());
        assert!(!store.remove(StorageKey::Notes).unwrap());
    }

    #[test]
    fn memory_store_rejects_writes_when_read_only() {
        let store = MemoryKeyValueStore::new();
        store.set(StorageKey::IsRunning, "true").unwrap();
        store.set_read_only(true);

        let err = store.set(StorageKey::IsRunning, "false").unwrap_err();
        assert!(matches!(err, RepoError::Unavailable(_)));
        assert_eq!(store.raw(StorageKey::IsRunning).as_deref(), Some("true"));
        assert_eq!(store.write_count(), 1);
    }
}
