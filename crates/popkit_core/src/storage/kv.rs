//! Key-value storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the get/set/remove-by-keys surface both popup tools persist
//!   through.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `get` omits missing keys instead of inventing empty values.
//! - `set` applies all entries of one call atomically.
//! - `remove` treats absent keys as a no-op.

use crate::storage::{StorageError, StorageResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Asynchronous-popup-style storage surface: batch reads and writes keyed by
/// plain strings, every operation fallible.
///
/// Implementations must apply each call atomically with respect to the keys
/// it names; callers layer their own read-modify-write serialization on top
/// (see the note store and image cache).
pub trait KeyValueStore {
    /// Returns the stored values for `keys`. Missing keys are absent from
    /// the result map.
    fn get(&self, keys: &[&str]) -> StorageResult<BTreeMap<String, String>>;

    /// Inserts or replaces every `(key, value)` entry in one atomic step.
    fn set(&self, entries: &[(&str, &str)]) -> StorageResult<()>;

    /// Removes the named keys. Keys that are not present are ignored.
    fn remove(&self, keys: &[&str]) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, keys: &[&str]) -> StorageResult<BTreeMap<String, String>> {
        (**self).get(keys)
    }

    fn set(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        (**self).set(entries)
    }

    fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        (**self).remove(keys)
    }
}

/// SQLite-backed key-value store.
///
/// The connection is guarded by a mutex so a single store value can be shared
/// by popup event handlers without interleaving statements.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Wraps a bootstrapped connection. Callers must have applied migrations
    /// first; use [`super::open_store`] / [`super::open_store_in_memory`].
    pub(super) fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, keys: &[&str]) -> StorageResult<BTreeMap<String, String>> {
        let mut found = BTreeMap::new();
        if keys.is_empty() {
            return Ok(found);
        }

        let conn = self.lock()?;
        let sql = format!(
            "SELECT key, value FROM kv_entries WHERE key IN ({});",
            placeholders(keys.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(text_params(keys)))?;
        while let Some(row) = rows.next()? {
            found.insert(row.get("key")?, row.get("value")?);
        }

        Ok(found)
    }

    fn set(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                [*key, *value],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let conn = self.lock()?;
        let sql = format!(
            "DELETE FROM kv_entries WHERE key IN ({});",
            placeholders(keys.len())
        );
        conn.execute(&sql, params_from_iter(text_params(keys)))?;

        Ok(())
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn text_params(keys: &[&str]) -> Vec<Value> {
    keys.iter()
        .map(|key| Value::Text((*key).to_string()))
        .collect()
}
