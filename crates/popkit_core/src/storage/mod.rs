//! Persisted key-value storage bootstrap and contracts.
//!
//! # Responsibility
//! - Open and configure the SQLite-backed key-value store.
//! - Apply schema migrations in deterministic order.
//! - Define the storage contract shared by both popup tools.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No application data is read or written before migrations succeed.
//! - Storage failures propagate to callers; they are never swallowed.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod kv;
pub mod migrations;
mod open;

pub use kv::{KeyValueStore, SqliteKeyValueStore};
pub use open::{open_store, open_store_in_memory};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer error for open, migration and key-value operations.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A panicked thread left the store lock poisoned.
    LockPoisoned,
    /// The backend refused the operation (quota, permission).
    ///
    /// The bundled SQLite backend does not emit this variant itself; it is
    /// part of the contract so alternative [`KeyValueStore`] backends can
    /// report capacity and permission failures through the same surface.
    Rejected(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::LockPoisoned => write!(f, "store lock poisoned by a panicked thread"),
            Self::Rejected(message) => write!(f, "storage backend rejected operation: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::LockPoisoned => None,
            Self::Rejected(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
