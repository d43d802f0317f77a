//! Connection bootstrap utilities for the key-value store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection behavior required by the storage contract.
//! - Trigger schema migrations before returning a usable store.
//!
//! # Invariants
//! - Returned stores have migrations fully applied.
//! - Open failures are logged and propagated, never masked.

use super::kv::SqliteKeyValueStore;
use super::migrations::apply_migrations;
use super::StorageResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a store file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> StorageResult<SqliteKeyValueStore> {
    let started_at = Instant::now();
    info!("event=store_open module=storage status=start mode=file");

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=storage status=error mode=file duration_ms={} error_code=store_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_bootstrap(conn, "file", started_at)
}

/// Opens an in-memory store and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store_in_memory() -> StorageResult<SqliteKeyValueStore> {
    let started_at = Instant::now();
    info!("event=store_open module=storage status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=storage status=error mode=memory duration_ms={} error_code=store_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_bootstrap(conn, "memory", started_at)
}

fn finish_bootstrap(
    mut conn: Connection,
    mode: &str,
    started_at: Instant,
) -> StorageResult<SqliteKeyValueStore> {
    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=store_open module=storage status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(SqliteKeyValueStore::new(conn))
        }
        Err(err) => {
            error!(
                "event=store_open module=storage status=error mode={mode} duration_ms={} error_code=store_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> StorageResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
