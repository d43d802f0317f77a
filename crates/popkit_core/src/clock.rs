//! Wall-clock helper shared by popup glue and the CLI.
//!
//! Core store and controller APIs take explicit `now_ms` arguments so tests
//! can pin time; this is the single place production callers read it from.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in epoch milliseconds.
///
/// A pre-epoch system clock clamps to 0 instead of panicking.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
