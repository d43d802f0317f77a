//! Cached working image model and freshness policy.
//!
//! # Responsibility
//! - Pair the persisted data URL with its capture timestamp.
//! - Own the fixed 10-minute freshness rule.
//!
//! # Invariants
//! - An entry strictly older than the window is expired and must be purged
//!   before any render.

/// Freshness window for the cached working image, in milliseconds.
pub const FRESHNESS_WINDOW_MS: i64 = 10 * 60 * 1000;

/// One cached working image: data URL payload plus capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    /// Data-URL encoded image payload.
    pub data: String,
    /// Capture time in epoch milliseconds.
    pub saved_at: i64,
}

impl CachedImage {
    pub fn new(data: impl Into<String>, saved_at: i64) -> Self {
        Self {
            data: data.into(),
            saved_at,
        }
    }

    /// Returns whether this entry has outlived the freshness window.
    ///
    /// Elapsed time exactly equal to the window is still fresh; only strictly
    /// older entries expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms - self.saved_at > FRESHNESS_WINDOW_MS
    }
}
