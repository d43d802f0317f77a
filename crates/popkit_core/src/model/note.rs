//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record.
//! - Provide the list-rendering summary rule.
//!
//! # Invariants
//! - `id` is derived from the creation timestamp and unique per collection.
//! - Insertion order is display order; the model carries no extra ordering
//!   metadata.

use serde::{Deserialize, Serialize};

/// Stable identifier for a note: creation time in epoch milliseconds,
/// bumped past collisions by the store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Maximum characters shown for note content in the list view.
pub const SUMMARY_MAX_CHARS: usize = 50;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Creation-timestamp-derived unique id.
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Derives the list-view summary for note content.
///
/// At most [`SUMMARY_MAX_CHARS`] characters are kept; longer content gets a
/// trailing ellipsis. Copy actions must use the full content, never this
/// summary.
pub fn content_summary(content: &str) -> String {
    let mut summary: String = content.chars().take(SUMMARY_MAX_CHARS).collect();
    if content.chars().count() > SUMMARY_MAX_CHARS {
        summary.push_str("...");
    }
    summary
}
