//! Persisted domain models for the popup tools.
//!
//! # Responsibility
//! - Define the note record and the cached working image shapes.
//! - Keep freshness and display rules next to the data they govern.
//!
//! # Invariants
//! - A note `id` uniquely identifies a note within its collection.
//! - A cached image older than its freshness window is never shown.

pub mod cache;
pub mod note;
