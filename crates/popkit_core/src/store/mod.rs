//! Store layer over the key-value contract.
//!
//! # Responsibility
//! - Provide use-case oriented persistence APIs for notes and the cached
//!   working image.
//! - Serialize read-modify-write sequences so rapid repeated popup actions
//!   cannot lose updates.
//!
//! # Invariants
//! - Every operation treats the full record set under its key(s) as one
//!   atomic unit.
//! - Malformed persisted payloads surface as `InvalidData` errors instead of
//!   being silently reset.

pub mod image_cache;
pub mod note_store;
