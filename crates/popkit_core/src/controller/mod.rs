//! Headless view controllers for the two popup tools.
//!
//! # Responsibility
//! - Map the finite set of user intents onto store operations.
//! - Hold per-popup mutable state (view, active selection, working image)
//!   with an explicit lifecycle: constructed on popup open, discarded on
//!   close.
//!
//! # Invariants
//! - Controllers never touch a rendering surface; callers read state
//!   accessors after each handled intent.
//! - Storage failures propagate; missing-selection intents are benign no-ops.

pub mod image;
pub mod notes;
