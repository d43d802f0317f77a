//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `popkit_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use popkit_core::clock::now_epoch_ms;
use popkit_core::{open_store_in_memory, NoteStore};

fn main() {
    println!("popkit_core ping={}", popkit_core::ping());
    println!("popkit_core version={}", popkit_core::core_version());

    // One in-memory round-trip to exercise storage wiring without touching
    // any on-disk state.
    match smoke_roundtrip() {
        Ok(count) => println!("popkit_core smoke notes={count}"),
        Err(err) => {
            eprintln!("popkit_core smoke failed: {err}");
            std::process::exit(1);
        }
    }
}

fn smoke_roundtrip() -> Result<usize, Box<dyn std::error::Error>> {
    let store = open_store_in_memory()?;
    let notes = NoteStore::new(store);
    notes.upsert(None, "smoke", "popup wiring check", now_epoch_ms())?;
    Ok(notes.list()?.len())
}
