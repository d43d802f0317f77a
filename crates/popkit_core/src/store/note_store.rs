//! Note store: ordered note collection under a single storage key.
//!
//! # Responsibility
//! - Provide list/upsert/delete over the persisted note collection.
//! - Generate creation-timestamp-derived ids and keep them unique.
//!
//! # Invariants
//! - The whole collection is read, modified and written back as one unit;
//!   the internal guard serializes concurrent read-modify-write sequences.
//! - Insertion order is preserved; in-place updates never move a note.
//! - No two notes share an id.

use crate::model::note::{Note, NoteId};
use crate::storage::{KeyValueStore, StorageError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Storage key holding the serialized note collection.
pub const NOTES_KEY: &str = "notes";

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Note persistence error.
#[derive(Debug)]
pub enum NoteStoreError {
    Storage(StorageError),
    InvalidData(String),
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StorageError> for NoteStoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Storage-backed note collection with serialized write access.
pub struct NoteStore<S: KeyValueStore> {
    store: S,
    write_guard: Mutex<()>,
}

impl<S: KeyValueStore> NoteStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_guard: Mutex::new(()),
        }
    }

    /// Returns the full note collection in insertion order.
    ///
    /// An absent key is an empty collection; a malformed payload is an
    /// `InvalidData` error.
    pub fn list(&self) -> NoteStoreResult<Vec<Note>> {
        let values = self.store.get(&[NOTES_KEY])?;
        match values.get(NOTES_KEY) {
            None => Ok(Vec::new()),
            Some(raw) => decode_collection(raw),
        }
    }

    /// Creates or updates one note.
    ///
    /// When `id` names an existing record its title/content are replaced in
    /// place (position preserved). Otherwise a new record is appended with an
    /// id derived from `now_ms`, bumped past any taken id.
    pub fn upsert(
        &self,
        id: Option<NoteId>,
        title: &str,
        content: &str,
        now_ms: i64,
    ) -> NoteStoreResult<Note> {
        let _rmw = self.serialize_writes()?;
        let mut notes = self.list()?;

        if let Some(id) = id {
            if let Some(existing) = notes.iter_mut().find(|note| note.id == id) {
                existing.title = title.to_string();
                existing.content = content.to_string();
                let updated = existing.clone();
                self.persist(&notes)?;
                info!("event=note_upsert module=note_store status=ok mode=update id={id}");
                return Ok(updated);
            }
        }

        let note = Note::new(next_note_id(&notes, now_ms), title, content);
        notes.push(note.clone());
        self.persist(&notes)?;
        info!(
            "event=note_upsert module=note_store status=ok mode=create id={}",
            note.id
        );
        Ok(note)
    }

    /// Removes the note with `id`. Absent ids are a benign no-op.
    pub fn delete(&self, id: NoteId) -> NoteStoreResult<()> {
        let _rmw = self.serialize_writes()?;
        let mut notes = self.list()?;

        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Ok(());
        }

        self.persist(&notes)?;
        info!("event=note_delete module=note_store status=ok id={id}");
        Ok(())
    }

    fn persist(&self, notes: &[Note]) -> NoteStoreResult<()> {
        let raw = serde_json::to_string(notes)
            .map_err(|err| NoteStoreError::InvalidData(format!("encode note collection: {err}")))?;
        self.store.set(&[(NOTES_KEY, raw.as_str())])?;
        Ok(())
    }

    fn serialize_writes(&self) -> NoteStoreResult<std::sync::MutexGuard<'_, ()>> {
        self.write_guard
            .lock()
            .map_err(|_| NoteStoreError::Storage(StorageError::LockPoisoned))
    }
}

fn decode_collection(raw: &str) -> NoteStoreResult<Vec<Note>> {
    serde_json::from_str(raw)
        .map_err(|err| NoteStoreError::InvalidData(format!("decode note collection: {err}")))
}

fn next_note_id(notes: &[Note], now_ms: i64) -> NoteId {
    let mut candidate = now_ms;
    while notes.iter().any(|note| note.id == candidate) {
        candidate += 1;
    }
    candidate
}
