//! Note popup controller: list/detail view state and note intents.
//!
//! # Responsibility
//! - Toggle between the mutually exclusive list and detail views.
//! - Carry the working title/content fields and the active selection.
//! - Route intents to the note store and the clipboard.
//!
//! # Invariants
//! - `Back` discards working fields without persisting.
//! - Copy always uses full note content, never the truncated summary.
//! - Unknown-id intents are benign no-ops.

use crate::model::note::{content_summary, Note, NoteId};
use crate::platform::{Clipboard, PlatformError};
use crate::storage::KeyValueStore;
use crate::store::note_store::{NoteStore, NoteStoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutually exclusive note popup views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteView {
    List,
    Detail,
}

/// User intents of the note popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteIntent {
    /// Start a new note: clear working fields, enter detail view.
    Add,
    /// Open an existing note for editing.
    Select(NoteId),
    /// Edit the working title field.
    EditTitle(String),
    /// Edit the working content field.
    EditContent(String),
    /// Persist working fields, reload the list, return to list view.
    Save,
    /// Delete the active note (no-op without a selection), return to list.
    Delete,
    /// Return to list view, discarding unsaved edits.
    Back,
    /// Copy the full untruncated content of one note to the clipboard.
    CopyContent(NoteId),
}

/// One list row as rendered by the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: NoteId,
    pub title: String,
    /// Content truncated for display; never the copy source.
    pub summary: String,
}

/// Controller error surfaced to the popup for a user-visible notice.
#[derive(Debug)]
pub enum NoteUiError {
    Store(NoteStoreError),
    Clipboard(PlatformError),
}

impl Display for NoteUiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Clipboard(err) => write!(f, "clipboard write failed: {err}"),
        }
    }
}

impl Error for NoteUiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Clipboard(err) => Some(err),
        }
    }
}

impl From<NoteStoreError> for NoteUiError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

/// Per-popup note view controller.
pub struct NoteUiController<S: KeyValueStore, C: Clipboard> {
    store: NoteStore<S>,
    clipboard: C,
    view: NoteView,
    active: Option<NoteId>,
    draft_title: String,
    draft_content: String,
    notes: Vec<Note>,
}

impl<S: KeyValueStore, C: Clipboard> NoteUiController<S, C> {
    pub fn new(store: NoteStore<S>, clipboard: C) -> Self {
        Self {
            store,
            clipboard,
            view: NoteView::List,
            active: None,
            draft_title: String::new(),
            draft_content: String::new(),
            notes: Vec::new(),
        }
    }

    /// Loads the note list and shows the list view. Call once on popup open.
    pub fn init(&mut self) -> Result<(), NoteUiError> {
        self.reload()?;
        self.view = NoteView::List;
        info!(
            "event=note_popup_init module=note_controller status=ok notes={}",
            self.notes.len()
        );
        Ok(())
    }

    /// Routes one user intent. `now_ms` feeds creation-timestamp id
    /// derivation on save.
    pub fn handle(&mut self, intent: NoteIntent, now_ms: i64) -> Result<(), NoteUiError> {
        match intent {
            NoteIntent::Add => {
                self.active = None;
                self.draft_title.clear();
                self.draft_content.clear();
                self.view = NoteView::Detail;
                Ok(())
            }
            NoteIntent::Select(id) => self.select(id),
            NoteIntent::EditTitle(title) => {
                self.draft_title = title;
                Ok(())
            }
            NoteIntent::EditContent(content) => {
                self.draft_content = content;
                Ok(())
            }
            NoteIntent::Save => self.save(now_ms),
            NoteIntent::Delete => self.delete(),
            NoteIntent::Back => {
                self.discard_drafts();
                self.view = NoteView::List;
                Ok(())
            }
            NoteIntent::CopyContent(id) => self.copy_content(id),
        }
    }

    pub fn view(&self) -> NoteView {
        self.view
    }

    pub fn active_selection(&self) -> Option<NoteId> {
        self.active
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn draft_content(&self) -> &str {
        &self.draft_content
    }

    /// List rows for rendering, content truncated to the summary rule.
    pub fn list_items(&self) -> Vec<NoteListItem> {
        self.notes
            .iter()
            .map(|note| NoteListItem {
                id: note.id,
                title: note.title.clone(),
                summary: content_summary(&note.content),
            })
            .collect()
    }

    fn select(&mut self, id: NoteId) -> Result<(), NoteUiError> {
        self.reload()?;
        let Some(note) = self.notes.iter().find(|note| note.id == id) else {
            return Ok(());
        };

        self.draft_title = note.title.clone();
        self.draft_content = note.content.clone();
        self.active = Some(id);
        self.view = NoteView::Detail;
        Ok(())
    }

    fn save(&mut self, now_ms: i64) -> Result<(), NoteUiError> {
        self.store
            .upsert(self.active, &self.draft_title, &self.draft_content, now_ms)?;
        self.reload()?;
        self.discard_drafts();
        self.view = NoteView::List;
        Ok(())
    }

    fn delete(&mut self) -> Result<(), NoteUiError> {
        if let Some(id) = self.active.take() {
            self.store.delete(id)?;
            self.reload()?;
        }
        self.discard_drafts();
        self.view = NoteView::List;
        Ok(())
    }

    fn copy_content(&mut self, id: NoteId) -> Result<(), NoteUiError> {
        self.reload()?;
        let Some(note) = self.notes.iter().find(|note| note.id == id) else {
            return Ok(());
        };

        let content = note.content.clone();
        self.clipboard
            .write_text(&content)
            .map_err(NoteUiError::Clipboard)?;
        info!("event=note_copy module=note_controller status=ok id={id}");
        Ok(())
    }

    fn discard_drafts(&mut self) {
        self.active = None;
        self.draft_title.clear();
        self.draft_content.clear();
    }

    fn reload(&mut self) -> Result<(), NoteUiError> {
        self.notes = self.store.list()?;
        Ok(())
    }
}
