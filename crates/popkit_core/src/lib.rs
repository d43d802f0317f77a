//! Core domain logic for the popkit popup tools.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod codec;
pub mod controller;
pub mod logging;
pub mod model;
pub mod platform;
pub mod storage;
pub mod store;

pub use codec::data_url::DataUrl;
pub use codec::pipeline::ReencodedImage;
pub use codec::CodecError;
pub use controller::image::{
    ImageIntent, ImageUiController, ImageUiError, IngestChannel, DOWNLOAD_FILE_NAME,
};
pub use controller::notes::{NoteIntent, NoteListItem, NoteUiController, NoteUiError, NoteView};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cache::{CachedImage, FRESHNESS_WINDOW_MS};
pub use model::note::{content_summary, Note, NoteId};
pub use platform::{Clipboard, DirDownloadSink, DownloadSink, PlatformError};
pub use storage::{
    open_store, open_store_in_memory, KeyValueStore, SqliteKeyValueStore, StorageError,
    StorageResult,
};
pub use store::image_cache::{ImageCache, ImageCacheError};
pub use store::note_store::{NoteStore, NoteStoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
