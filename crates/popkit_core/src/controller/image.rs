//! Image popup controller: working-image state and export intents.
//!
//! # Responsibility
//! - Run the expiry sweep before the first render.
//! - Unify the three ingestion channels into one intake path.
//! - Route resize/copy/download/clear intents to the cache, codec and
//!   platform seams.
//!
//! # Invariants
//! - A single image is in flight at a time; intake stays disabled until the
//!   working image is cleared.
//! - Copy and download are no-ops until a resized output exists.

use crate::codec::{data_url, pipeline, CodecError};
use crate::platform::{Clipboard, DownloadSink, PlatformError};
use crate::storage::KeyValueStore;
use crate::store::image_cache::{ImageCache, ImageCacheError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed filename suggested for the download export.
pub const DOWNLOAD_FILE_NAME: &str = "resized-image.png";

/// Origin of an ingested image. All three unify into one intake path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestChannel {
    FilePicker,
    DragDrop,
    Paste,
}

impl IngestChannel {
    fn label(self) -> &'static str {
        match self {
            Self::FilePicker => "file_picker",
            Self::DragDrop => "drag_drop",
            Self::Paste => "paste",
        }
    }
}

/// User intents of the image popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageIntent {
    /// Load a new working image from one of the ingestion channels.
    Ingest {
        channel: IngestChannel,
        mime: String,
        bytes: Vec<u8>,
    },
    /// Re-encode the working image and persist the result.
    Resize,
    /// Copy the resized output to the clipboard as an image object.
    CopyImage,
    /// Save the resized output under the fixed filename.
    Download,
    /// Purge the cache and reset to the empty state.
    Clear,
}

/// Controller error surfaced to the popup for a user-visible notice.
#[derive(Debug)]
pub enum ImageUiError {
    Cache(ImageCacheError),
    Codec(CodecError),
    /// Clipboard write failed; the popup shows an alert.
    Clipboard(PlatformError),
    Download(PlatformError),
}

impl Display for ImageUiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::Clipboard(err) => write!(f, "clipboard write failed: {err}"),
            Self::Download(err) => write!(f, "download failed: {err}"),
        }
    }
}

impl Error for ImageUiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cache(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Clipboard(err) => Some(err),
            Self::Download(err) => Some(err),
        }
    }
}

impl From<ImageCacheError> for ImageUiError {
    fn from(value: ImageCacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<CodecError> for ImageUiError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Per-popup image view controller.
pub struct ImageUiController<S: KeyValueStore, C: Clipboard, D: DownloadSink> {
    cache: ImageCache<S>,
    clipboard: C,
    downloads: D,
    preview: Option<String>,
    resized: Option<String>,
    intake_enabled: bool,
}

impl<S: KeyValueStore, C: Clipboard, D: DownloadSink> ImageUiController<S, C, D> {
    pub fn new(cache: ImageCache<S>, clipboard: C, downloads: D) -> Self {
        Self {
            cache,
            clipboard,
            downloads,
            preview: None,
            resized: None,
            intake_enabled: true,
        }
    }

    /// Expiry sweep on popup open: restore a fresh cached image or reset to
    /// the empty state, before any render.
    pub fn init(&mut self, now_ms: i64) -> Result<(), ImageUiError> {
        match self.cache.load(now_ms)? {
            Some(entry) => {
                self.preview = Some(entry.data);
                self.resized = None;
                self.intake_enabled = false;
                info!("event=image_popup_init module=image_controller status=ok state=restored");
            }
            None => {
                self.reset_to_empty();
                info!("event=image_popup_init module=image_controller status=ok state=empty");
            }
        }
        Ok(())
    }

    /// Routes one user intent. `now_ms` stamps cache writes.
    pub fn handle(&mut self, intent: ImageIntent, now_ms: i64) -> Result<(), ImageUiError> {
        match intent {
            ImageIntent::Ingest {
                channel,
                mime,
                bytes,
            } => self.ingest(channel, &mime, &bytes, now_ms),
            ImageIntent::Resize => self.resize(now_ms),
            ImageIntent::CopyImage => self.copy_image(),
            ImageIntent::Download => self.download(),
            ImageIntent::Clear => self.clear(),
        }
    }

    /// Data URL of the previewed working image, when one is loaded.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Data URL of the resized output, once a resize has run.
    pub fn resized(&self) -> Option<&str> {
        self.resized.as_deref()
    }

    /// Whether file intake is currently accepted.
    pub fn intake_enabled(&self) -> bool {
        self.intake_enabled
    }

    fn ingest(
        &mut self,
        channel: IngestChannel,
        mime: &str,
        bytes: &[u8],
        now_ms: i64,
    ) -> Result<(), ImageUiError> {
        if !self.intake_enabled {
            info!(
                "event=image_ingest module=image_controller status=skipped reason=image_in_flight channel={}",
                channel.label()
            );
            return Ok(());
        }
        if !mime.starts_with("image/") {
            info!(
                "event=image_ingest module=image_controller status=skipped reason=non_image channel={}",
                channel.label()
            );
            return Ok(());
        }

        let url = data_url::encode(mime, bytes);
        self.cache.store(&url, now_ms)?;
        self.preview = Some(url);
        self.resized = None;
        self.intake_enabled = false;
        info!(
            "event=image_ingest module=image_controller status=ok channel={} bytes={}",
            channel.label(),
            bytes.len()
        );
        Ok(())
    }

    fn resize(&mut self, now_ms: i64) -> Result<(), ImageUiError> {
        let Some(source) = self.preview.clone() else {
            return Ok(());
        };

        let reencoded = pipeline::reencode(&source)?;
        self.cache.store(&reencoded.data_url, now_ms)?;
        self.preview = Some(reencoded.data_url.clone());
        self.resized = Some(reencoded.data_url);
        info!(
            "event=image_resize module=image_controller status=ok width={} height={}",
            reencoded.width, reencoded.height
        );
        Ok(())
    }

    fn copy_image(&mut self) -> Result<(), ImageUiError> {
        let Some(url) = self.resized.clone() else {
            return Ok(());
        };

        let decoded = data_url::parse(&url)?;
        self.clipboard
            .write_image(&decoded.mime, &decoded.bytes)
            .map_err(ImageUiError::Clipboard)?;
        info!("event=image_copy module=image_controller status=ok bytes={}", decoded.bytes.len());
        Ok(())
    }

    fn download(&mut self) -> Result<(), ImageUiError> {
        let Some(url) = self.resized.clone() else {
            return Ok(());
        };

        let decoded = data_url::parse(&url)?;
        self.downloads
            .save(DOWNLOAD_FILE_NAME, &decoded.bytes)
            .map_err(ImageUiError::Download)?;
        info!(
            "event=image_download module=image_controller status=ok file={DOWNLOAD_FILE_NAME} bytes={}",
            decoded.bytes.len()
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ImageUiError> {
        self.cache.clear()?;
        self.reset_to_empty();
        info!("event=image_clear module=image_controller status=ok");
        Ok(())
    }

    fn reset_to_empty(&mut self) {
        self.preview = None;
        self.resized = None;
        self.intake_enabled = true;
    }
}
