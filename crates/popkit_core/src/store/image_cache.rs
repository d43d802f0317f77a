//! Image cache: time-boxed persistence for the working image.
//!
//! # Responsibility
//! - Persist the working image data URL with its capture timestamp.
//! - Enforce the freshness window on load, purging expired entries before
//!   they can be shown.
//!
//! # Invariants
//! - Payload and timestamp are written together and removed together.
//! - An expired entry is purged during `load`, never returned.

use crate::model::cache::CachedImage;
use crate::storage::{KeyValueStore, StorageError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Storage key holding the data-URL payload of the working image.
pub const IMAGE_DATA_KEY: &str = "image_data";
/// Storage key holding the capture timestamp, as decimal epoch milliseconds.
pub const IMAGE_TIME_KEY: &str = "image_time";

pub type ImageCacheResult<T> = Result<T, ImageCacheError>;

/// Image cache persistence error.
#[derive(Debug)]
pub enum ImageCacheError {
    Storage(StorageError),
    InvalidData(String),
}

impl Display for ImageCacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted image cache entry: {message}")
            }
        }
    }
}

impl Error for ImageCacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StorageError> for ImageCacheError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Storage-backed cache for the single working image.
pub struct ImageCache<S: KeyValueStore> {
    store: S,
    write_guard: Mutex<()>,
}

impl<S: KeyValueStore> ImageCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_guard: Mutex::new(()),
        }
    }

    /// Loads the cached entry, applying the expiry sweep.
    ///
    /// Returns `None` when nothing is cached. An expired entry is purged and
    /// reported as `None`. A partial entry (payload without timestamp or the
    /// reverse) or an unparsable timestamp is an `InvalidData` error.
    pub fn load(&self, now_ms: i64) -> ImageCacheResult<Option<CachedImage>> {
        let _rmw = self.serialize_writes()?;
        let values = self.store.get(&[IMAGE_DATA_KEY, IMAGE_TIME_KEY])?;

        let (data, time) = match (values.get(IMAGE_DATA_KEY), values.get(IMAGE_TIME_KEY)) {
            (None, None) => return Ok(None),
            (Some(data), Some(time)) => (data, time),
            (Some(_), None) => {
                return Err(ImageCacheError::InvalidData(
                    "payload present without capture timestamp".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(ImageCacheError::InvalidData(
                    "capture timestamp present without payload".to_string(),
                ))
            }
        };

        let saved_at: i64 = time.parse().map_err(|_| {
            ImageCacheError::InvalidData(format!("unparsable capture timestamp `{time}`"))
        })?;

        let entry = CachedImage::new(data.clone(), saved_at);
        if entry.is_expired(now_ms) {
            self.store.remove(&[IMAGE_DATA_KEY, IMAGE_TIME_KEY])?;
            info!(
                "event=image_cache_expired module=image_cache status=ok saved_at={saved_at} now={now_ms}"
            );
            return Ok(None);
        }

        Ok(Some(entry))
    }

    /// Persists `data_url` as the working image, refreshing the timestamp.
    pub fn store(&self, data_url: &str, now_ms: i64) -> ImageCacheResult<()> {
        let _rmw = self.serialize_writes()?;
        let stamp = now_ms.to_string();
        self.store
            .set(&[(IMAGE_DATA_KEY, data_url), (IMAGE_TIME_KEY, stamp.as_str())])?;
        info!("event=image_cache_store module=image_cache status=ok saved_at={now_ms}");
        Ok(())
    }

    /// Removes the cached entry. Benign when nothing is cached.
    pub fn clear(&self) -> ImageCacheResult<()> {
        let _rmw = self.serialize_writes()?;
        self.store.remove(&[IMAGE_DATA_KEY, IMAGE_TIME_KEY])?;
        info!("event=image_cache_clear module=image_cache status=ok");
        Ok(())
    }

    fn serialize_writes(&self) -> ImageCacheResult<std::sync::MutexGuard<'_, ()>> {
        self.write_guard
            .lock()
            .map_err(|_| ImageCacheError::Storage(StorageError::LockPoisoned))
    }
}
