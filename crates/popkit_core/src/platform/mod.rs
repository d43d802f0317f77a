//! Platform seams for clipboard and download side effects.
//!
//! # Responsibility
//! - Abstract the system clipboard and browser-mediated download surface so
//!   controllers stay headless and testable.
//!
//! # Invariants
//! - Implementations report failures instead of silently dropping payloads.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failure surfacing from a platform side effect.
#[derive(Debug)]
pub enum PlatformError {
    Io(std::io::Error),
    /// The platform refused the request (unsupported payload, bad target).
    Rejected(String),
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Rejected(message) => write!(f, "{message}"),
        }
    }
}

impl Error for PlatformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Rejected(_) => None,
        }
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// System clipboard surface: plain text and image objects.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> PlatformResult<()>;
    fn write_image(&mut self, mime: &str, bytes: &[u8]) -> PlatformResult<()>;
}

/// Browser-mediated download surface: save bytes under a suggested filename.
pub trait DownloadSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> PlatformResult<()>;
}

/// Download sink writing into a fixed directory on the local filesystem.
pub struct DirDownloadSink {
    dir: PathBuf,
}

impl DirDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirDownloadSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> PlatformResult<()> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(PlatformError::Rejected(format!(
                "unacceptable download filename `{file_name}`"
            )));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        info!(
            "event=download_saved module=platform status=ok path={} bytes={}",
            path.display(),
            bytes.len()
        );
        Ok(())
    }
}
