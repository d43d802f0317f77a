//! Image codec: data URL handling and the re-encode pipeline.
//!
//! # Responsibility
//! - Parse and produce base64 data URLs.
//! - Re-encode a working image through a pixel surface at its natural
//!   dimensions.
//!
//! # Invariants
//! - Re-encoding never changes pixel dimensions.
//! - Malformed inputs surface as typed errors, not panics.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod data_url;
pub mod pipeline;

pub type CodecResult<T> = Result<T, CodecError>;

/// Codec-layer error for data URL parsing and pixel transcoding.
#[derive(Debug)]
pub enum CodecError {
    /// Input is not a `data:<mime>;base64,<payload>` string.
    InvalidDataUrl(String),
    /// Payload is not valid base64.
    Base64(base64::DecodeError),
    /// Pixel decode or encode failure.
    Codec(image::ImageError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDataUrl(message) => write!(f, "invalid data URL: {message}"),
            Self::Base64(err) => write!(f, "invalid base64 payload: {err}"),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDataUrl(_) => None,
            Self::Base64(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(value: base64::DecodeError) -> Self {
        Self::Base64(value)
    }
}

impl From<image::ImageError> for CodecError {
    fn from(value: image::ImageError) -> Self {
        Self::Codec(value)
    }
}
