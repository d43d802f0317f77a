//! Base64 data URL parsing and encoding.

use super::{CodecError, CodecResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

static DATA_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(?P<mime>[a-zA-Z0-9][a-zA-Z0-9!#$&^_.+-]*/[a-zA-Z0-9!#$&^_.+-]+);base64,(?P<body>[A-Za-z0-9+/]*={0,2})$")
        .expect("valid data url regex")
});

/// Decoded data URL: media type plus raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parses a `data:<mime>;base64,<payload>` string.
///
/// # Errors
/// - `InvalidDataUrl` when the prefix shape does not match.
/// - `Base64` when the payload fails to decode.
pub fn parse(value: &str) -> CodecResult<DataUrl> {
    let captures = DATA_URL_RE.captures(value).ok_or_else(|| {
        CodecError::InvalidDataUrl("expected `data:<mime>;base64,<payload>`".to_string())
    })?;

    let mime = captures["mime"].to_string();
    let bytes = STANDARD.decode(&captures["body"])?;

    Ok(DataUrl { mime, bytes })
}

/// Encodes raw bytes as a base64 data URL with the given media type.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
