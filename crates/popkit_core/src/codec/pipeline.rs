//! Re-encode pipeline for the working image.
//!
//! # Responsibility
//! - Decode the cached data URL into a pixel surface.
//! - Re-encode the surface to PNG at its natural dimensions.
//!
//! # Invariants
//! - Output dimensions equal input dimensions; this is a re-encode, not a
//!   scaling resize.

use super::{data_url, CodecResult};
use image::ImageFormat;
use log::info;
use std::io::Cursor;

/// Media type of every pipeline output.
pub const OUTPUT_MIME: &str = "image/png";

/// Result of one re-encode pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReencodedImage {
    /// PNG data URL of the re-encoded surface.
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Re-encodes a data-URL image through an RGBA surface.
///
/// # Errors
/// - Data URL or base64 shape errors from parsing.
/// - Pixel decode/encode errors from the codec backend.
pub fn reencode(source: &str) -> CodecResult<ReencodedImage> {
    let decoded = data_url::parse(source)?;
    let img = image::load_from_memory(&decoded.bytes)?;

    // Surface at natural dimensions, matching a canvas drawImage pass.
    let surface = img.to_rgba8();
    let (width, height) = surface.dimensions();

    let mut out = Cursor::new(Vec::new());
    surface.write_to(&mut out, ImageFormat::Png)?;

    info!(
        "event=image_reencode module=codec status=ok source_mime={} width={width} height={height}",
        decoded.mime
    );

    Ok(ReencodedImage {
        data_url: data_url::encode(OUTPUT_MIME, out.get_ref()),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::{reencode, OUTPUT_MIME};
    use crate::codec::data_url;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn sample_data_url(width: u32, height: u32) -> String {
        let surface = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        surface.write_to(&mut out, ImageFormat::Png).unwrap();
        data_url::encode("image/png", out.get_ref())
    }

    #[test]
    fn reencode_preserves_natural_dimensions() {
        let reencoded = reencode(&sample_data_url(5, 3)).unwrap();
        assert_eq!((reencoded.width, reencoded.height), (5, 3));

        let decoded = data_url::parse(&reencoded.data_url).unwrap();
        assert_eq!(decoded.mime, OUTPUT_MIME);
        let img = image::load_from_memory(&decoded.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (5, 3));
    }

    #[test]
    fn reencode_rejects_non_image_payload() {
        let url = data_url::encode("image/png", b"definitely not a png");
        assert!(reencode(&url).is_err());
    }
}
