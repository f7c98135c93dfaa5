//! Byte-to-image decoding.
//!
//! A pure transform: no I/O, no caching. The loader treats a decode failure
//! exactly like a fetch failure — the waiter sees "no image".

use image::DynamicImage;

use crate::error::Result;

/// Decode a fetched payload into an in-memory image.
///
/// Format is sniffed from the payload itself (magic bytes), so the remote
/// server's `Content-Type` is irrelevant.
///
/// # Errors
///
/// Returns [`ImgcacheError::Decode`](crate::error::ImgcacheError::Decode) if
/// the bytes are not a supported image format or are truncated/corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Test fixture: a 1x1 red PNG encoded in memory, so tests need no files
/// on disk. Shared with the loader tests.
#[cfg(test)]
pub(crate) fn tiny_png() -> Vec<u8> {
    use image::{ImageBuffer, Rgb};
    let img = ImageBuffer::from_pixel(1, 1, Rgb([255u8, 0, 0]));
    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_png() {
        let img = decode_image(&tiny_png()).unwrap();
        assert_eq!(img.width(), 1);
        assert_eq!(img.height(), 1);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let mut png = tiny_png();
        png.truncate(png.len() / 2);
        assert!(decode_image(&png).is_err());
    }
}
