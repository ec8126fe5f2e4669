//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding RGBA buffers to PNG (lossless)
//! - Encoding RGBA buffers to JPEG with configurable quality
//!
//! Encoding is only ever applied at the very end of an export; intermediate
//! stages pass raw buffers around.
//!
//! # Examples
//!
//! ```ignore
//! use imagetools_core::encode::{encode, OutputFormat};
//!
//! let encoded = encode(&image, OutputFormat::Jpeg, 90).unwrap();
//! println!("Encoded {} bytes", encoded.len());
//! ```

mod jpeg;
mod png;
mod types;

use tracing::debug;

use crate::decode::{DecodedImage, BYTES_PER_PIXEL};

pub use types::{EncodeError, EncodedImage, OutputFormat};

/// Encode an RGBA image in the requested format.
///
/// `quality` (1-100) is used for JPEG and ignored for PNG.
///
/// # Errors
///
/// * `EmptyEncode` if either dimension is zero or the encoder wrote nothing
/// * `InvalidPixelData` if the buffer length doesn't match the dimensions
/// * `EncodingFailed` if the codec reports an error
pub fn encode(
    image: &DecodedImage,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyEncode { width, height });
    }

    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let bytes = match format {
        OutputFormat::Png => png::encode_png(&image.pixels, width, height)?,
        OutputFormat::Jpeg => jpeg::encode_jpeg(&image.pixels, width, height, quality)?,
    };

    if bytes.is_empty() {
        return Err(EncodeError::EmptyEncode { width, height });
    }

    debug!(%format, width, height, bytes = bytes.len(), "encoded image");

    Ok(EncodedImage {
        format,
        width,
        height,
        bytes,
    })
}
