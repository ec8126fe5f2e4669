//! PNG/JPEG decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use super::{DecodeError, DecodedImage, Orientation, SourceFormat};

/// Sniff the container format of an encoded file.
///
/// Only PNG and JPEG are accepted. Anything else, including formats the
/// `image` crate could otherwise recognise, is `UnsupportedFormat`.
pub fn detect_format(bytes: &[u8]) -> Result<SourceFormat, DecodeError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        _ => Err(DecodeError::UnsupportedFormat),
    }
}

/// Decode a PNG or JPEG file into an RGBA buffer, applying EXIF orientation.
///
/// The orientation step makes the buffer match what a browser shows for the
/// same file, which is the coordinate space the crop widget reports in.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` for anything other than PNG/JPEG.
/// Returns `DecodeError::CorruptedFile` if the data cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let format = detect_format(bytes)?;
    let orientation = extract_orientation(bytes);

    let img = decode_dynamic(bytes, format)?;
    let oriented = apply_orientation(img, orientation);
    let decoded = DecodedImage::from_rgba_image(oriented.into_rgba8());

    debug!(
        ?format,
        ?orientation,
        width = decoded.width,
        height = decoded.height,
        "decoded source image"
    );
    Ok(decoded)
}

fn decode_dynamic(bytes: &[u8], format: SourceFormat) -> Result<DynamicImage, DecodeError> {
    let image_format = match format {
        SourceFormat::Png => ImageFormat::Png,
        SourceFormat::Jpeg => ImageFormat::Jpeg,
    };

    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(image_format);

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// EXIF orientation of an encoded file, `Normal` when absent or unreadable.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
