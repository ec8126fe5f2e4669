//! Export pipeline: crop/rotate, resize, encode, name the download.
//!
//! The stages run strictly in order. A failure at any stage aborts the
//! export; nothing is produced and the caller's state is untouched.

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode, EncodeError, OutputFormat};
use crate::transform::{
    render_crop, resample, rotated_bounding_box, Flip, PixelCrop, SurfaceError,
};

/// Stem used when no file name is known.
pub const DEFAULT_FILE_STEM: &str = "image";

/// Suffix appended to the stem of every download.
pub const EDITED_SUFFIX: &str = "-edited";

/// Slack allowed when checking the crop against the rotated bounds.
const CROP_BOUNDS_TOLERANCE: f64 = 1.0;

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No crop has been reported yet, so there is nothing to export.
    #[error("No crop region available")]
    NoCrop,

    #[error("Failed to decode source: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Everything an export needs besides the source pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub crop: PixelCrop,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    pub flip: Flip,
    pub target_width: u32,
    pub target_height: u32,
    pub format: OutputFormat,
    /// Original file name without its extension.
    pub file_stem: String,
}

/// A finished export, ready to be handed to the browser as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Run the full pipeline on an already decoded source.
///
/// # Errors
///
/// `Surface` if the crop or target surface cannot be created, `Encode` if
/// the encoder fails or produces no data.
pub fn export_image(
    source: &DecodedImage,
    request: &ExportRequest,
    config: &EditorConfig,
) -> Result<ExportedFile, ExportError> {
    run(source, request, config).inspect_err(|err| warn!(error = %err, "export aborted"))
}

/// Decode `bytes` and run the full pipeline.
///
/// # Errors
///
/// As [`export_image`], plus `Decode` if the bytes are not a readable
/// PNG or JPEG.
pub fn export_from_bytes(
    bytes: &[u8],
    request: &ExportRequest,
    config: &EditorConfig,
) -> Result<ExportedFile, ExportError> {
    let source = decode_image(bytes).inspect_err(|err| warn!(error = %err, "export aborted"))?;
    export_image(&source, request, config)
}

fn run(
    source: &DecodedImage,
    request: &ExportRequest,
    config: &EditorConfig,
) -> Result<ExportedFile, ExportError> {
    let bounds = rotated_bounding_box(source.width as f64, source.height as f64, request.rotation);
    if !request.crop.is_within(bounds, CROP_BOUNDS_TOLERANCE) {
        warn!(
            crop = ?request.crop,
            bounds_width = bounds.width,
            bounds_height = bounds.height,
            "crop extends past the rotated image; uncovered area will be transparent"
        );
    }

    debug!(
        crop = ?request.crop,
        rotation = request.rotation,
        flip = ?request.flip,
        "export: render"
    );
    let cropped = render_crop(
        source,
        &request.crop,
        request.rotation,
        request.flip,
        &config.surface,
    )?;

    debug!(
        width = request.target_width,
        height = request.target_height,
        "export: resample"
    );
    let resized = resample(
        &cropped,
        request.target_width,
        request.target_height,
        config.resample_filter,
        &config.surface,
    )?;

    debug!(format = %request.format, "export: encode");
    let encoded = encode(&resized, request.format, config.effective_jpeg_quality())?;

    let file_name = download_file_name(&request.file_stem, request.format);
    debug!(%file_name, bytes = encoded.len(), "export complete");

    Ok(ExportedFile {
        file_name,
        mime_type: encoded.mime_type(),
        width: encoded.width,
        height: encoded.height,
        bytes: encoded.bytes,
    })
}

/// `<stem>-edited.<ext>`, falling back to the default stem when empty.
pub fn download_file_name(stem: &str, format: OutputFormat) -> String {
    let stem = if stem.is_empty() {
        DEFAULT_FILE_STEM
    } else {
        stem
    };
    format!("{}{}.{}", stem, EDITED_SUFFIX, format.extension())
}

/// Strip the final extension from a file name.
///
/// Only a trailing `.ext` with a non-empty extension free of `/` is
/// removed; a name without one is returned as is. An empty result falls
/// back to the default stem.
pub fn file_stem(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..dot]
            }
        }
        None => name,
    };

    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::SurfaceLimits;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn request(
        crop: PixelCrop,
        rotation: f64,
        target: (u32, u32),
        format: OutputFormat,
    ) -> ExportRequest {
        ExportRequest {
            crop,
            rotation,
            flip: Flip::NONE,
            target_width: target.0,
            target_height: target.1,
            format,
            file_stem: "photo".to_string(),
        }
    }

    fn png_request(crop: PixelCrop, target: (u32, u32)) -> ExportRequest {
        request(crop, 0.0, target, OutputFormat::Png)
    }

    fn png_bytes(image: &DecodedImage) -> Vec<u8> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&image.pixels, image.width, image.height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    #[test]
    fn test_crop_and_resize_png() {
        let source = gradient(800, 600);
        let req = request(
            PixelCrop::new(100.0, 50.0, 400.0, 400.0),
            0.0,
            (300, 300),
            OutputFormat::Png,
        );

        let file = export_image(&source, &req, &EditorConfig::default()).unwrap();
        assert_eq!(file.file_name, "photo-edited.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!((file.width, file.height), (300, 300));

        let decoded = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 300));
    }

    #[test]
    fn test_quarter_turn_full_frame_jpeg() {
        let source = gradient(400, 200);
        let crop = PixelCrop::full_frame(400, 200, 90.0);
        assert_eq!((crop.width, crop.height), (200.0, 400.0));

        let req = request(crop, 90.0, (200, 400), OutputFormat::Jpeg);
        let file = export_image(&source, &req, &EditorConfig::default()).unwrap();

        assert_eq!(file.file_name, "photo-edited.jpeg");
        assert_eq!(file.mime_type, "image/jpeg");
        let decoded = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 400));
    }

    #[test]
    fn test_unscaled_crop_is_pixel_exact() {
        let source = gradient(40, 30);
        let req = request(
            PixelCrop::new(5.0, 7.0, 10.0, 6.0),
            0.0,
            (10, 6),
            OutputFormat::Png,
        );

        let file = export_image(&source, &req, &EditorConfig::default()).unwrap();
        let decoded = image::load_from_memory(&file.bytes).unwrap().to_rgba8();
        for y in 0..6 {
            for x in 0..10 {
                assert_eq!(
                    decoded.get_pixel(x, y).0,
                    source.pixel(x + 5, y + 7).unwrap(),
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_surface_unavailable_aborts() {
        let source = gradient(20, 20);
        let req = png_request(PixelCrop::new(0.0, 0.0, 20.0, 20.0), (5000, 5000));
        let config = EditorConfig {
            surface: SurfaceLimits {
                max_dimension: 1000,
                max_area: 1_000_000,
            },
            ..EditorConfig::default()
        };

        let result = export_image(&source, &req, &config);
        assert!(matches!(result, Err(ExportError::Surface(_))));
    }

    #[test]
    fn test_zero_target_fails_to_encode() {
        let source = gradient(20, 20);
        let req = png_request(PixelCrop::new(0.0, 0.0, 20.0, 20.0), (0, 10));

        let result = export_image(&source, &req, &EditorConfig::default());
        assert!(matches!(
            result,
            Err(ExportError::Encode(EncodeError::EmptyEncode { .. }))
        ));
    }

    #[test]
    fn test_crop_outside_bounds_still_exports() {
        let source = gradient(10, 10);
        let req = png_request(PixelCrop::new(5.0, 5.0, 10.0, 10.0), (10, 10));

        let file = export_image(&source, &req, &EditorConfig::default()).unwrap();
        let decoded = image::load_from_memory(&file.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, source.pixel(5, 5).unwrap());
        assert_eq!(decoded.get_pixel(9, 9).0[3], 0);
    }

    #[test]
    fn test_export_from_bytes() {
        let source = gradient(16, 8);
        let req = png_request(PixelCrop::new(0.0, 0.0, 16.0, 8.0), (8, 4));

        let bytes = png_bytes(&source);
        let file = export_from_bytes(&bytes, &req, &EditorConfig::default()).unwrap();
        assert_eq!((file.width, file.height), (8, 4));
    }

    #[test]
    fn test_export_from_garbage_bytes() {
        let req = png_request(PixelCrop::new(0.0, 0.0, 1.0, 1.0), (1, 1));
        let result = export_from_bytes(b"not an image", &req, &EditorConfig::default());
        assert!(matches!(result, Err(ExportError::Decode(_))));
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("holiday", OutputFormat::Png), "holiday-edited.png");
        assert_eq!(download_file_name("holiday", OutputFormat::Jpeg), "holiday-edited.jpeg");
        assert_eq!(download_file_name("", OutputFormat::Png), "image-edited.png");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("photo.jpg"), "photo");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("README"), "README");
        assert_eq!(file_stem("trailing."), "trailing.");
        assert_eq!(file_stem("dir.d/file"), "dir.d/file");
        assert_eq!(file_stem(".png"), "image");
        assert_eq!(file_stem(""), "image");
    }
}
