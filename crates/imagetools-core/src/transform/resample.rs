//! Stretch-resampling to exact output dimensions.
//!
//! The resampler never crops and never corrects aspect ratio: the whole
//! input is stretched to fill the target. Keeping proportions is the resize
//! control's job (its aspect lock).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::render::RenderError;
use super::surface::{allocate, SurfaceError, SurfaceLimits};
use crate::decode::DecodedImage;
use crate::encode::{encode, EncodedImage, OutputFormat};

/// Filter type for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation, what a browser canvas uses when stretching.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resample an image to exactly `width × height`.
///
/// Always returns a new buffer, even when the size already matches. A zero
/// target yields an empty image; an empty input stretched to a non-zero
/// target yields a transparent one.
///
/// # Errors
///
/// Returns `SurfaceError::Unavailable` if the target surface exceeds
/// `limits` or cannot be allocated.
pub fn resample(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
    limits: &SurfaceLimits,
) -> Result<DecodedImage, SurfaceError> {
    limits.check(width, height)?;

    debug!(
        src_width = image.width,
        src_height = image.height,
        width,
        height,
        ?filter,
        "resampling"
    );

    if width == 0 || height == 0 || image.is_empty() {
        let pixels = allocate(width, height, limits)?;
        return Ok(DecodedImage::new(width, height, pixels));
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or_else(|| SurfaceError::Unavailable {
        width: image.width,
        height: image.height,
        reason: "source buffer does not match its dimensions".to_string(),
    })?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgba_image(resized))
}

/// Resample and encode in one step.
///
/// `quality` only affects lossy formats.
///
/// # Errors
///
/// `RenderError::Surface` when the target surface is unavailable,
/// `RenderError::Encode` when encoding fails or yields no data.
pub fn resample_encoded(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
    format: OutputFormat,
    quality: u8,
    limits: &SurfaceLimits,
) -> Result<EncodedImage, RenderError> {
    let resampled = resample(image, width, height, filter, limits)?;
    Ok(encode(&resampled, format, quality)?)
}
