//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core ImageTools types and handle the conversion
//! between Rust and JavaScript data representations.

use imagetools_core::encode::OutputFormat;
use imagetools_core::transform::FilterType;
use imagetools_core::DecodedImage;
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Pixels are straight-alpha RGBA, 4 bytes per pixel, row-major, which is
/// the layout `ImageData` expects, so the bytes can be put on a canvas
/// without conversion.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`. Call `free()` to release a large image early; otherwise the
/// wasm-bindgen finalizer cleans up.
#[wasm_bindgen]
pub struct JsDecodedImage {
    inner: DecodedImage,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from dimensions and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            inner: DecodedImage {
                width,
                height,
                pixels,
            },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as a `Uint8Array` (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self { inner: img }
    }

    pub(crate) fn as_decoded(&self) -> &DecodedImage {
        &self.inner
    }

    pub(crate) fn into_decoded(self) -> DecodedImage {
        self.inner
    }
}

/// Width and height of a rotated bounding box, unrounded.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsSize {
    pub width: f64,
    pub height: f64,
}

/// Whole-pixel output dimensions.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsDimensions {
    pub width: u32,
    pub height: u32,
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest
/// - 1 = Bilinear
/// - 2 = Lanczos3
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Parse a format name coming from the UI (`"png"`, `"jpeg"`, `"jpg"`).
pub(crate) fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value).ok_or_else(|| format!("Unsupported output format: {}", value))
}

/// Convert any displayable error into a JavaScript error value.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
