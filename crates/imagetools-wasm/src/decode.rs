//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_supported_image } from '@imagetools/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (is_supported_image(bytes)) {
//!   const image = decode_image(bytes);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::{js_error, JsDecodedImage};
use imagetools_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a PNG or JPEG upload into RGBA pixels.
///
/// EXIF orientation is applied, so the result matches what the browser
/// shows in an `<img>` element.
///
/// # Errors
///
/// Returns an error string if the bytes are neither PNG nor JPEG, or if
/// the data is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Check whether the bytes start with a PNG or JPEG signature.
///
/// Cheap enough to run on drop before committing to a full decode.
#[wasm_bindgen]
pub fn is_supported_image(bytes: &[u8]) -> bool {
    decode::detect_format(bytes).is_ok()
}
