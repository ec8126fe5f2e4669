//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image, mime_type } from '@imagetools/wasm';
//!
//! const bytes = encode_image(image, 'jpeg', 90);
//! const blob = new Blob([bytes], { type: mime_type('jpeg') });
//! ```

use crate::types::{js_error, parse_format, JsDecodedImage};
use imagetools_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an image as `"png"` or `"jpeg"`.
///
/// `quality` (1-100) applies to JPEG only. JPEG has no alpha channel, so
/// transparent areas come out black.
///
/// # Errors
///
/// Returns an error for an unknown format, an empty image, or a pixel
/// buffer that does not match the dimensions.
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    let format = parse_format(format).map_err(js_error)?;
    encode::encode(image.as_decoded(), format, quality)
        .map(|encoded| encoded.bytes)
        .map_err(js_error)
}

/// MIME type for a format name, or `undefined` if it is unknown.
#[wasm_bindgen]
pub fn mime_type(format: &str) -> Option<String> {
    parse_format(format)
        .ok()
        .map(|f| f.mime_type().to_string())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_png() {
        let img = JsDecodedImage::new(8, 8, vec![200u8; 8 * 8 * 4]);
        let png = encode_image(&img, "png", 90).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_empty_image() {
        let img = JsDecodedImage::new(0, 0, vec![]);
        assert!(encode_image(&img, "png", 90).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_unknown_format() {
        let img = JsDecodedImage::new(2, 2, vec![0u8; 16]);
        assert!(encode_image(&img, "bmp", 90).is_err());
    }
}
