//! WASM bindings for the crop/rotate renderer and the resampler.
//!
//! These run with the default surface limits. The full export path in
//! [`crate::export`] takes a configuration object instead.

use crate::types::{filter_from_u8, js_error, JsDecodedImage, JsSize};
use imagetools_core::transform::{self as core_transform, Flip, PixelCrop, SurfaceLimits};
use wasm_bindgen::prelude::*;

/// Size of the box that holds a `width × height` image rotated by
/// `degrees`. This is the space crop rectangles are measured in.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const box = rotated_bounding_box(400, 200, 90); // { width: 200, height: 400 }
/// ```
#[wasm_bindgen]
pub fn rotated_bounding_box(width: f64, height: f64, degrees: f64) -> JsSize {
    let size = core_transform::rotated_bounding_box(width, height, degrees);
    JsSize {
        width: size.width,
        height: size.height,
    }
}

/// Render the framed crop of a rotated, optionally mirrored image.
///
/// `crop_*` are in pixels of the rotated bounding box, as reported by the
/// crop widget. The output is `crop_width × crop_height` at source scale.
///
/// # Errors
///
/// Returns an error if the output surface cannot be created.
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn render_crop(
    image: &JsDecodedImage,
    crop_x: f64,
    crop_y: f64,
    crop_width: f64,
    crop_height: f64,
    degrees: f64,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> Result<JsDecodedImage, JsValue> {
    let crop = PixelCrop::new(crop_x, crop_y, crop_width, crop_height);
    let flip = Flip {
        horizontal: flip_horizontal,
        vertical: flip_vertical,
    };
    core_transform::render_crop(
        image.as_decoded(),
        &crop,
        degrees,
        flip,
        &SurfaceLimits::default(),
    )
    .map(JsDecodedImage::from_decoded)
    .map_err(js_error)
}

/// Resize an image to exactly `width × height`.
///
/// `filter`: 0 = Nearest, 1 = Bilinear (default), 2 = Lanczos3.
///
/// # Errors
///
/// Returns an error if the target surface cannot be created.
#[wasm_bindgen]
pub fn resample(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    core_transform::resample(
        image.as_decoded(),
        width,
        height,
        filter_from_u8(filter),
        &SurfaceLimits::default(),
    )
    .map(JsDecodedImage::from_decoded)
    .map_err(js_error)
}


/// The functions below return `Result<T, JsValue>`, which only works on
/// wasm32 targets. Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn test_image(width: u32, height: u32) -> JsDecodedImage {
        let pixels: Vec<u8> = (0..(width * height * 4) as usize)
            .map(|i| if i % 4 == 3 { 255 } else { (i % 251) as u8 })
            .collect();
        JsDecodedImage::new(width, height, pixels)
    }

    #[wasm_bindgen_test]
    fn test_render_crop_size() {
        let img = test_image(100, 50);
        let out = render_crop(&img, 10.0, 5.0, 40.0, 20.0, 0.0, false, false).unwrap();
        assert_eq!((out.width(), out.height()), (40, 20));
    }

    #[wasm_bindgen_test]
    fn test_render_crop_quarter_turn() {
        let img = test_image(100, 50);
        let out = render_crop(&img, 0.0, 0.0, 50.0, 100.0, 90.0, false, false).unwrap();
        assert_eq!((out.width(), out.height()), (50, 100));
    }

    #[wasm_bindgen_test]
    fn test_render_crop_too_large() {
        let img = test_image(10, 10);
        assert!(render_crop(&img, 0.0, 0.0, 40_000.0, 10.0, 0.0, false, false).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resample() {
        let img = test_image(64, 32);
        let out = resample(&img, 16, 8, 1).unwrap();
        assert_eq!((out.width(), out.height()), (16, 8));
        assert_eq!(out.byte_length(), 16 * 8 * 4);
    }
}
