//! One-shot export binding and the downloadable file wrapper.
//!
//! # Example
//!
//! ```typescript
//! const file = export_image(bytes, croppedAreaPixels, rotation, false, false,
//!                           width, height, 'jpeg', { jpegQuality: 85 });
//! const url = URL.createObjectURL(new Blob([file.bytes()], { type: file.mime_type }));
//! ```

use crate::types::{js_error, parse_format};
use imagetools_core::export::{self as core_export, ExportRequest, ExportedFile};
use imagetools_core::transform::{Flip, PixelCrop};
use imagetools_core::{EditorConfig, OutputFormat};
use wasm_bindgen::prelude::*;

/// A finished export: bytes plus the name and MIME type to download it as.
#[wasm_bindgen]
pub struct JsExportedFile {
    inner: ExportedFile,
}

#[wasm_bindgen]
impl JsExportedFile {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Encoded file contents (copied into a `Uint8Array`).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

impl JsExportedFile {
    pub(crate) fn from_exported(inner: ExportedFile) -> Self {
        Self { inner }
    }
}

/// Decode, crop/rotate, resize, and encode an uploaded file in one call.
///
/// `crop` is the `{ x, y, width, height }` object the crop widget reports.
/// `config` may be `undefined` or a partial `EditorConfig` object.
///
/// # Errors
///
/// Returns an error string if the arguments are malformed or any stage
/// fails. Failures are also written to the browser console.
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn export_image(
    bytes: &[u8],
    crop: JsValue,
    rotation: f64,
    flip_horizontal: bool,
    flip_vertical: bool,
    target_width: u32,
    target_height: u32,
    format: &str,
    file_stem: &str,
    config: JsValue,
) -> Result<JsExportedFile, JsValue> {
    let crop: PixelCrop = serde_wasm_bindgen::from_value(crop)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop: {}", e)))?;
    let config = config_from_js(config)?;
    let format = parse_format(format).map_err(js_error)?;

    let request = ExportRequest {
        crop,
        rotation,
        flip: Flip {
            horizontal: flip_horizontal,
            vertical: flip_vertical,
        },
        target_width,
        target_height,
        format,
        file_stem: file_stem.to_string(),
    };

    core_export::export_from_bytes(bytes, &request, &config)
        .map(JsExportedFile::from_exported)
        .map_err(report_export_failure)
}

/// `<stem>-edited.<ext>` for a format name.
#[wasm_bindgen]
pub fn download_file_name(stem: &str, format: &str) -> String {
    let format = parse_format(format).unwrap_or(OutputFormat::Png);
    core_export::download_file_name(stem, format)
}

/// A file name without its final extension (`"photo.jpg"` → `"photo"`).
#[wasm_bindgen]
pub fn file_stem(name: &str) -> String {
    core_export::file_stem(name)
}

/// Read an optional `EditorConfig` object; `undefined`/`null` means defaults.
pub(crate) fn config_from_js(value: JsValue) -> Result<EditorConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EditorConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

/// Log a failed export to the console and turn it into a JS error.
pub(crate) fn report_export_failure(err: core_export::ExportError) -> JsValue {
    let message = format!("Export failed: {}", err);
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use imagetools_core::encode::encode;
    use imagetools_core::DecodedImage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png_upload(width: u32, height: u32) -> Vec<u8> {
        let img = DecodedImage::new(width, height, vec![90u8; (width * height * 4) as usize]);
        encode(&img, OutputFormat::Png, 90).unwrap().bytes
    }

    fn crop(x: f64, y: f64, width: f64, height: f64) -> JsValue {
        serde_wasm_bindgen::to_value(&PixelCrop::new(x, y, width, height)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_export_image() {
        let bytes = png_upload(80, 60);
        let file = export_image(
            &bytes,
            crop(10.0, 5.0, 40.0, 40.0),
            0.0,
            false,
            false,
            30,
            30,
            "png",
            "shot",
            JsValue::UNDEFINED,
        )
        .unwrap();
        assert_eq!(file.file_name(), "shot-edited.png");
        assert_eq!((file.width(), file.height()), (30, 30));
    }

    #[wasm_bindgen_test]
    fn test_export_rejects_bad_crop() {
        let bytes = png_upload(8, 8);
        let bad = serde_wasm_bindgen::to_value(&"nope").unwrap();
        let result = export_image(&bytes, bad, 0.0, false, false, 8, 8, "png", "x", JsValue::NULL);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_partial_config() {
        let value = js_sys::JSON::parse(r#"{"jpegQuality": 40}"#).unwrap();
        let config = config_from_js(value).unwrap();
        assert_eq!(config.jpeg_quality, 40);
        assert_eq!(config.ratio_debounce_ms, 500);
    }
}
