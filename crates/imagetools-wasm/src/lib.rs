//! ImageTools WASM - WebAssembly bindings for ImageTools
//!
//! This crate exposes the imagetools-core editor to the browser UI.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Upload decoding (PNG, JPEG)
//! - `transform` - Bounding box, crop/rotate render, resample
//! - `encode` - PNG/JPEG encoding
//! - `export` - One-shot export pipeline and the downloadable file type
//! - `editor` - Session, resize control and ratio input wrappers
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@imagetools/wasm';
//!
//! await init();
//!
//! const editor = new JsEditor();
//! editor.load_file(file.name, new Uint8Array(await file.arrayBuffer()));
//! // ... forward widget events ...
//! const out = editor.export('png');
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod export;
mod transform;
mod types;

pub use decode::{decode_image, is_supported_image};
pub use editor::{aspect_presets, fit_ratio, JsEditor, JsRatioInput, JsResizeControl};
pub use encode::{encode_image, mime_type};
pub use export::{download_file_name, export_image, file_stem, JsExportedFile};
pub use transform::{render_crop, resample, rotated_bounding_box};
pub use types::{JsDecodedImage, JsDimensions, JsSize};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    imagetools_core::VERSION.to_string()
}
