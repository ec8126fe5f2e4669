//! Stateful editor bindings.
//!
//! [`JsEditor`] owns the editing session and forwards UI events to it.
//! [`JsRatioInput`] and [`JsResizeControl`] back the form controls next to
//! the crop widget.
//!
//! # Example
//!
//! ```typescript
//! const editor = new JsEditor();
//! editor.load_file(file.name, new Uint8Array(await file.arrayBuffer()));
//! cropper.onCropComplete = (_, px) => editor.crop_complete(px.x, px.y, px.width, px.height);
//!
//! const ratio = new JsRatioInput();
//! widthInput.oninput = () => {
//!   const token = ratio.edit_width(widthInput.value);
//!   setTimeout(() => {
//!     const r = ratio.fire(token);
//!     if (r !== undefined) editor.select_ratio(r);
//!   }, ratio.debounce_ms);
//! };
//! ```

use std::time::Duration;

use crate::export::{config_from_js, report_export_failure, JsExportedFile};
use crate::types::{js_error, parse_format, JsDimensions};
use imagetools_core::controls::{self, CustomRatioInput, ResizeControl, ASPECT_PRESETS};
use imagetools_core::session::{CropPosition, EditorEvent, EditorSession};
use imagetools_core::transform::{Flip, PixelCrop};
use imagetools_core::{decode_image, EditorConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The editing session.
#[wasm_bindgen]
pub struct JsEditor {
    session: EditorSession,
    config: EditorConfig,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an empty editor. `config` may be omitted or partial.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditor, JsValue> {
        Ok(Self::with_config(config_from_js(config)?))
    }

    /// Decode an upload and start editing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded; the current session is
    /// kept as it was.
    pub fn load_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let image = decode_image(bytes).map_err(|e| {
            let message = format!("Failed to load {}: {}", file_name, e);
            web_sys::console::error_1(&JsValue::from_str(&message));
            JsValue::from_str(&message)
        })?;
        self.dispatch(EditorEvent::FileAccepted {
            file_name: file_name.to_string(),
            image,
        });
        Ok(())
    }

    pub fn set_crop_position(&mut self, x: f64, y: f64) {
        self.dispatch(EditorEvent::CropMoved(CropPosition { x, y }));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.dispatch(EditorEvent::ZoomChanged(zoom));
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.dispatch(EditorEvent::RotationChanged(degrees));
    }

    pub fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        self.dispatch(EditorEvent::FlipChanged(Flip {
            horizontal,
            vertical,
        }));
    }

    /// The widget finished an interaction; store its pixel crop.
    pub fn crop_complete(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.dispatch(EditorEvent::CropCompleted(PixelCrop::new(x, y, width, height)));
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.dispatch(EditorEvent::DimensionsChanged { width, height });
    }

    /// Raw text from the width field; invalid text is ignored.
    pub fn edit_width(&mut self, text: &str) {
        self.dispatch(EditorEvent::WidthEdited(text.to_string()));
    }

    /// Raw text from the height field; invalid text is ignored.
    pub fn edit_height(&mut self, text: &str) {
        self.dispatch(EditorEvent::HeightEdited(text.to_string()));
    }

    pub fn toggle_aspect_lock(&mut self) {
        self.dispatch(EditorEvent::AspectLockToggled);
    }

    /// Apply a width / height ratio to the original dimensions.
    pub fn select_ratio(&mut self, ratio: f64) {
        self.dispatch(EditorEvent::RatioSelected(ratio));
    }

    pub fn reset(&mut self) {
        self.dispatch(EditorEvent::Reset);
    }

    pub fn request_close(&mut self) {
        self.dispatch(EditorEvent::CloseRequested);
    }

    pub fn confirm_close(&mut self) {
        self.dispatch(EditorEvent::CloseConfirmed);
    }

    pub fn cancel_close(&mut self) {
        self.dispatch(EditorEvent::CloseCancelled);
    }

    #[wasm_bindgen(getter)]
    pub fn is_editing(&self) -> bool {
        self.session.is_editing()
    }

    #[wasm_bindgen(getter)]
    pub fn can_export(&self) -> bool {
        self.session.can_export()
    }

    #[wasm_bindgen(getter)]
    pub fn close_pending(&self) -> bool {
        self.session.editing().is_some_and(|s| s.close_pending())
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.session.editing().map_or(1.0, |s| s.zoom())
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.session.editing().map_or(0.0, |s| s.rotation())
    }

    #[wasm_bindgen(getter)]
    pub fn crop_x(&self) -> f64 {
        self.session.editing().map_or(0.0, |s| s.position().x)
    }

    #[wasm_bindgen(getter)]
    pub fn crop_y(&self) -> f64 {
        self.session.editing().map_or(0.0, |s| s.position().y)
    }

    #[wasm_bindgen(getter)]
    pub fn target_width(&self) -> u32 {
        self.session.editing().map_or(0, |s| s.target_dimensions().0)
    }

    #[wasm_bindgen(getter)]
    pub fn target_height(&self) -> u32 {
        self.session.editing().map_or(0, |s| s.target_dimensions().1)
    }

    #[wasm_bindgen(getter)]
    pub fn original_width(&self) -> u32 {
        self.session.editing().map_or(0, |s| s.original_dimensions().0)
    }

    #[wasm_bindgen(getter)]
    pub fn original_height(&self) -> u32 {
        self.session.editing().map_or(0, |s| s.original_dimensions().1)
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_locked(&self) -> bool {
        self.session.editing().is_some_and(|s| s.resize().is_locked())
    }

    /// Aspect for the crop widget; `undefined` means free-form.
    #[wasm_bindgen(getter)]
    pub fn widget_aspect(&self) -> Option<f64> {
        self.session.widget_aspect()
    }

    #[wasm_bindgen(getter)]
    pub fn file_stem(&self) -> Option<String> {
        self.session.editing().map(|s| s.file_stem().to_string())
    }

    /// Export the current edit as `"png"` or `"jpeg"`.
    ///
    /// # Errors
    ///
    /// Returns an error (also logged to the console) if no crop has been
    /// reported yet or a pipeline stage fails. The session is unchanged.
    pub fn export(&self, format: &str) -> Result<JsExportedFile, JsValue> {
        let format = parse_format(format).map_err(js_error)?;
        self.session
            .export(format, &self.config)
            .map(JsExportedFile::from_exported)
            .map_err(report_export_failure)
    }
}

impl JsEditor {
    pub(crate) fn with_config(config: EditorConfig) -> Self {
        Self {
            session: EditorSession::new(),
            config,
        }
    }

    fn dispatch(&mut self, event: EditorEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = session.handle(event);
    }
}

/// Target width/height fields with an aspect lock.
#[wasm_bindgen]
pub struct JsResizeControl {
    inner: ResizeControl,
}

#[wasm_bindgen]
impl JsResizeControl {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> JsResizeControl {
        Self {
            inner: ResizeControl::new(width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Returns `true` if the text was accepted.
    pub fn set_width_input(&mut self, text: &str) -> bool {
        self.inner.set_width_input(text).is_some()
    }

    /// Returns `true` if the text was accepted.
    pub fn set_height_input(&mut self, text: &str) -> bool {
        self.inner.set_height_input(text).is_some()
    }

    pub fn toggle_lock(&mut self) {
        self.inner.toggle_lock();
    }

    pub fn sync(&mut self, width: u32, height: u32) {
        self.inner.sync(width, height);
    }
}

/// The debounced custom `W : H` ratio fields.
///
/// Timestamps come from `Date.now()`. JavaScript owns the timer: schedule
/// a callback `debounce_ms` after each edit and pass back the token the
/// edit returned (or call `poll`).
#[wasm_bindgen]
pub struct JsRatioInput {
    inner: CustomRatioInput,
    debounce_ms: u32,
}

#[wasm_bindgen]
impl JsRatioInput {
    /// `debounce_ms` defaults to the configured 500 ms.
    #[wasm_bindgen(constructor)]
    pub fn new(debounce_ms: Option<u32>) -> JsRatioInput {
        let default_ms = EditorConfig::default().ratio_debounce_ms;
        let ms = debounce_ms.unwrap_or(u32::try_from(default_ms).unwrap_or(u32::MAX));
        Self {
            inner: CustomRatioInput::new(Duration::from_millis(ms as u64)),
            debounce_ms: ms,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }

    #[wasm_bindgen(getter)]
    pub fn width_text(&self) -> String {
        self.inner.width_text().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn height_text(&self) -> String {
        self.inner.height_text().to_string()
    }

    /// Returns the token for this edit's scheduled application.
    pub fn edit_width(&mut self, text: &str) -> f64 {
        self.edit_width_at(text, now())
    }

    /// Returns the token for this edit's scheduled application.
    pub fn edit_height(&mut self, text: &str) -> f64 {
        self.edit_height_at(text, now())
    }

    /// Ratio to apply if the debounce deadline has passed.
    pub fn poll(&mut self) -> Option<f64> {
        self.inner.poll(now())
    }

    /// Ratio to apply if `token` is still the latest edit.
    pub fn fire(&mut self, token: f64) -> Option<f64> {
        let current = self.inner.pending_token()?;
        if current.id() as f64 == token {
            self.inner.fire(current)
        } else {
            None
        }
    }

    /// Ratio to apply right away because focus left the fields.
    pub fn blur(&mut self) -> Option<f64> {
        self.inner.blur()
    }

    /// Fill the fields from a preset label such as `"16:9"`.
    pub fn select_preset(&mut self, label: &str) -> Option<f64> {
        let preset = controls::preset(label)?;
        Some(self.inner.select_preset(&preset))
    }
}

impl JsRatioInput {
    fn edit_width_at(&mut self, text: &str, now: Duration) -> f64 {
        self.inner.edit_width(text, now).id() as f64
    }

    fn edit_height_at(&mut self, text: &str, now: Duration) -> f64 {
        self.inner.edit_height(text, now).id() as f64
    }
}

fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
}

/// Largest `width × height` with the given ratio that keeps one side of
/// the original; `undefined` for a non-positive ratio.
#[wasm_bindgen]
pub fn fit_ratio(orig_width: u32, orig_height: u32, ratio: f64) -> Option<JsDimensions> {
    controls::fit_ratio(orig_width, orig_height, ratio)
        .map(|(width, height)| JsDimensions { width, height })
}

#[derive(Serialize)]
struct PresetJs {
    label: &'static str,
    width: u32,
    height: u32,
}

/// The preset list as `[{ label, width, height }, ...]`.
#[wasm_bindgen]
pub fn aspect_presets() -> Result<JsValue, JsValue> {
    let presets: Vec<PresetJs> = ASPECT_PRESETS
        .iter()
        .map(|p| PresetJs {
            label: p.label,
            width: p.width,
            height: p.height,
        })
        .collect();
    serde_wasm_bindgen::to_value(&presets).map_err(js_error)
}
