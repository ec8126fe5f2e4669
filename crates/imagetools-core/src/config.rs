//! Editor configuration.
//!
//! Every field has a default, so a partial object from the UI (or an empty
//! one) deserializes into a complete configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transform::{FilterType, SurfaceLimits};

/// Default JPEG quality, matching the 0.9 browsers use for `toBlob`.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default delay before a typed custom ratio is applied.
pub const DEFAULT_RATIO_DEBOUNCE_MS: u64 = 500;

/// Settings shared by the export pipeline and the editor controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// JPEG quality (1-100). Ignored for PNG.
    pub jpeg_quality: u8,
    /// Filter used when stretching the crop to the target size.
    pub resample_filter: FilterType,
    /// Drawing surface limits for the render and resample stages.
    pub surface: SurfaceLimits,
    /// Debounce delay for the custom aspect-ratio inputs, in milliseconds.
    pub ratio_debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            resample_filter: FilterType::Bilinear,
            surface: SurfaceLimits::default(),
            ratio_debounce_ms: DEFAULT_RATIO_DEBOUNCE_MS,
        }
    }
}

impl EditorConfig {
    pub fn ratio_debounce(&self) -> Duration {
        Duration::from_millis(self.ratio_debounce_ms)
    }

    /// Quality clamped into the range the JPEG encoder accepts.
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}
