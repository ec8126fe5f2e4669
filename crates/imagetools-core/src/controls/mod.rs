//! Input controls that feed target dimensions into the session.
//!
//! - [`ResizeControl`]: width/height fields with an aspect lock
//! - [`CustomRatioInput`]: debounced `W : H` fields
//! - [`fit_ratio`] and [`ASPECT_PRESETS`]: turning a ratio into dimensions

mod aspect;
mod resize;

pub use aspect::{
    fit_ratio, parse_positive, preset, AspectPreset, CustomRatioInput, DebounceToken,
    ASPECT_PRESETS,
};
pub use resize::{parse_dimension, ResizeControl};
