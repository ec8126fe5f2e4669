//! Rotation geometry shared by the renderer and the crop widget bindings.
//!
//! Angles are in degrees, positive = clockwise on screen (y axis points
//! down), which is how the browser canvas and the crop widget rotate.

use serde::{Deserialize, Serialize};

/// Width/height pair in (possibly fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Convert degrees to radians.
///
/// No wrap-around is applied; everything downstream is periodic.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Sine and cosine of an angle given in degrees.
///
/// Whole quarter turns return exact 0/±1 values so that 90° and 270°
/// rotations swap dimensions without floating-point residue.
pub fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let turns = degrees / 90.0;
    let nearest = turns.round();
    if (turns - nearest).abs() < 1e-12 && nearest.is_finite() {
        return match (nearest as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    degrees_to_radians(degrees).sin_cos()
}

/// Compute the axis-aligned bounding box of a `width × height` rectangle
/// rotated about its centre.
///
/// ```text
/// bw = |cos θ · w| + |sin θ · h|
/// bh = |sin θ · w| + |cos θ · h|
/// ```
///
/// The result is not rounded: the renderer centres the rotated source on
/// `bw / 2, bh / 2` and needs the exact value to line up with the crop
/// rectangle the widget reported.
pub fn rotated_bounding_box(width: f64, height: f64, degrees: f64) -> Size {
    let (sin, cos) = sin_cos_degrees(degrees);
    Size {
        width: (cos * width).abs() + (sin * height).abs(),
        height: (sin * width).abs() + (cos * height).abs(),
    }
}

/// Whole-pixel size of the rotated bounding box, as the crop widget reports
/// it when the user selects the full extent.
pub fn rotated_bounds_px(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let size = rotated_bounding_box(width as f64, height as f64, degrees);
    (size.width.round() as u32, size.height.round() as u32)
}
