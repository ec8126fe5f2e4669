//! Geometric transform pipeline: rotate, crop, resample.
//!
//! # Transform Order
//!
//! An export applies these stages strictly in sequence:
//! 1. Rotation and flip of the whole source, about its centre
//! 2. Crop of the rotated bounding box (same pass as 1, 1:1 pixels)
//! 3. Resample of the crop to the target dimensions
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in pixels of the rotated bounding box
//! - Origin is top-left corner, y points down

mod geometry;
mod render;
mod resample;
mod surface;

pub use geometry::{
    degrees_to_radians, rotated_bounding_box, rotated_bounds_px, sin_cos_degrees, Size,
};
pub use render::{render_crop, render_crop_encoded, Flip, PixelCrop, RenderError};
pub use resample::{resample, resample_encoded, FilterType};
pub use surface::{allocate, SurfaceError, SurfaceLimits};
