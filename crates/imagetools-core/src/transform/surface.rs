//! Drawing surface allocation.
//!
//! Every stage that produces pixels first asks for a surface of the target
//! size. Allocation is the one place a render can fail for reasons outside
//! the caller's input, so it is modelled as a `Result` instead of a panic or
//! an abort on out-of-memory.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::BYTES_PER_PIXEL;

/// Errors raised while obtaining a drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// A surface of the requested size cannot be created.
    #[error("Drawing surface unavailable for {width}x{height}: {reason}")]
    Unavailable {
        width: u32,
        height: u32,
        reason: String,
    },
}

impl SurfaceError {
    fn unavailable(width: u32, height: u32, reason: impl Into<String>) -> Self {
        SurfaceError::Unavailable {
            width,
            height,
            reason: reason.into(),
        }
    }
}

/// Size limits for drawing surfaces.
///
/// Defaults follow the common browser canvas caps (32767 px per side and
/// 268,435,456 px of area).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceLimits {
    /// Largest allowed width or height in pixels.
    pub max_dimension: u32,
    /// Largest allowed width * height in pixels.
    pub max_area: u64,
}

impl Default for SurfaceLimits {
    fn default() -> Self {
        Self {
            max_dimension: 32_767,
            max_area: 268_435_456,
        }
    }
}

impl SurfaceLimits {
    /// Check a requested size against the limits.
    pub fn check(&self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(SurfaceError::unavailable(
                width,
                height,
                format!("side exceeds {} px", self.max_dimension),
            ));
        }
        if width as u64 * height as u64 > self.max_area {
            return Err(SurfaceError::unavailable(
                width,
                height,
                format!("area exceeds {} px", self.max_area),
            ));
        }
        Ok(())
    }
}

/// Allocate a zeroed (fully transparent) RGBA buffer for a `width × height`
/// surface.
///
/// Zero-sized surfaces are allowed and yield an empty buffer.
pub fn allocate(width: u32, height: u32, limits: &SurfaceLimits) -> Result<Vec<u8>, SurfaceError> {
    limits.check(width, height)?;

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| SurfaceError::unavailable(width, height, "size overflows"))?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| SurfaceError::unavailable(width, height, e.to_string()))?;
    buffer.resize(len, 0);
    Ok(buffer)
}
