//! Output width/height inputs with an aspect-ratio lock.

use serde::{Deserialize, Serialize};

/// Target-dimension control.
///
/// While locked, editing one side recomputes the other from the remembered
/// ratio, and the ratio then follows the resulting (rounded) dimensions.
/// Invalid text (empty, zero, negative, non-numeric) is ignored without
/// error, since the fields pass through such states while typing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeControl {
    width: u32,
    height: u32,
    locked: bool,
    ratio: Option<f64>,
}

impl ResizeControl {
    /// A locked control remembering the ratio of `width × height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            locked: true,
            ratio: ratio_of(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The remembered width / height ratio.
    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    /// Dimensions changed from outside (file load, preset, reset).
    ///
    /// The remembered ratio follows only while locked.
    pub fn sync(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if self.locked {
            self.ratio = ratio_of(width, height);
        }
    }

    /// Apply typed width text. Returns the new dimensions if it was valid.
    pub fn set_width_input(&mut self, text: &str) -> Option<(u32, u32)> {
        let width = parse_dimension(text)?;
        let height = match (self.locked, self.ratio) {
            (true, Some(ratio)) => scaled(width as f64 / ratio),
            _ => self.height,
        };
        self.sync(width, height);
        Some(self.dimensions())
    }

    /// Apply typed height text. Returns the new dimensions if it was valid.
    pub fn set_height_input(&mut self, text: &str) -> Option<(u32, u32)> {
        let height = parse_dimension(text)?;
        let width = match (self.locked, self.ratio) {
            (true, Some(ratio)) => scaled(height as f64 * ratio),
            _ => self.width,
        };
        self.sync(width, height);
        Some(self.dimensions())
    }

    /// Toggle the lock. Locking remembers the current proportions.
    pub fn toggle_lock(&mut self) {
        if !self.locked {
            self.ratio = ratio_of(self.width, self.height);
        }
        self.locked = !self.locked;
    }
}

fn ratio_of(width: u32, height: u32) -> Option<f64> {
    if width == 0 || height == 0 {
        None
    } else {
        Some(width as f64 / height as f64)
    }
}

fn scaled(value: f64) -> u32 {
    value.round().clamp(1.0, u32::MAX as f64) as u32
}

/// Parse a positive whole number of pixels from the leading digits of the
/// text, so `"12.5"` and `"12px"` read as 12.
pub fn parse_dimension(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse::<u32>().ok().filter(|&v| v > 0)
}
