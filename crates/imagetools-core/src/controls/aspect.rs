//! Aspect-ratio presets, ratio fitting, and the debounced custom ratio input.

use std::time::Duration;

use tracing::debug;

/// A named preset ratio (`width:height`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

impl AspectPreset {
    pub const fn new(label: &'static str, width: u32, height: u32) -> Self {
        Self {
            label,
            width,
            height,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Presets offered next to the custom ratio inputs.
pub const ASPECT_PRESETS: [AspectPreset; 6] = [
    AspectPreset::new("1:1", 1, 1),
    AspectPreset::new("4:3", 4, 3),
    AspectPreset::new("3:4", 3, 4),
    AspectPreset::new("16:9", 16, 9),
    AspectPreset::new("9:16", 9, 16),
    AspectPreset::new("3:2", 3, 2),
];

/// Look up a preset by its label.
pub fn preset(label: &str) -> Option<AspectPreset> {
    ASPECT_PRESETS.iter().copied().find(|p| p.label == label)
}

/// Largest `width × height` with the target ratio that keeps one side of the
/// original.
///
/// If the original is wider than the target, the height is kept and the
/// width shrinks; otherwise the width is kept and the height shrinks.
/// Returns `None` for a non-positive ratio or an empty original.
pub fn fit_ratio(orig_width: u32, orig_height: u32, target_ratio: f64) -> Option<(u32, u32)> {
    if orig_width == 0 || orig_height == 0 || !(target_ratio.is_finite() && target_ratio > 0.0) {
        return None;
    }

    let w = orig_width as f64;
    let h = orig_height as f64;

    let (new_w, new_h) = if w / h > target_ratio {
        ((h * target_ratio).round(), h)
    } else {
        (w, (w / target_ratio).round())
    };

    Some((clamp_dim(new_w), clamp_dim(new_h)))
}

fn clamp_dim(value: f64) -> u32 {
    value.clamp(1.0, u32::MAX as f64) as u32
}

/// Parse a positive, finite number typed into a ratio field.
pub fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Identifies one scheduled application of a typed ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceToken(u64);

impl DebounceToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: DebounceToken,
    deadline: Duration,
}

/// The custom `W : H` ratio inputs.
///
/// Every edit cancels the previously scheduled application and schedules a
/// new one `debounce` later. Time is passed in explicitly as a monotonic
/// timestamp, so the owner decides where it comes from (a browser clock,
/// a test counter). Losing focus applies the ratio immediately.
#[derive(Debug, Clone)]
pub struct CustomRatioInput {
    width_text: String,
    height_text: String,
    debounce: Duration,
    pending: Option<Pending>,
    next_token: u64,
}

impl CustomRatioInput {
    pub fn new(debounce: Duration) -> Self {
        Self {
            width_text: String::new(),
            height_text: String::new(),
            debounce,
            pending: None,
            next_token: 0,
        }
    }

    pub fn width_text(&self) -> &str {
        &self.width_text
    }

    pub fn height_text(&self) -> &str {
        &self.height_text
    }

    /// Ratio described by the current text, if both fields are valid.
    pub fn ratio(&self) -> Option<f64> {
        Some(parse_positive(&self.width_text)? / parse_positive(&self.height_text)?)
    }

    /// Replace both fields and (re)schedule the debounced application.
    pub fn edit(
        &mut self,
        width_text: impl Into<String>,
        height_text: impl Into<String>,
        now: Duration,
    ) -> DebounceToken {
        self.width_text = width_text.into();
        self.height_text = height_text.into();

        let token = DebounceToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(Pending {
            token,
            deadline: now + self.debounce,
        });
        token
    }

    pub fn edit_width(&mut self, text: impl Into<String>, now: Duration) -> DebounceToken {
        let height = std::mem::take(&mut self.height_text);
        self.edit(text, height, now)
    }

    pub fn edit_height(&mut self, text: impl Into<String>, now: Duration) -> DebounceToken {
        let width = std::mem::take(&mut self.width_text);
        self.edit(width, text, now)
    }

    /// Whether an application is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<DebounceToken> {
        self.pending.map(|p| p.token)
    }

    /// Apply the scheduled ratio once its deadline has passed.
    ///
    /// Consumes the schedule whether or not the text is valid.
    pub fn poll(&mut self, now: Duration) -> Option<f64> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                self.ratio()
            }
            _ => None,
        }
    }

    /// Apply the scheduled ratio if `token` is still the current schedule.
    ///
    /// For owners driven by an external timer that calls back with the
    /// token it was given; stale tokens do nothing.
    pub fn fire(&mut self, token: DebounceToken) -> Option<f64> {
        match self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                self.ratio()
            }
            _ => None,
        }
    }

    /// Focus left the inputs: apply immediately if the text is valid,
    /// cancelling any scheduled application.
    pub fn blur(&mut self) -> Option<f64> {
        let ratio = self.ratio()?;
        self.pending = None;
        Some(ratio)
    }

    /// Fill the fields from a preset and return its ratio.
    ///
    /// Any scheduled application of previously typed text is cancelled so it
    /// cannot override the preset later.
    pub fn select_preset(&mut self, preset: &AspectPreset) -> f64 {
        debug!(label = preset.label, "aspect preset selected");
        self.width_text = preset.width.to_string();
        self.height_text = preset.height.to_string();
        self.pending = None;
        preset.ratio()
    }
}
