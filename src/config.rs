//! Driver settings, loaded from JSON.
//!
//! Every field has a default so a partial (or empty) document is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{DriverError, DriverResult};
use crate::video::font::MAX_FONT_SIZE;

/// Settings for the whole driver set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Video driver settings.
    pub video: VideoSettings,
    /// Audio driver settings.
    pub audio: AudioSettings,
    /// Joypad driver settings.
    pub input: InputSettings,
}

impl DriverConfig {
    /// Parse settings from a JSON document.
    pub fn from_json_str(s: &str) -> DriverResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| DriverError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON settings file.
    pub fn from_path(path: &Path) -> DriverResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DriverError::config(format!(
                "failed to read settings '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// Reject values the drivers cannot honor.
    pub fn validate(&self) -> DriverResult<()> {
        let v = &self.video;
        if !(v.font_size.is_finite() && v.font_size > 0.0 && v.font_size <= MAX_FONT_SIZE) {
            return Err(DriverError::config(format!(
                "video.font_size must be in (0, {MAX_FONT_SIZE}]"
            )));
        }
        for (name, pos) in [("msg_pos_x", v.msg_pos_x), ("msg_pos_y", v.msg_pos_y)] {
            if !pos.is_finite() {
                return Err(DriverError::config(format!("video.{name} must be finite")));
            }
        }
        if self.audio.rate == 0 {
            return Err(DriverError::config("audio.rate must be > 0"));
        }
        let t = self.input.axis_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(DriverError::config("input.axis_threshold must be in 0..=1"));
        }
        Ok(())
    }
}

/// Video driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Bilinear filtering for game frames.
    pub smooth: bool,
    /// Game frames arrive as ARGB8888 instead of RGB565.
    pub rgb32: bool,
    /// Draw on-screen messages.
    pub font_enable: bool,
    /// TrueType/OpenType font; the built-in bitmap font is used when unset.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: f32,
    /// Message color as unit-range `[r, g, b]`.
    pub msg_color: [f32; 3],
    /// Default horizontal message anchor (0 = left edge).
    pub msg_pos_x: f32,
    /// Default vertical message anchor (0 = bottom edge).
    pub msg_pos_y: f32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            smooth: false,
            rgb32: false,
            font_enable: true,
            font_path: None,
            font_size: 16.0,
            msg_color: [1.0, 1.0, 0.0],
            msg_pos_x: 0.05,
            msg_pos_y: 0.05,
        }
    }
}

impl VideoSettings {
    /// Message color clamped to 8-bit channels.
    pub fn message_color(&self) -> Rgb8 {
        Rgb8::from_unit(self.msg_color)
    }
}

/// Audio driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output sample rate in Hz.
    pub rate: u32,
    /// Requested latency; informational on this target.
    pub latency_ms: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            rate: 44_100,
            latency_ms: 64,
        }
    }
}

/// Joypad driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Fraction of full scale an axis must pass to count as a button press.
    pub axis_threshold: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            axis_threshold: 0.5,
        }
    }
}
