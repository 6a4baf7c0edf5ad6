//! Editor tunables, deserialized from a JSON object supplied by the host.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
pub const DEFAULT_PIXELS_PER_CM: f64 = 37.8;
pub const DEFAULT_COMPASS_RADIUS: f64 = 100.0;
pub const DEFAULT_COMPASS_MIN_RADIUS: f64 = 5.0;
pub const DEFAULT_COMPASS_BLACK_INK_FALLBACK: &str = "#808080";
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Error returned by [`EditorConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config field `{field}` must be positive")]
    NotPositive { field: &'static str },
    #[error("config field `{field}` is not a #RRGGBB color: {value}")]
    InvalidColor { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas rectangle used to clip full lines.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// `T_snap`: features strictly closer than this are snapped to.
    pub snap_threshold_px: f64,
    pub pixels_per_cm: f64,
    /// Radius applied when a compass placement ends without a real drag.
    pub default_compass_radius: f64,
    /// Resize drags ending below this radius count as a plain click.
    pub compass_min_radius: f64,
    /// Arc color used when the drawing color is pure black.
    pub compass_black_ink_fallback: String,
    /// Maximum undo depth; the oldest checkpoints are dropped first.
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            snap_threshold_px: crate::consts::SNAP_THRESHOLD_PX,
            pixels_per_cm: DEFAULT_PIXELS_PER_CM,
            default_compass_radius: DEFAULT_COMPASS_RADIUS,
            compass_min_radius: DEFAULT_COMPASS_MIN_RADIUS,
            compass_black_ink_fallback: DEFAULT_COMPASS_BLACK_INK_FALLBACK.to_owned(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config object. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input,
    /// [`ConfigError::NotPositive`] for a non-positive dimension or limit and
    /// [`ConfigError::InvalidColor`] for a bad fallback color.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// See [`EditorConfig::from_json`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("snap_threshold_px", self.snap_threshold_px),
            ("pixels_per_cm", self.pixels_per_cm),
            ("default_compass_radius", self.default_compass_radius),
            ("compass_min_radius", self.compass_min_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }
        if self.history_limit == 0 {
            return Err(ConfigError::NotPositive { field: "history_limit" });
        }
        if !is_hex_color(&self.compass_black_ink_fallback) {
            return Err(ConfigError::InvalidColor {
                field: "compass_black_ink_fallback",
                value: self.compass_black_ink_fallback.clone(),
            });
        }
        Ok(())
    }
}

/// Whether `s` is a `#RRGGBB` color.
#[must_use]
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
