//! Input Configuration
//!
//! Tunable thresholds for gesture recognition and globe geometry, loadable
//! from JSON. `Default` returns the values the handlers were tuned with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::EARTH_RADIUS_KM;
use crate::input::bindings::KeyBindings;
use crate::input::mode::InteractionMode;

/// Errors while loading or validating an [`InputConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration shared by the manager and the built-in handlers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mode active right after construction
    pub initial_mode: InteractionMode,
    /// Max pointer travel between press and release for a click (pixels)
    pub click_tolerance_px: f32,
    /// Max time between two clicks of a double-click (milliseconds)
    pub double_click_ms: f64,
    /// Max distance between two clicks of a double-click (pixels)
    pub double_click_distance_px: f32,
    /// Pseudo-drag delta produced by one arrow-key press (pixels)
    pub keyboard_rotate_step_px: f32,
    /// Wheel-equivalent zoom delta produced by one +/- press (lines)
    pub keyboard_zoom_step: f32,
    /// Sphere radius used for great-circle distances (km)
    pub earth_radius_km: f64,
    /// Surface distance within which a marker counts as under the pointer (km)
    pub marker_pick_radius_km: f64,
    /// Keyboard shortcuts; configured in code, not serialized
    #[serde(skip)]
    pub bindings: KeyBindings,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            initial_mode: InteractionMode::Navigation,
            click_tolerance_px: 5.0,
            double_click_ms: 300.0,
            double_click_distance_px: 6.0,
            keyboard_rotate_step_px: 24.0,
            keyboard_zoom_step: 1.0,
            earth_radius_km: EARTH_RADIUS_KM,
            marker_pick_radius_km: 250.0,
            bindings: KeyBindings::default(),
        }
    }
}

impl InputConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: InputConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject non-positive or non-finite thresholds and radii.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&str, f64); 7] = [
            ("click_tolerance_px", self.click_tolerance_px as f64),
            ("double_click_ms", self.double_click_ms),
            ("double_click_distance_px", self.double_click_distance_px as f64),
            ("keyboard_rotate_step_px", self.keyboard_rotate_step_px as f64),
            ("keyboard_zoom_step", self.keyboard_zoom_step as f64),
            ("earth_radius_km", self.earth_radius_km),
            ("marker_pick_radius_km", self.marker_pick_radius_km),
        ];

        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
