//! Interaction Modes
//!
//! The closed set of mutually exclusive ways raw input on the globe is
//! interpreted, plus the read-only configuration (cursor, gestures, help
//! text) the HUD shows for each of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How input on the globe is currently interpreted. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Drag to rotate, wheel to zoom.
    #[default]
    Navigation,
    /// Hover to preview a marker position, click to place it.
    IntelPlacement,
    /// Hover and click existing markers.
    IntelInspection,
    /// Click surface points to measure great-circle distance.
    Measurement,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 4] = [
        InteractionMode::Navigation,
        InteractionMode::IntelPlacement,
        InteractionMode::IntelInspection,
        InteractionMode::Measurement,
    ];

    /// Dense index into per-mode tables.
    pub fn index(self) -> usize {
        match self {
            InteractionMode::Navigation => 0,
            InteractionMode::IntelPlacement => 1,
            InteractionMode::IntelInspection => 2,
            InteractionMode::Measurement => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionMode::Navigation => "navigation",
            InteractionMode::IntelPlacement => "intel_placement",
            InteractionMode::IntelInspection => "intel_inspection",
            InteractionMode::Measurement => "measurement",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor the host should show while a mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    Grab,
    Crosshair,
    Pointer,
    Cell,
}

impl CursorStyle {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorStyle::Grab => "grab",
            CursorStyle::Crosshair => "crosshair",
            CursorStyle::Pointer => "pointer",
            CursorStyle::Cell => "cell",
        }
    }
}

/// Input gestures a mode reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Drag,
    Wheel,
    Hover,
    Click,
    DoubleClick,
    Keyboard,
}

/// Declarative configuration of one mode. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeConfig {
    pub mode: InteractionMode,
    pub label: &'static str,
    pub cursor: CursorStyle,
    pub gestures: &'static [Gesture],
    pub hint: &'static str,
}

impl ModeConfig {
    pub fn allows(&self, gesture: Gesture) -> bool {
        self.gestures.contains(&gesture)
    }
}

const NAVIGATION_GESTURES: &[Gesture] = &[Gesture::Drag, Gesture::Wheel, Gesture::Keyboard];
const PLACEMENT_GESTURES: &[Gesture] = &[Gesture::Hover, Gesture::Click, Gesture::Keyboard];
const INSPECTION_GESTURES: &[Gesture] = &[Gesture::Hover, Gesture::Click, Gesture::DoubleClick];
const MEASUREMENT_GESTURES: &[Gesture] = &[Gesture::Click, Gesture::DoubleClick, Gesture::Keyboard];

fn default_config(mode: InteractionMode) -> ModeConfig {
    match mode {
        InteractionMode::Navigation => ModeConfig {
            mode,
            label: "Navigate",
            cursor: CursorStyle::Grab,
            gestures: NAVIGATION_GESTURES,
            hint: "Drag to rotate the globe, scroll to zoom",
        },
        InteractionMode::IntelPlacement => ModeConfig {
            mode,
            label: "Place Intel",
            cursor: CursorStyle::Crosshair,
            gestures: PLACEMENT_GESTURES,
            hint: "Click the globe to place an intel marker, Esc to cancel",
        },
        InteractionMode::IntelInspection => ModeConfig {
            mode,
            label: "Inspect Intel",
            cursor: CursorStyle::Pointer,
            gestures: INSPECTION_GESTURES,
            hint: "Hover a marker for a preview, click to select, double-click for details",
        },
        InteractionMode::Measurement => ModeConfig {
            mode,
            label: "Measure",
            cursor: CursorStyle::Cell,
            gestures: MEASUREMENT_GESTURES,
            hint: "Click points to measure, double-click or Enter to finish, Esc to clear",
        },
    }
}

/// Per-mode configuration table, built once at startup.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    configs: [ModeConfig; 4],
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self {
            configs: InteractionMode::ALL.map(default_config),
        }
    }

    /// Configuration for `mode`. Total over the enum.
    pub fn config(&self, mode: InteractionMode) -> &ModeConfig {
        &self.configs[mode.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeConfig> {
        self.configs.iter()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_has_its_own_config() {
        let registry = ModeRegistry::new();
        for mode in InteractionMode::ALL {
            assert_eq!(registry.config(mode).mode, mode);
            assert!(!registry.config(mode).hint.is_empty());
        }
    }

    #[test]
    fn test_index_is_dense() {
        for (i, mode) in InteractionMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn test_gestures() {
        let registry = ModeRegistry::new();
        assert!(registry.config(InteractionMode::Navigation).allows(Gesture::Drag));
        assert!(!registry.config(InteractionMode::Navigation).allows(Gesture::Click));
        assert!(registry.config(InteractionMode::Measurement).allows(Gesture::DoubleClick));
        assert_eq!(registry.config(InteractionMode::IntelPlacement).cursor.as_css(), "crosshair");
    }

    #[test]
    fn test_mode_serializes_snake_case() {
        let json = serde_json::to_string(&InteractionMode::IntelPlacement).unwrap();
        assert_eq!(json, "\"intel_placement\"");
        assert_eq!(InteractionMode::IntelPlacement.to_string(), "intel_placement");
    }
}
