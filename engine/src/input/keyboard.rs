//! Keyboard Input Module
//!
//! Generic key codes and modifier state, decoupled from any windowing system.
//! Hosts translate their native key identifiers into [`KeyCode`] before
//! handing events to the input manager.

use serde::{Deserialize, Serialize};

/// Generic key codes, independent of windowing system.
///
/// Only the keys the globe handlers care about are named; everything else
/// arrives as [`KeyCode::Unknown`] and is ignored by the default bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Number keys (mode toolbar shortcuts live in the host)
    Digit1,
    Digit2,
    Digit3,
    Digit4,

    // Numpad
    NumpadAdd,
    NumpadSubtract,
    NumpadEnter,

    // Control keys
    Escape,
    Enter,
    Backspace,
    Delete,
    Tab,
    Space,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    // Punctuation
    Minus,
    Equal,

    /// Catch-all for unhandled keys
    Unknown,
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.code` string.
    pub fn from_dom_code(code: &str) -> Self {
        match code {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Digit1" => Self::Digit1,
            "Digit2" => Self::Digit2,
            "Digit3" => Self::Digit3,
            "Digit4" => Self::Digit4,
            "NumpadAdd" => Self::NumpadAdd,
            "NumpadSubtract" => Self::NumpadSubtract,
            "NumpadEnter" => Self::NumpadEnter,
            "Escape" => Self::Escape,
            "Enter" => Self::Enter,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Tab" => Self::Tab,
            "Space" => Self::Space,
            "ShiftLeft" => Self::ShiftLeft,
            "ShiftRight" => Self::ShiftRight,
            "ControlLeft" => Self::ControlLeft,
            "ControlRight" => Self::ControlRight,
            "AltLeft" => Self::AltLeft,
            "AltRight" => Self::AltRight,
            "Minus" => Self::Minus,
            "Equal" => Self::Equal,
            _ => Self::Unknown,
        }
    }

    /// Whether this key is itself a modifier.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::ShiftLeft
                | Self::ShiftRight
                | Self::ControlLeft
                | Self::ControlRight
                | Self::AltLeft
                | Self::AltRight
        )
    }
}

/// State of keyboard modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ModifierState {
    /// Create a new empty modifier state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}
