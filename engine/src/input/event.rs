//! Input Event Module
//!
//! The canonical, device-agnostic input event and the normalization step
//! that produces it from raw host input. Decoupled from winit and the DOM:
//! hosts describe what happened with a [`RawInput`] and the manager turns it
//! into an [`InputEvent`] relative to the attached container.

use serde::{Deserialize, Serialize};

use super::keyboard::{KeyCode, ModifierState};
use super::surface::SurfaceRect;

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

impl MouseButton {
    /// Bit of this button in a [`ButtonMask`] (DOM `buttons` convention).
    pub fn mask_bit(self) -> u8 {
        match self {
            MouseButton::Left => ButtonMask::LEFT,
            MouseButton::Right => ButtonMask::RIGHT,
            MouseButton::Middle => ButtonMask::MIDDLE,
            MouseButton::Other(3) => ButtonMask::BACK,
            MouseButton::Other(4) => ButtonMask::FORWARD,
            MouseButton::Other(_) => 0,
        }
    }
}

/// Bitmask of currently held buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const MIDDLE: u8 = 4;
    pub const BACK: u8 = 8;
    pub const FORWARD: u8 = 16;

    /// Mask with no buttons held.
    pub fn none() -> Self {
        Self(0)
    }

    /// Mask with only `button` held.
    pub fn only(button: MouseButton) -> Self {
        Self(button.mask_bit())
    }

    /// Update the held state of one button.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.0 |= button.mask_bit();
        } else {
            self.0 &= !button.mask_bit();
        }
    }

    /// Check if a specific button is held.
    pub fn is_pressed(self, button: MouseButton) -> bool {
        let bit = button.mask_bit();
        bit != 0 && self.0 & bit == bit
    }

    /// Check if no button is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Kind of pointing device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

/// 2D position, used for pointer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a zero position.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Convert to tuple.
    pub fn to_tuple(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Calculate distance to another position.
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(&self, other: &Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(f32, f32)> for Position {
    fn from(tuple: (f32, f32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Position> for (f32, f32) {
    fn from(pos: Position) -> (f32, f32) {
        (pos.x, pos.y)
    }
}

/// Scroll wheel delta in line units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollDelta {
    /// Horizontal scroll (positive = right)
    pub x: f32,
    /// Vertical scroll (positive = up/forward)
    pub y: f32,
}

impl ScrollDelta {
    /// Create a new scroll delta.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create from line delta (common for mouse wheels).
    pub fn from_lines(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create from pixel delta (common for trackpads).
    /// Normalizes by dividing by 100 to get approximate line equivalents.
    pub fn from_pixels(x: f64, y: f64) -> Self {
        Self {
            x: (x / 100.0) as f32,
            y: (y / 100.0) as f32,
        }
    }

    /// Check if there's any scroll movement.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Event types a host can report.
///
/// Only the first eight produce an [`InputEvent`]; the rest are accepted so
/// hosts can forward everything without filtering, and are dropped during
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawEventType {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    Wheel,
    KeyDown,
    KeyUp,
    ContextMenu,
    PointerEnter,
    PointerCancel,
    Focus,
    Blur,
    Unknown,
}

impl RawEventType {
    /// Event types the manager attaches listeners for.
    pub const LISTENED: [RawEventType; 8] = [
        RawEventType::PointerDown,
        RawEventType::PointerMove,
        RawEventType::PointerUp,
        RawEventType::PointerLeave,
        RawEventType::Wheel,
        RawEventType::KeyDown,
        RawEventType::KeyUp,
        RawEventType::ContextMenu,
    ];

    /// Parse a DOM event name (`"pointerdown"`, `"wheel"`, ...).
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "pointerdown" | "mousedown" => Self::PointerDown,
            "pointermove" | "mousemove" => Self::PointerMove,
            "pointerup" | "mouseup" => Self::PointerUp,
            "pointerleave" | "mouseleave" => Self::PointerLeave,
            "wheel" => Self::Wheel,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "contextmenu" => Self::ContextMenu,
            "pointerenter" | "mouseenter" => Self::PointerEnter,
            "pointercancel" => Self::PointerCancel,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            _ => Self::Unknown,
        }
    }

    /// The canonical event kind for this raw type, if it has one.
    pub fn event_kind(self) -> Option<InputEventKind> {
        match self {
            Self::PointerDown => Some(InputEventKind::PointerDown),
            Self::PointerMove => Some(InputEventKind::PointerMove),
            Self::PointerUp => Some(InputEventKind::PointerUp),
            Self::PointerLeave => Some(InputEventKind::PointerLeave),
            Self::Wheel => Some(InputEventKind::Wheel),
            Self::KeyDown => Some(InputEventKind::KeyDown),
            Self::KeyUp => Some(InputEventKind::KeyUp),
            Self::ContextMenu => Some(InputEventKind::ContextMenu),
            Self::PointerEnter | Self::PointerCancel | Self::Focus | Self::Blur | Self::Unknown => {
                None
            }
        }
    }
}

/// Raw input as reported by the host, before normalization.
///
/// `client` is in the same coordinate space as the container's
/// [`SurfaceRect`] (window or page coordinates).
#[derive(Debug, Clone, PartialEq)]
pub struct RawInput {
    pub event_type: RawEventType,
    pub client: Position,
    pub button: Option<MouseButton>,
    pub buttons: ButtonMask,
    pub pointer_id: Option<u32>,
    pub pointer_type: Option<PointerType>,
    pub wheel: Option<ScrollDelta>,
    pub key: Option<KeyCode>,
    pub modifiers: ModifierState,
}

impl RawInput {
    /// A raw event of `event_type` at `(x, y)` with no extra fields.
    pub fn new(event_type: RawEventType, x: f32, y: f32) -> Self {
        Self {
            event_type,
            client: Position::new(x, y),
            button: None,
            buttons: ButtonMask::none(),
            pointer_id: None,
            pointer_type: None,
            wheel: None,
            key: None,
            modifiers: ModifierState::default(),
        }
    }

    /// Primary-button press at `(x, y)`.
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::new(RawEventType::PointerDown, x, y)
            .with_button(MouseButton::Left)
            .with_buttons(ButtonMask::only(MouseButton::Left))
    }

    /// Pointer motion at `(x, y)` with no button held.
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::new(RawEventType::PointerMove, x, y)
    }

    /// Primary-button release at `(x, y)`.
    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::new(RawEventType::PointerUp, x, y).with_button(MouseButton::Left)
    }

    /// Pointer leaving the container at `(x, y)`.
    pub fn pointer_leave(x: f32, y: f32) -> Self {
        Self::new(RawEventType::PointerLeave, x, y)
    }

    /// Wheel scroll at `(x, y)`.
    pub fn wheel(x: f32, y: f32, delta: ScrollDelta) -> Self {
        Self {
            wheel: Some(delta),
            ..Self::new(RawEventType::Wheel, x, y)
        }
    }

    /// Key press.
    pub fn key_down(key: KeyCode) -> Self {
        Self {
            key: Some(key),
            ..Self::new(RawEventType::KeyDown, 0.0, 0.0)
        }
    }

    /// Key release.
    pub fn key_up(key: KeyCode) -> Self {
        Self {
            key: Some(key),
            ..Self::new(RawEventType::KeyUp, 0.0, 0.0)
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_buttons(mut self, buttons: ButtonMask) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_pointer(mut self, pointer_id: u32, pointer_type: PointerType) -> Self {
        self.pointer_id = Some(pointer_id);
        self.pointer_type = Some(pointer_type);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierState) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Move the event to `(x, y)`; useful for key events, which the host
    /// tags with the last known pointer position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.client = Position::new(x, y);
        self
    }
}

/// Canonical event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    Wheel,
    KeyDown,
    KeyUp,
    ContextMenu,
}

impl InputEventKind {
    /// Whether the event originates from a pointing device.
    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::PointerDown | Self::PointerMove | Self::PointerUp | Self::PointerLeave | Self::ContextMenu
        )
    }

    /// Whether the event originates from the keyboard.
    pub fn is_key(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp)
    }
}

/// A single normalized input occurrence.
///
/// Created fresh for every raw event and never retained; multi-event
/// gestures are tracked by the handlers themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputEvent {
    pub kind: InputEventKind,
    /// Pixel position relative to the container's top-left corner.
    pub position: Position,
    /// Normalized device coordinates in [-1, 1], Y up.
    pub normalized: Position,
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: f64,
    pub button: Option<MouseButton>,
    pub buttons: ButtonMask,
    pub pointer_id: Option<u32>,
    pub pointer_type: Option<PointerType>,
    pub wheel: Option<ScrollDelta>,
    pub key: Option<KeyCode>,
    pub modifiers: ModifierState,
}

impl InputEvent {
    /// Whether this is a press or release of the primary button.
    pub fn is_primary_button(&self) -> bool {
        self.button.is_none_or(|b| b == MouseButton::Left)
    }
}

/// Convert container-relative pixels into normalized device coordinates.
///
/// `x' = (x / width) * 2 - 1`, `y' = -(y / height) * 2 + 1`.
pub fn to_ndc(position: Position, width: f32, height: f32) -> Position {
    Position::new(
        (position.x / width) * 2.0 - 1.0,
        -(position.y / height) * 2.0 + 1.0,
    )
}

/// Normalize a raw host event against the container bounds.
///
/// Returns `None` for unsupported event types and malformed events (a wheel
/// without a delta, a key event without a key, or pointer input on a
/// zero-sized container) rather than producing a half-filled event.
pub fn normalize(raw: &RawInput, bounds: SurfaceRect, timestamp_ms: f64) -> Option<InputEvent> {
    let kind = raw.event_type.event_kind()?;

    match kind {
        InputEventKind::Wheel if raw.wheel.is_none() => return None,
        InputEventKind::KeyDown | InputEventKind::KeyUp if raw.key.is_none() => return None,
        _ => {}
    }

    let position = Position::new(raw.client.x - bounds.left, raw.client.y - bounds.top);
    let normalized = if bounds.is_empty() {
        if kind.is_pointer() || kind == InputEventKind::Wheel {
            return None;
        }
        Position::zero()
    } else {
        to_ndc(position, bounds.width, bounds.height)
    };

    Some(InputEvent {
        kind,
        position,
        normalized,
        timestamp_ms,
        button: raw.button,
        buttons: raw.buttons,
        pointer_id: raw.pointer_id,
        pointer_type: raw.pointer_type,
        wheel: raw.wheel,
        key: raw.key,
        modifiers: raw.modifiers,
    })
}
