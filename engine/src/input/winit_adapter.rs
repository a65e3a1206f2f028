//! Winit host adapter.
//!
//! Translates winit `WindowEvent`s into [`RawInput`] for the manager. winit
//! reports cursor position, buttons and modifiers as separate events, so
//! the adapter tracks them and stamps each raw event with the full state.

use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

use super::event::{ButtonMask, MouseButton, Position, PointerType, RawEventType, RawInput, ScrollDelta};
use super::keyboard::{KeyCode, ModifierState};

/// winit reports a single mouse pointer.
const MOUSE_POINTER_ID: u32 = 1;

/// Stateful `WindowEvent` to [`RawInput`] translator.
#[derive(Debug, Clone, Default)]
pub struct WinitInputAdapter {
    cursor: Position,
    buttons: ButtonMask,
    modifiers: ModifierState,
}

impl WinitInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in window pixels.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Translate one window event. Events with no input meaning
    /// (resize, redraw, modifier changes) return `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<RawInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Position::new(position.x as f32, position.y as f32);
                Some(self.pointer(RawEventType::PointerMove))
            }
            WindowEvent::CursorLeft { .. } => {
                self.buttons = ButtonMask::none();
                Some(self.pointer(RawEventType::PointerLeave))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(*button);
                let pressed = *state == ElementState::Pressed;
                self.buttons.set(button, pressed);
                let event_type = if pressed {
                    RawEventType::PointerDown
                } else {
                    RawEventType::PointerUp
                };
                Some(self.pointer(event_type).with_button(button))
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => ScrollDelta::from_lines(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => ScrollDelta::from_pixels(pos.x, pos.y),
                };
                Some(RawInput {
                    wheel: Some(delta),
                    ..self.pointer(RawEventType::Wheel)
                })
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = ModifierState {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    meta: state.super_key(),
                };
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => map_key(code),
                    PhysicalKey::Unidentified(_) => KeyCode::Unknown,
                };
                let raw = if event.state == ElementState::Pressed {
                    RawInput::key_down(key)
                } else {
                    RawInput::key_up(key)
                };
                Some(
                    raw.at(self.cursor.x, self.cursor.y)
                        .with_modifiers(self.modifiers),
                )
            }
            _ => None,
        }
    }

    fn pointer(&self, event_type: RawEventType) -> RawInput {
        RawInput::new(event_type, self.cursor.x, self.cursor.y)
            .with_buttons(self.buttons)
            .with_pointer(MOUSE_POINTER_ID, PointerType::Mouse)
            .with_modifiers(self.modifiers)
    }
}

fn map_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}

/// Map a winit physical key to the platform-neutral key code.
pub fn map_key(key: WinitKey) -> KeyCode {
    match key {
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        WinitKey::Digit1 => KeyCode::Digit1,
        WinitKey::Digit2 => KeyCode::Digit2,
        WinitKey::Digit3 => KeyCode::Digit3,
        WinitKey::Digit4 => KeyCode::Digit4,
        WinitKey::NumpadAdd => KeyCode::NumpadAdd,
        WinitKey::NumpadSubtract => KeyCode::NumpadSubtract,
        WinitKey::NumpadEnter => KeyCode::NumpadEnter,
        WinitKey::Escape => KeyCode::Escape,
        WinitKey::Enter => KeyCode::Enter,
        WinitKey::Backspace => KeyCode::Backspace,
        WinitKey::Delete => KeyCode::Delete,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::Space => KeyCode::Space,
        WinitKey::ShiftLeft => KeyCode::ShiftLeft,
        WinitKey::ShiftRight => KeyCode::ShiftRight,
        WinitKey::ControlLeft => KeyCode::ControlLeft,
        WinitKey::ControlRight => KeyCode::ControlRight,
        WinitKey::AltLeft => KeyCode::AltLeft,
        WinitKey::AltRight => KeyCode::AltRight,
        WinitKey::Minus => KeyCode::Minus,
        WinitKey::Equal => KeyCode::Equal,
        _ => KeyCode::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(WinitKey::ArrowLeft), KeyCode::ArrowLeft);
        assert_eq!(map_key(WinitKey::NumpadEnter), KeyCode::NumpadEnter);
        assert_eq!(map_key(WinitKey::KeyQ), KeyCode::Unknown);
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(map_button(WinitButton::Left), MouseButton::Left);
        assert_eq!(map_button(WinitButton::Back).mask_bit(), ButtonMask::BACK);
        assert_eq!(map_button(WinitButton::Other(7)), MouseButton::Other(7));
    }

    #[test]
    fn test_pointer_events_carry_cursor_state() {
        let adapter = WinitInputAdapter {
            cursor: Position::new(12.0, 34.0),
            buttons: ButtonMask::only(MouseButton::Left),
            modifiers: ModifierState {
                shift: true,
                ..ModifierState::default()
            },
        };
        let raw = adapter.pointer(RawEventType::PointerMove);

        assert_eq!(raw.client, Position::new(12.0, 34.0));
        assert!(raw.buttons.is_pressed(MouseButton::Left));
        assert_eq!(raw.pointer_type, Some(PointerType::Mouse));
        assert!(raw.modifiers.shift);
    }
}
