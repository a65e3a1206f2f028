//! Navigation handler: drag to rotate, wheel to zoom, arrow keys and +/-
//! as keyboard equivalents.

use crate::config::InputConfig;
use crate::input::action::{ActionData, ActionKind};
use crate::input::bindings::{GlobeKeyAction, KeyBindings};
use crate::input::event::{InputEvent, InputEventKind, Position};
use crate::input::handler::{HandlerError, InputHandler, InputResult};
use crate::input::mode::InteractionMode;
use crate::scene::SceneContext;

const MODES: &[InteractionMode] = &[InteractionMode::Navigation];

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin: Position,
    last: Position,
}

/// Turns pointer drags and wheel input into camera navigation actions.
///
/// Needs no surface hit: rotation and zoom work the same on and off the
/// globe.
#[derive(Debug, Clone)]
pub struct NavigationInputHandler {
    bindings: KeyBindings,
    rotate_step_px: f32,
    zoom_step: f32,
    drag: Option<DragState>,
}

impl NavigationInputHandler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            bindings: config.bindings.clone(),
            rotate_step_px: config.keyboard_rotate_step_px,
            zoom_step: config.keyboard_zoom_step,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn key_action(&self, event: &InputEvent) -> Option<GlobeKeyAction> {
        self.bindings.get_action(event.key?).filter(|action| {
            matches!(
                action,
                GlobeKeyAction::RotateLeft
                    | GlobeKeyAction::RotateRight
                    | GlobeKeyAction::RotateUp
                    | GlobeKeyAction::RotateDown
                    | GlobeKeyAction::ZoomIn
                    | GlobeKeyAction::ZoomOut
            )
        })
    }

    fn handle_key(&self, action: GlobeKeyAction, event: &InputEvent) -> InputResult {
        let step = self.rotate_step_px;
        let rotate = |dx: f32, dy: f32| {
            InputResult::action(
                ActionKind::NavigationRotate,
                ActionData::Rotate {
                    delta: Position::new(dx, dy),
                },
            )
        };
        let zoom = |delta: f32| {
            InputResult::action(
                ActionKind::NavigationZoom,
                ActionData::Zoom {
                    delta,
                    anchor: event.position,
                },
            )
        };

        let result = match action {
            GlobeKeyAction::RotateLeft => rotate(-step, 0.0),
            GlobeKeyAction::RotateRight => rotate(step, 0.0),
            // Tilting north is the same as dragging the globe down
            GlobeKeyAction::RotateUp => rotate(0.0, step),
            GlobeKeyAction::RotateDown => rotate(0.0, -step),
            GlobeKeyAction::ZoomIn => zoom(self.zoom_step),
            GlobeKeyAction::ZoomOut => zoom(-self.zoom_step),
            _ => return InputResult::unhandled(),
        };
        result.with_prevent_default()
    }
}

impl InputHandler for NavigationInputHandler {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn supported_modes(&self) -> &[InteractionMode] {
        MODES
    }

    fn can_handle(&self, event: &InputEvent, _mode: InteractionMode, _context: &SceneContext) -> bool {
        match event.kind {
            InputEventKind::PointerDown => event.is_primary_button(),
            InputEventKind::PointerMove | InputEventKind::PointerUp | InputEventKind::PointerLeave => {
                self.drag.is_some()
            }
            InputEventKind::Wheel => event.wheel.is_some_and(|w| w.y != 0.0),
            InputEventKind::KeyDown => self.key_action(event).is_some(),
            InputEventKind::KeyUp | InputEventKind::ContextMenu => false,
        }
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        _mode: InteractionMode,
        _context: &SceneContext,
    ) -> Result<InputResult, HandlerError> {
        let position = event.position;

        let result = match event.kind {
            InputEventKind::PointerDown => {
                self.drag = Some(DragState {
                    origin: position,
                    last: position,
                });
                InputResult::action(
                    ActionKind::NavigationDragStart,
                    ActionData::Drag {
                        origin: position,
                        current: position,
                        delta: Position::zero(),
                        total: Position::zero(),
                    },
                )
            }
            InputEventKind::PointerMove => match self.drag.as_mut() {
                Some(drag) => {
                    let delta = position.delta_from(&drag.last);
                    drag.last = position;
                    InputResult::action(
                        ActionKind::NavigationDrag,
                        ActionData::Drag {
                            origin: drag.origin,
                            current: position,
                            delta,
                            total: position.delta_from(&drag.origin),
                        },
                    )
                }
                None => InputResult::unhandled(),
            },
            InputEventKind::PointerUp | InputEventKind::PointerLeave => match self.drag.take() {
                Some(drag) => InputResult::action(
                    ActionKind::NavigationDragEnd,
                    ActionData::Drag {
                        origin: drag.origin,
                        current: position,
                        delta: position.delta_from(&drag.last),
                        total: position.delta_from(&drag.origin),
                    },
                ),
                None => InputResult::unhandled(),
            },
            InputEventKind::Wheel => match event.wheel {
                Some(wheel) => InputResult::action(
                    ActionKind::NavigationZoom,
                    ActionData::Zoom {
                        delta: wheel.y,
                        anchor: position,
                    },
                )
                .with_prevent_default(),
                None => InputResult::unhandled(),
            },
            InputEventKind::KeyDown => match self.key_action(event) {
                Some(action) => self.handle_key(action, event),
                None => InputResult::unhandled(),
            },
            InputEventKind::KeyUp | InputEventKind::ContextMenu => InputResult::unhandled(),
        };
        Ok(result)
    }

    fn on_mode_exit(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{RawInput, ScrollDelta, normalize};
    use crate::input::keyboard::KeyCode;
    use crate::input::surface::SurfaceRect;

    const MODE: InteractionMode = InteractionMode::Navigation;

    fn event(raw: RawInput) -> InputEvent {
        normalize(&raw, SurfaceRect::from_size(800.0, 600.0), 0.0).unwrap()
    }

    fn run(handler: &mut NavigationInputHandler, raw: RawInput) -> Option<InputResult> {
        let event = event(raw);
        let context = SceneContext::empty();
        if !handler.can_handle(&event, MODE, &context) {
            return None;
        }
        Some(handler.handle_input(&event, MODE, &context).unwrap())
    }

    fn kind(result: &Option<InputResult>) -> Option<ActionKind> {
        result.as_ref()?.action.as_ref().map(|a| a.kind)
    }

    #[test]
    fn test_drag_sequence() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());

        let start = run(&mut handler, RawInput::pointer_down(100.0, 100.0));
        assert_eq!(kind(&start), Some(ActionKind::NavigationDragStart));

        let drag = run(&mut handler, RawInput::pointer_move(150.0, 120.0)).unwrap();
        match drag.action.unwrap().data {
            ActionData::Drag { delta, total, .. } => {
                assert_eq!(delta, Position::new(50.0, 20.0));
                assert_eq!(total, Position::new(50.0, 20.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }

        let drag = run(&mut handler, RawInput::pointer_move(160.0, 120.0)).unwrap();
        match drag.action.unwrap().data {
            ActionData::Drag { delta, total, .. } => {
                assert_eq!(delta, Position::new(10.0, 0.0));
                assert_eq!(total, Position::new(60.0, 20.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }

        let end = run(&mut handler, RawInput::pointer_up(160.0, 120.0));
        assert_eq!(kind(&end), Some(ActionKind::NavigationDragEnd));
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());
        assert!(run(&mut handler, RawInput::pointer_move(10.0, 10.0)).is_none());
        assert!(run(&mut handler, RawInput::pointer_up(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());
        run(&mut handler, RawInput::pointer_down(100.0, 100.0));
        let end = run(&mut handler, RawInput::pointer_leave(0.0, 100.0));
        assert_eq!(kind(&end), Some(ActionKind::NavigationDragEnd));
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());
        let raw = RawInput::pointer_down(10.0, 10.0).with_button(crate::input::event::MouseButton::Right);
        assert!(run(&mut handler, raw).is_none());
    }

    #[test]
    fn test_wheel_zooms_and_prevents_scroll() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());
        let result = run(&mut handler, RawInput::wheel(400.0, 300.0, ScrollDelta::from_lines(0.0, 2.0))).unwrap();

        assert!(result.prevent_default);
        match result.action.unwrap().data {
            ActionData::Zoom { delta, anchor } => {
                assert_eq!(delta, 2.0);
                assert_eq!(anchor, Position::new(400.0, 300.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }

        assert!(run(&mut handler, RawInput::wheel(0.0, 0.0, ScrollDelta::from_lines(1.0, 0.0))).is_none());
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());

        let left = run(&mut handler, RawInput::key_down(KeyCode::ArrowLeft)).unwrap();
        assert_eq!(
            left.action.unwrap().data,
            ActionData::Rotate {
                delta: Position::new(-24.0, 0.0)
            }
        );

        let zoom_out = run(&mut handler, RawInput::key_down(KeyCode::NumpadSubtract)).unwrap();
        assert!(matches!(zoom_out.action.unwrap().data, ActionData::Zoom { delta, .. } if delta == -1.0));

        assert!(run(&mut handler, RawInput::key_down(KeyCode::Enter)).is_none());
        assert!(run(&mut handler, RawInput::key_up(KeyCode::ArrowLeft)).is_none());
    }

    #[test]
    fn test_mode_exit_clears_drag() {
        let mut handler = NavigationInputHandler::new(&InputConfig::default());
        run(&mut handler, RawInput::pointer_down(100.0, 100.0));
        handler.on_mode_exit();
        assert!(run(&mut handler, RawInput::pointer_move(150.0, 120.0)).is_none());
    }
}
