//! Intel placement handler: live preview under the pointer, click to
//! confirm, Escape or leaving the container to cancel.

use glam::Vec3;

use super::click::ClickTracker;
use crate::config::InputConfig;
use crate::geo::GeoCoordinate;
use crate::input::action::{ActionData, ActionKind};
use crate::input::bindings::{GlobeKeyAction, KeyBindings};
use crate::input::event::{InputEvent, InputEventKind, Position};
use crate::input::handler::{HandlerError, InputHandler, InputResult};
use crate::input::mode::InteractionMode;
use crate::scene::SceneContext;

const MODES: &[InteractionMode] = &[InteractionMode::IntelPlacement];

#[derive(Debug, Clone)]
pub struct IntelPlacementInputHandler {
    bindings: KeyBindings,
    clicks: ClickTracker,
    preview: Option<GeoCoordinate>,
}

impl IntelPlacementInputHandler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            bindings: config.bindings.clone(),
            clicks: ClickTracker::new(config),
            preview: None,
        }
    }

    /// Coordinate of the live preview, if one is showing.
    pub fn preview(&self) -> Option<GeoCoordinate> {
        self.preview
    }

    fn is_cancel_key(&self, event: &InputEvent) -> bool {
        event
            .key
            .and_then(|key| self.bindings.get_action(key))
            .is_some_and(|action| action == GlobeKeyAction::Cancel)
    }

    fn placement(
        context: &SceneContext,
        screen: Position,
    ) -> Result<(Vec3, GeoCoordinate, ActionData), HandlerError> {
        let point = context
            .intersection
            .ok_or(HandlerError::MissingContext("globe intersection"))?;
        let coordinate = context
            .surface
            .ok_or(HandlerError::MissingContext("surface coordinates"))?;
        Ok((
            point,
            coordinate,
            ActionData::Placement {
                point,
                coordinate,
                screen,
            },
        ))
    }

    fn cancel(&mut self) -> InputResult {
        self.clicks.reset();
        match self.preview.take() {
            Some(_) => InputResult::action(ActionKind::IntelPlaceCancel, ActionData::None),
            None => InputResult::consumed(),
        }
    }
}

impl InputHandler for IntelPlacementInputHandler {
    fn name(&self) -> &'static str {
        "intel_placement"
    }

    fn supported_modes(&self) -> &[InteractionMode] {
        MODES
    }

    fn can_handle(&self, event: &InputEvent, _mode: InteractionMode, context: &SceneContext) -> bool {
        match event.kind {
            InputEventKind::PointerMove => context.is_on_globe() || self.preview.is_some(),
            InputEventKind::PointerDown => event.is_primary_button() && context.is_on_globe(),
            InputEventKind::PointerUp => self.clicks.is_pressed(),
            InputEventKind::PointerLeave => self.preview.is_some() || self.clicks.is_pressed(),
            InputEventKind::KeyDown => self.preview.is_some() && self.is_cancel_key(event),
            InputEventKind::Wheel | InputEventKind::KeyUp | InputEventKind::ContextMenu => false,
        }
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        _mode: InteractionMode,
        context: &SceneContext,
    ) -> Result<InputResult, HandlerError> {
        match event.kind {
            InputEventKind::PointerMove => {
                if !context.is_on_globe() {
                    // Off the globe there is nothing to preview
                    self.preview = None;
                    return Ok(InputResult::unhandled());
                }
                let (_, coordinate, data) = Self::placement(context, event.position)?;
                self.preview = Some(coordinate);
                Ok(InputResult::action(ActionKind::IntelPlacePreview, data))
            }
            InputEventKind::PointerDown => {
                self.clicks.press(event);
                Ok(InputResult::consumed())
            }
            InputEventKind::PointerUp => {
                if self.clicks.release(event).is_none() || !context.is_on_globe() {
                    return Ok(InputResult::unhandled());
                }
                let (point, coordinate, data) = Self::placement(context, event.position)?;
                log::debug!(
                    "[Placement] Confirmed at ({:.3}, {:.3}) point {:?}",
                    coordinate.latitude,
                    coordinate.longitude,
                    point
                );
                self.preview = None;
                Ok(InputResult::action(ActionKind::IntelPlaceConfirm, data))
            }
            InputEventKind::PointerLeave => Ok(self.cancel()),
            InputEventKind::KeyDown => Ok(self.cancel().with_prevent_default()),
            InputEventKind::Wheel | InputEventKind::KeyUp | InputEventKind::ContextMenu => {
                Ok(InputResult::unhandled())
            }
        }
    }

    fn on_mode_exit(&mut self) {
        self.clicks.reset();
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{RawInput, normalize};
    use crate::input::keyboard::KeyCode;
    use crate::input::surface::SurfaceRect;

    const MODE: InteractionMode = InteractionMode::IntelPlacement;

    fn run(
        handler: &mut IntelPlacementInputHandler,
        raw: RawInput,
        t: f64,
        context: &SceneContext,
    ) -> Option<InputResult> {
        let event = normalize(&raw, SurfaceRect::from_size(800.0, 600.0), t).unwrap();
        if !handler.can_handle(&event, MODE, context) {
            return None;
        }
        Some(handler.handle_input(&event, MODE, context).unwrap())
    }

    fn kind(result: Option<InputResult>) -> Option<ActionKind> {
        result?.action.map(|a| a.kind)
    }

    #[test]
    fn test_preview_then_confirm() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let on_globe = SceneContext::empty().with_surface_hit(Vec3::Z);

        let preview = run(&mut handler, RawInput::pointer_move(400.0, 300.0), 0.0, &on_globe);
        assert_eq!(kind(preview), Some(ActionKind::IntelPlacePreview));
        assert!(handler.preview().is_some());

        let down = run(&mut handler, RawInput::pointer_down(400.0, 300.0), 10.0, &on_globe).unwrap();
        assert!(down.handled && down.action.is_none());

        let confirm = run(&mut handler, RawInput::pointer_up(401.0, 300.0), 20.0, &on_globe).unwrap();
        match confirm.action.unwrap().data {
            ActionData::Placement { point, coordinate, .. } => {
                assert_eq!(point, Vec3::Z);
                assert!(coordinate.latitude.abs() < 1e-6);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert!(handler.preview().is_none());
    }

    #[test]
    fn test_off_globe_is_not_handled() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let off_globe = SceneContext::empty();

        assert!(run(&mut handler, RawInput::pointer_move(0.0, 0.0), 0.0, &off_globe).is_none());
        assert!(run(&mut handler, RawInput::pointer_down(0.0, 0.0), 0.0, &off_globe).is_none());
        assert!(handler.preview().is_none());
    }

    #[test]
    fn test_moving_off_globe_clears_preview() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let on_globe = SceneContext::empty().with_surface_hit(Vec3::Z);

        run(&mut handler, RawInput::pointer_move(400.0, 300.0), 0.0, &on_globe);
        assert!(handler.preview().is_some());

        let off = run(&mut handler, RawInput::pointer_move(0.0, 0.0), 1.0, &SceneContext::empty()).unwrap();
        assert!(!off.handled && off.action.is_none());
        assert!(handler.preview().is_none());

        // Nothing left for Escape to cancel
        assert!(run(&mut handler, RawInput::key_down(KeyCode::Escape), 2.0, &on_globe).is_none());
    }

    #[test]
    fn test_release_off_globe_drops_press() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let on_globe = SceneContext::empty().with_surface_hit(Vec3::Z);
        let off_globe = SceneContext::empty();

        run(&mut handler, RawInput::pointer_down(400.0, 300.0), 0.0, &on_globe);
        let up = run(&mut handler, RawInput::pointer_up(400.0, 300.0), 20.0, &off_globe).unwrap();
        assert!(!up.handled);

        // A press off the globe followed by a release on it confirms nothing
        assert!(run(&mut handler, RawInput::pointer_down(401.0, 300.0), 40.0, &off_globe).is_none());
        assert!(run(&mut handler, RawInput::pointer_up(401.0, 300.0), 60.0, &on_globe).is_none());
    }

    #[test]
    fn test_drag_does_not_confirm() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let on_globe = SceneContext::empty().with_surface_hit(Vec3::Z);

        run(&mut handler, RawInput::pointer_down(400.0, 300.0), 0.0, &on_globe);
        let up = run(&mut handler, RawInput::pointer_up(460.0, 300.0), 10.0, &on_globe).unwrap();
        assert!(!up.handled);
    }

    #[test]
    fn test_escape_and_leave_cancel_preview() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let on_globe = SceneContext::empty().with_surface_hit(Vec3::Z);

        // Escape without a preview is not ours
        assert!(run(&mut handler, RawInput::key_down(KeyCode::Escape), 0.0, &on_globe).is_none());

        run(&mut handler, RawInput::pointer_move(400.0, 300.0), 0.0, &on_globe);
        let cancel = run(&mut handler, RawInput::key_down(KeyCode::Escape), 1.0, &on_globe);
        assert_eq!(kind(cancel), Some(ActionKind::IntelPlaceCancel));

        run(&mut handler, RawInput::pointer_move(400.0, 300.0), 2.0, &on_globe);
        let leave = run(&mut handler, RawInput::pointer_leave(0.0, 300.0), 3.0, &SceneContext::empty());
        assert_eq!(kind(leave), Some(ActionKind::IntelPlaceCancel));
        assert!(handler.preview().is_none());
    }

    #[test]
    fn test_missing_surface_coordinates_is_an_error() {
        let mut handler = IntelPlacementInputHandler::new(&InputConfig::default());
        let mut context = SceneContext::empty();
        context.intersection = Some(Vec3::Z);

        let event = normalize(&RawInput::pointer_move(1.0, 1.0), SurfaceRect::from_size(10.0, 10.0), 0.0).unwrap();
        let err = handler.handle_input(&event, MODE, &context).unwrap_err();
        assert_eq!(err, HandlerError::MissingContext("surface coordinates"));
    }
}
