//! Measurement handler: click surface points to build a path and report
//! its great-circle length.

use super::click::ClickTracker;
use crate::config::InputConfig;
use crate::geo::{GeoCoordinate, path_length_km};
use crate::input::action::{ActionData, ActionKind, MeasurementPoint};
use crate::input::bindings::{GlobeKeyAction, KeyBindings};
use crate::input::event::{InputEvent, InputEventKind};
use crate::input::handler::{HandlerError, InputHandler, InputResult};
use crate::input::mode::InteractionMode;
use crate::scene::SceneContext;

const MODES: &[InteractionMode] = &[InteractionMode::Measurement];

/// Accumulates clicked surface points.
///
/// Every single click adds a point and emits `measurement_update`. The
/// second click of a double-click, or the confirm key, emits
/// `measurement_complete` with the final path and clears it.
#[derive(Debug, Clone)]
pub struct MeasurementInputHandler {
    bindings: KeyBindings,
    clicks: ClickTracker,
    earth_radius_km: f64,
    points: Vec<MeasurementPoint>,
}

impl MeasurementInputHandler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            bindings: config.bindings.clone(),
            clicks: ClickTracker::new(config),
            earth_radius_km: config.earth_radius_km,
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    fn key_action(&self, event: &InputEvent) -> Option<GlobeKeyAction> {
        self.bindings.get_action(event.key?).filter(|action| {
            matches!(
                action,
                GlobeKeyAction::Confirm | GlobeKeyAction::Cancel | GlobeKeyAction::Undo
            )
        })
    }

    /// Payload describing `points`.
    fn summary(&self, points: Vec<MeasurementPoint>) -> ActionData {
        let coordinates: Vec<GeoCoordinate> = points.iter().map(|p| p.coordinate).collect();
        let total_distance_km = path_length_km(&coordinates, self.earth_radius_km);
        let last_segment_km = match coordinates.as_slice() {
            [.., a, b] => a.haversine_km(b, self.earth_radius_km),
            _ => 0.0,
        };

        ActionData::Measurement {
            points,
            total_distance_km,
            last_segment_km,
        }
    }

    fn update(&self) -> InputResult {
        InputResult::action(ActionKind::MeasurementUpdate, self.summary(self.points.clone()))
    }

    fn complete(&mut self) -> InputResult {
        let points = std::mem::take(&mut self.points);
        log::debug!("[Measurement] Completed with {} points", points.len());
        InputResult::action(ActionKind::MeasurementComplete, self.summary(points))
    }

    fn add_point(&mut self, context: &SceneContext) -> Result<InputResult, HandlerError> {
        let point = context
            .intersection
            .ok_or(HandlerError::MissingContext("globe intersection"))?;
        let coordinate = context
            .surface
            .ok_or(HandlerError::MissingContext("surface coordinates"))?;

        self.points.push(MeasurementPoint { coordinate, point });
        Ok(self.update())
    }
}

impl InputHandler for MeasurementInputHandler {
    fn name(&self) -> &'static str {
        "measurement"
    }

    fn supported_modes(&self) -> &[InteractionMode] {
        MODES
    }

    fn can_handle(&self, event: &InputEvent, _mode: InteractionMode, context: &SceneContext) -> bool {
        match event.kind {
            InputEventKind::PointerDown => event.is_primary_button() && context.is_on_globe(),
            InputEventKind::PointerUp => self.clicks.is_pressed(),
            InputEventKind::PointerLeave => self.clicks.is_pressed(),
            InputEventKind::KeyDown => !self.points.is_empty() && self.key_action(event).is_some(),
            InputEventKind::PointerMove
            | InputEventKind::Wheel
            | InputEventKind::KeyUp
            | InputEventKind::ContextMenu => false,
        }
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        _mode: InteractionMode,
        context: &SceneContext,
    ) -> Result<InputResult, HandlerError> {
        match event.kind {
            InputEventKind::PointerDown => {
                self.clicks.press(event);
                Ok(InputResult::consumed())
            }
            InputEventKind::PointerUp => match self.clicks.release(event) {
                Some(_) if !context.is_on_globe() => Ok(InputResult::unhandled()),
                Some(click) if click.is_double() && !self.points.is_empty() => Ok(self.complete()),
                Some(_) => self.add_point(context),
                None => Ok(InputResult::unhandled()),
            },
            InputEventKind::PointerLeave => {
                self.clicks.cancel_press();
                Ok(InputResult::consumed())
            }
            InputEventKind::KeyDown => {
                let result = match self.key_action(event) {
                    Some(_) if self.points.is_empty() => InputResult::unhandled(),
                    Some(GlobeKeyAction::Confirm) => self.complete(),
                    Some(GlobeKeyAction::Cancel) => {
                        self.points.clear();
                        self.clicks.reset();
                        InputResult::action(ActionKind::MeasurementCancel, ActionData::None)
                    }
                    Some(GlobeKeyAction::Undo) => {
                        self.points.pop();
                        self.update()
                    }
                    _ => return Ok(InputResult::unhandled()),
                };
                Ok(result.with_prevent_default())
            }
            InputEventKind::PointerMove
            | InputEventKind::Wheel
            | InputEventKind::KeyUp
            | InputEventKind::ContextMenu => Ok(InputResult::unhandled()),
        }
    }

    fn on_mode_exit(&mut self) {
        self.clicks.reset();
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{RawInput, normalize};
    use crate::input::keyboard::KeyCode;
    use crate::input::surface::SurfaceRect;
    use glam::Vec3;

    const MODE: InteractionMode = InteractionMode::Measurement;

    fn run(
        handler: &mut MeasurementInputHandler,
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

    fn click(
        handler: &mut MeasurementInputHandler,
        x: f32,
        y: f32,
        t: f64,
        context: &SceneContext,
    ) -> Option<InputResult> {
        run(handler, RawInput::pointer_down(x, y), t, context);
        run(handler, RawInput::pointer_up(x, y), t + 10.0, context)
    }

    fn measurement(result: Option<InputResult>) -> (ActionKind, usize, f64) {
        let action = result.and_then(|r| r.action).expect("expected an action");
        match action.data {
            ActionData::Measurement {
                points,
                total_distance_km,
                ..
            } => (action.kind, points.len(), total_distance_km),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    fn hit(lat: f64, lon: f64) -> SceneContext {
        SceneContext::empty().with_surface_hit(GeoCoordinate::new(lat, lon).to_unit_vector())
    }

    #[test]
    fn test_points_accumulate_with_distance() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());

        let (kind, len, total) = measurement(click(&mut handler, 100.0, 100.0, 0.0, &hit(0.0, 0.0)));
        assert_eq!((kind, len), (ActionKind::MeasurementUpdate, 1));
        assert_eq!(total, 0.0);

        let (_, len, total) = measurement(click(&mut handler, 200.0, 100.0, 1000.0, &hit(0.0, 90.0)));
        assert_eq!(len, 2);
        let quarter = std::f64::consts::PI * 6371.0 / 2.0;
        assert!((total - quarter).abs() < 1.0);
    }

    #[test]
    fn test_double_click_completes_and_clears() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());
        let context = hit(10.0, 10.0);

        click(&mut handler, 100.0, 100.0, 0.0, &context);
        click(&mut handler, 300.0, 100.0, 1000.0, &context);

        // First click of the pair adds a point, the second completes
        let (kind, len, _) = measurement(click(&mut handler, 200.0, 200.0, 2000.0, &context));
        assert_eq!((kind, len), (ActionKind::MeasurementUpdate, 3));
        let (kind, len, _) = measurement(click(&mut handler, 200.0, 200.0, 2100.0, &context));
        assert_eq!((kind, len), (ActionKind::MeasurementComplete, 3));
        assert!(handler.points().is_empty());
    }

    #[test]
    fn test_off_globe_clicks_are_ignored() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());
        assert!(click(&mut handler, 0.0, 0.0, 0.0, &SceneContext::empty()).is_none());
        assert!(handler.points().is_empty());
    }

    #[test]
    fn test_release_off_globe_drops_press() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());
        let context = hit(0.0, 0.0);
        let off_globe = SceneContext::empty();

        run(&mut handler, RawInput::pointer_down(100.0, 100.0), 0.0, &context);
        let up = run(&mut handler, RawInput::pointer_up(100.0, 100.0), 10.0, &off_globe).unwrap();
        assert!(!up.handled);

        assert!(run(&mut handler, RawInput::pointer_down(102.0, 100.0), 20.0, &off_globe).is_none());
        assert!(run(&mut handler, RawInput::pointer_up(102.0, 100.0), 30.0, &context).is_none());
        assert!(handler.points().is_empty());
    }

    #[test]
    fn test_keyboard_undo_confirm_cancel() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());
        let context = hit(0.0, 0.0);

        // Nothing to act on yet
        assert!(run(&mut handler, RawInput::key_down(KeyCode::Enter), 0.0, &context).is_none());

        click(&mut handler, 100.0, 100.0, 0.0, &context);
        click(&mut handler, 300.0, 100.0, 1000.0, &context);

        let (kind, len, _) = measurement(run(&mut handler, RawInput::key_down(KeyCode::Backspace), 1100.0, &context));
        assert_eq!((kind, len), (ActionKind::MeasurementUpdate, 1));

        let (kind, len, _) = measurement(run(&mut handler, RawInput::key_down(KeyCode::Enter), 1200.0, &context));
        assert_eq!((kind, len), (ActionKind::MeasurementComplete, 1));

        click(&mut handler, 100.0, 100.0, 3000.0, &context);
        let cancel = run(&mut handler, RawInput::key_down(KeyCode::Escape), 3100.0, &context).unwrap();
        assert_eq!(cancel.action.unwrap().kind, ActionKind::MeasurementCancel);
        assert!(handler.points().is_empty());
    }

    #[test]
    fn test_missing_coordinates_is_an_error() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());
        let mut context = SceneContext::empty();
        context.intersection = Some(Vec3::Z);

        run(&mut handler, RawInput::pointer_down(1.0, 1.0), 0.0, &context);
        let event = normalize(&RawInput::pointer_up(1.0, 1.0), SurfaceRect::from_size(800.0, 600.0), 5.0).unwrap();
        assert!(handler.handle_input(&event, MODE, &context).is_err());
        assert!(handler.points().is_empty());
    }

    #[test]
    fn test_mode_exit_clears_points() {
        let mut handler = MeasurementInputHandler::new(&InputConfig::default());
        click(&mut handler, 100.0, 100.0, 0.0, &hit(0.0, 0.0));
        handler.on_mode_exit();
        assert!(handler.points().is_empty());
    }
}
