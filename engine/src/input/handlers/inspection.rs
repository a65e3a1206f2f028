//! Intel inspection handler: edge-triggered hover, click to select,
//! double-click to open details.

use super::click::ClickTracker;
use crate::config::InputConfig;
use crate::input::action::{ActionData, ActionKind};
use crate::input::event::{InputEvent, InputEventKind};
use crate::input::handler::{HandlerError, InputHandler, InputResult};
use crate::input::mode::InteractionMode;
use crate::scene::SceneContext;

const MODES: &[InteractionMode] = &[InteractionMode::IntelInspection];

/// Reacts to markers under the pointer.
///
/// Hover actions fire only on change: entering a marker emits
/// `intel_hover_start` once and leaving it for empty globe or space emits
/// `intel_hover_end` once. Moving straight onto another marker emits
/// `intel_hover_start` for the new one, naming the old one in `previous`.
/// A lone click
/// selects immediately; a second click on the same marker inside the
/// double-click window opens its details instead of selecting again.
#[derive(Debug, Clone)]
pub struct IntelInspectionInputHandler {
    clicks: ClickTracker,
    hovered: Option<String>,
    last_selected: Option<String>,
}

impl IntelInspectionInputHandler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            clicks: ClickTracker::new(config),
            hovered: None,
            last_selected: None,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    fn hover(&mut self, event: &InputEvent, context: &SceneContext) -> InputResult {
        match (self.hovered.take(), context.marker.as_ref()) {
            (Some(current), Some(marker)) if current == marker.id => {
                self.hovered = Some(current);
                InputResult::consumed()
            }
            (previous, Some(marker)) => {
                self.hovered = Some(marker.id.clone());
                InputResult::action(
                    ActionKind::IntelHoverStart,
                    ActionData::Marker {
                        marker_id: marker.id.clone(),
                        coordinate: Some(marker.coordinate),
                        screen: event.position,
                        previous,
                    },
                )
            }
            (Some(marker_id), None) => InputResult::action(
                ActionKind::IntelHoverEnd,
                ActionData::Marker {
                    marker_id,
                    coordinate: None,
                    screen: event.position,
                    previous: None,
                },
            ),
            (None, None) => InputResult::unhandled(),
        }
    }

    fn click(&mut self, event: &InputEvent, context: &SceneContext) -> InputResult {
        // The press is consumed even when the release lands off the marker
        let Some(click) = self.clicks.release(event) else {
            return InputResult::unhandled();
        };
        let Some(marker) = context.marker.as_ref() else {
            return InputResult::unhandled();
        };

        let repeat = self.last_selected.as_deref() == Some(marker.id.as_str());
        let kind = if click.is_double() && repeat {
            ActionKind::IntelOpenDetails
        } else {
            ActionKind::IntelSelect
        };
        self.last_selected = Some(marker.id.clone());

        InputResult::action(
            kind,
            ActionData::Marker {
                marker_id: marker.id.clone(),
                coordinate: Some(marker.coordinate),
                screen: event.position,
                previous: None,
            },
        )
    }
}

impl InputHandler for IntelInspectionInputHandler {
    fn name(&self) -> &'static str {
        "intel_inspection"
    }

    fn supported_modes(&self) -> &[InteractionMode] {
        MODES
    }

    fn can_handle(&self, event: &InputEvent, _mode: InteractionMode, context: &SceneContext) -> bool {
        match event.kind {
            InputEventKind::PointerMove => context.marker.is_some() || self.hovered.is_some(),
            InputEventKind::PointerDown => event.is_primary_button() && context.marker.is_some(),
            InputEventKind::PointerUp => self.clicks.is_pressed(),
            InputEventKind::PointerLeave => self.hovered.is_some() || self.clicks.is_pressed(),
            InputEventKind::Wheel
            | InputEventKind::KeyDown
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
            InputEventKind::PointerMove => Ok(self.hover(event, context)),
            InputEventKind::PointerDown => {
                self.clicks.press(event);
                Ok(InputResult::consumed())
            }
            InputEventKind::PointerUp => Ok(self.click(event, context)),
            InputEventKind::PointerLeave => {
                self.clicks.cancel_press();
                // Leaving the container ends any hover
                let result = self.hover(event, &SceneContext::empty());
                Ok(if result.handled { result } else { InputResult::consumed() })
            }
            InputEventKind::Wheel
            | InputEventKind::KeyDown
            | InputEventKind::KeyUp
            | InputEventKind::ContextMenu => Ok(InputResult::unhandled()),
        }
    }

    fn on_mode_exit(&mut self) {
        self.clicks.reset();
        self.hovered = None;
        self.last_selected = None;
    }
}
