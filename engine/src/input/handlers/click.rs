//! Click and double-click recognition from press/release pairs.
//!
//! Double-clicks are detected by comparing event timestamps, never with
//! timers, so the result is the same however late the events are processed.

use crate::config::InputConfig;
use crate::input::event::{InputEvent, Position};

/// A recognised click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: Position,
    pub timestamp_ms: f64,
    /// 1 for a single click, 2 for the second click of a double-click.
    pub count: u8,
}

impl Click {
    pub fn is_double(&self) -> bool {
        self.count >= 2
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    position: Position,
}

/// Turns pointerdown/pointerup pairs into clicks.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    tolerance_px: f32,
    double_click_ms: f64,
    double_click_distance_px: f32,
    press: Option<Press>,
    last_click: Option<Click>,
}

impl ClickTracker {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            tolerance_px: config.click_tolerance_px,
            double_click_ms: config.double_click_ms,
            double_click_distance_px: config.double_click_distance_px,
            press: None,
            last_click: None,
        }
    }

    /// Record a primary-button press.
    pub fn press(&mut self, event: &InputEvent) {
        self.press = Some(Press {
            position: event.position,
        });
    }

    /// Whether a press is waiting for its release.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Complete a press. Returns the click if the pointer stayed within the
    /// tolerance; a release without a press is ignored.
    pub fn release(&mut self, event: &InputEvent) -> Option<Click> {
        let press = self.press.take()?;
        if press.position.distance(&event.position) > self.tolerance_px {
            return None;
        }

        let count = match self.last_click {
            Some(last)
                if event.timestamp_ms - last.timestamp_ms <= self.double_click_ms
                    && last.position.distance(&event.position) <= self.double_click_distance_px =>
            {
                2
            }
            _ => 1,
        };

        let click = Click {
            position: event.position,
            timestamp_ms: event.timestamp_ms,
            count,
        };
        // A double-click consumes the pair; a third click starts over
        self.last_click = if count == 1 { Some(click) } else { None };
        Some(click)
    }

    /// Abandon the pending press (pointer left the container).
    pub fn cancel_press(&mut self) {
        self.press = None;
    }

    pub fn reset(&mut self) {
        self.press = None;
        self.last_click = None;
    }
}
