//! Action Bus
//!
//! Semantic actions emitted by the input handlers and the synchronous
//! publish/subscribe bus that delivers them to the rest of the application.
//!
//! Subscribers run in subscription order, inside the call that dispatched
//! the triggering input event. A subscriber that panics is logged and
//! skipped; the remaining subscribers still receive the event.

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use glam::Vec3;
use serde::Serialize;

use super::event::Position;
use super::mode::InteractionMode;
use crate::geo::GeoCoordinate;

/// Tag of a semantic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    NavigationDragStart,
    NavigationDrag,
    NavigationDragEnd,
    NavigationZoom,
    NavigationRotate,
    IntelPlacePreview,
    IntelPlaceConfirm,
    IntelPlaceCancel,
    IntelHoverStart,
    IntelHoverEnd,
    IntelSelect,
    IntelOpenDetails,
    MeasurementUpdate,
    MeasurementComplete,
    MeasurementCancel,
    ModeChanged,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::NavigationDragStart => "navigation_drag_start",
            ActionKind::NavigationDrag => "navigation_drag",
            ActionKind::NavigationDragEnd => "navigation_drag_end",
            ActionKind::NavigationZoom => "navigation_zoom",
            ActionKind::NavigationRotate => "navigation_rotate",
            ActionKind::IntelPlacePreview => "intel_place_preview",
            ActionKind::IntelPlaceConfirm => "intel_place_confirm",
            ActionKind::IntelPlaceCancel => "intel_place_cancel",
            ActionKind::IntelHoverStart => "intel_hover_start",
            ActionKind::IntelHoverEnd => "intel_hover_end",
            ActionKind::IntelSelect => "intel_select",
            ActionKind::IntelOpenDetails => "intel_open_details",
            ActionKind::MeasurementUpdate => "measurement_update",
            ActionKind::MeasurementComplete => "measurement_complete",
            ActionKind::MeasurementCancel => "measurement_cancel",
            ActionKind::ModeChanged => "mode_changed",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accumulated measurement point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementPoint {
    pub coordinate: GeoCoordinate,
    pub point: Vec3,
}

/// Typed action payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionData {
    None,
    /// Pointer drag in container pixels.
    Drag {
        origin: Position,
        current: Position,
        /// Movement since the previous drag event.
        delta: Position,
        /// Movement since the drag started.
        total: Position,
    },
    /// Zoom in wheel lines; positive zooms in.
    Zoom { delta: f32, anchor: Position },
    /// Keyboard rotation as a pixel-equivalent drag delta.
    Rotate { delta: Position },
    /// Candidate or confirmed marker position.
    Placement {
        point: Vec3,
        coordinate: GeoCoordinate,
        screen: Position,
    },
    /// Marker under the pointer.
    Marker {
        marker_id: String,
        coordinate: Option<GeoCoordinate>,
        screen: Position,
        /// Marker the hover moved off of, when it went straight from one to the next.
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<String>,
    },
    Measurement {
        points: Vec<MeasurementPoint>,
        total_distance_km: f64,
        last_segment_km: f64,
    },
    ModeChange {
        from: InteractionMode,
        to: InteractionMode,
    },
}

/// An action as produced by a handler, before it is stamped for the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub data: ActionData,
}

impl Action {
    pub fn new(kind: ActionKind, data: ActionData) -> Self {
        Self { kind, data }
    }
}

/// An emitted action, as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionEvent {
    pub action: ActionKind,
    pub data: ActionData,
    pub timestamp_ms: f64,
    /// Mode active when the action was emitted.
    pub mode: InteractionMode,
}

impl ActionEvent {
    /// Render as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

type Callback = Rc<RefCell<dyn FnMut(&ActionEvent)>>;

struct Subscriber {
    id: u64,
    filter: Option<ActionKind>,
    callback: Callback,
}

#[derive(Default)]
struct BusInner {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl BusInner {
    fn contains(&self, id: u64) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }
}

/// Synchronous, single-threaded action bus.
#[derive(Default)]
pub struct ActionBus {
    inner: Rc<RefCell<BusInner>>,
}

impl ActionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one action kind, or to every kind when `filter` is `None`.
    pub fn subscribe<F>(&self, filter: Option<ActionKind>, callback: F) -> Subscription
    where
        F: FnMut(&ActionEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            filter,
            callback: Rc::new(RefCell::new(callback)),
        });

        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every matching subscriber. Returns how many ran.
    pub fn emit(&self, event: &ActionEvent) -> usize {
        // Snapshot so callbacks may subscribe or unsubscribe while we iterate
        let targets: Vec<(u64, Callback)> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.filter.is_none_or(|kind| kind == event.action))
            .map(|s| (s.id, Rc::clone(&s.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in targets {
            if !self.inner.borrow().contains(id) {
                continue;
            }

            let Ok(mut callback) = callback.try_borrow_mut() else {
                log::warn!(
                    "[ActionBus] Subscriber {} re-entered while handling '{}', skipped",
                    id,
                    event.action
                );
                continue;
            };

            match catch_unwind(AssertUnwindSafe(|| (&mut *callback)(event))) {
                Ok(()) => delivered += 1,
                Err(_) => log::error!(
                    "[ActionBus] Subscriber {} panicked while handling '{}'",
                    id,
                    event.action
                ),
            }
        }
        delivered
    }

    /// Drop every subscriber. Outstanding [`Subscription`]s become inert.
    pub fn clear(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Handle returned by a subscription; call [`Subscription::unsubscribe`] to
/// stop receiving actions. Dropping the handle keeps the subscription alive.
#[derive(Debug)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// A subscription that is not attached to any bus.
    pub fn inert() -> Self {
        Self {
            id: 0,
            bus: Weak::new(),
        }
    }

    /// Remove the subscriber. Safe after the bus is gone or cleared.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.borrow_mut().subscribers.retain(|s| s.id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|inner| inner.borrow().contains(self.id))
    }
}
