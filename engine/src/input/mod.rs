//! Input Module
//!
//! Mode-aware input routing for the globe view. Raw pointer, wheel and
//! keyboard events are normalized into [`InputEvent`]s, offered to the
//! handlers of the current [`InteractionMode`] in priority order, and turned
//! into semantic actions published on the [`ActionBus`].
//!
//! This module is decoupled from any specific windowing system; the
//! [`winit_adapter`] is one way to feed it.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use starcom_globe_engine::input::{ActionKind, CanvasSurface, GlobeInputManager, RawInput, SurfaceRect};
//! use starcom_globe_engine::{GlobeCamera, GlobeScene, InputConfig};
//!
//! let scene = GlobeScene::new(GlobeCamera::new(800.0 / 600.0));
//! let mut manager = GlobeInputManager::new(scene, InputConfig::default())?;
//! manager.set_container(Some(CanvasSurface::shared(SurfaceRect::from_size(800.0, 600.0))));
//!
//! let _sub = manager.on_action(ActionKind::NavigationDrag, |event| {
//!     println!("drag {:?}", event.data);
//! });
//! manager.handle_raw(&RawInput::pointer_down(100.0, 100.0));
//! manager.handle_raw(&RawInput::pointer_move(150.0, 120.0));
//! ```

pub mod action;
pub mod bindings;
pub mod clock;
pub mod event;
pub mod handler;
pub mod handlers;
pub mod keyboard;
pub mod manager;
pub mod mode;
pub mod surface;
pub mod winit_adapter;

// Re-export commonly used types at module level
pub use action::{Action, ActionBus, ActionData, ActionEvent, ActionKind, MeasurementPoint, Subscription};
pub use bindings::{GlobeKeyAction, KeyBindings};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use event::{
    ButtonMask, InputEvent, InputEventKind, MouseButton, PointerType, Position, RawEventType, RawInput,
    ScrollDelta, normalize,
};
pub use handler::{HandlerError, HandlerRegistry, InputHandler, InputResult, RegistrationError};
pub use handlers::{
    ClickTracker, IntelInspectionInputHandler, IntelPlacementInputHandler, MeasurementInputHandler,
    NavigationInputHandler,
};
pub use keyboard::{KeyCode, ModifierState};
pub use manager::{DispatchOutcome, DispatchStatus, GlobeInputManager, GlobeInputManagerBuilder};
pub use mode::{CursorStyle, Gesture, InteractionMode, ModeConfig, ModeRegistry};
pub use surface::{CanvasSurface, InputSurface, ListenerHandle, SurfaceRect};
pub use winit_adapter::WinitInputAdapter;
