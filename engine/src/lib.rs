//! Starcom Globe Engine Library
//!
//! Input routing for a 3D operations globe: pointer, wheel and keyboard
//! events on the globe canvas become semantic, mode-dependent actions
//! (camera navigation, intel marker placement and inspection, distance
//! measurement) published to the rest of the application.
//!
//! # Modules
//!
//! - [`input`] - Event normalization, interaction modes, handlers, the manager and the action bus
//! - [`camera`] - Globe orbit camera and raycasting
//! - [`scene`] - Per-event scene context and the reference globe scene
//! - [`geo`] - Latitude/longitude conversion and great-circle distances
//! - [`config`] - Tunable input configuration
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use starcom_globe_engine::input::{ActionKind, CanvasSurface, InteractionMode, RawInput, SurfaceRect};
//! use starcom_globe_engine::{GlobeCamera, GlobeInputManager, GlobeScene, InputConfig};
//!
//! let scene = GlobeScene::new(GlobeCamera::new(1280.0 / 720.0));
//! let mut manager = GlobeInputManager::new(scene, InputConfig::default())?;
//!
//! let canvas = CanvasSurface::shared(SurfaceRect::from_size(1280.0, 720.0));
//! manager.set_container(Some(canvas.clone()));
//!
//! let _placed = manager.on_action(ActionKind::IntelPlaceConfirm, |event| {
//!     println!("marker placed: {}", event.to_json().unwrap_or_default());
//! });
//!
//! manager.set_mode(InteractionMode::IntelPlacement);
//! manager.handle_raw(&RawInput::pointer_down(640.0, 360.0));
//! manager.handle_raw(&RawInput::pointer_up(640.0, 360.0));
//!
//! manager.destroy();
//! assert_eq!(canvas.listener_count(), 0);
//! ```

pub mod camera;
pub mod config;
pub mod geo;
pub mod input;
pub mod scene;

// Re-export the main entry points at crate level for convenience
pub use camera::{GlobeCamera, Ray};
pub use config::{ConfigError, InputConfig};
pub use geo::{EARTH_RADIUS_KM, GeoCoordinate};
pub use input::{ActionEvent, ActionKind, GlobeInputManager, InteractionMode};
pub use scene::{GlobeScene, MarkerAnchor, SceneContext, SceneContextProvider};
