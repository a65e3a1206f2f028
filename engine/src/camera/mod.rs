//! Camera Module
//!
//! Orbit camera and raycasting for the globe view.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod globe_camera;
pub mod raycast;

pub use globe_camera::{CameraSnapshot, GlobeCamera};
pub use raycast::{Ray, RaycastConfig, intersect_sphere, ray_from_ndc};
