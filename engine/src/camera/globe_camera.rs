//! Globe Camera
//!
//! A spherical-coordinate orbit camera around the globe centre. It is the
//! main consumer of navigation actions: drags and arrow keys rotate it,
//! wheel and +/- zoom it.

use glam::Vec3;
use serde::Serialize;

use super::raycast::{Ray, RaycastConfig};
use crate::input::action::{ActionData, ActionEvent, ActionKind};
use crate::input::event::Position;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default distance from the globe centre, in globe radii.
const DEFAULT_DISTANCE: f32 = 3.0;
/// Default vertical field of view in degrees.
const DEFAULT_FOV: f32 = 45.0;

/// Closest approach to the centre (must stay outside the unit globe).
const MIN_DISTANCE: f32 = 1.2;
/// Furthest zoom distance.
const MAX_DISTANCE: f32 = 12.0;

/// Elevation limits in degrees (prevent flipping over the poles).
const MIN_ELEVATION: f32 = -85.0;
const MAX_ELEVATION: f32 = 85.0;

/// Orbit sensitivity at the default distance: degrees per pixel.
const ORBIT_SENSITIVITY: f32 = 0.25;
/// Exponential zoom factor per wheel line.
const ZOOM_FACTOR: f32 = 0.1;

/// Camera state handed to input handlers with each event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    /// Compass bearing of the view in degrees, 0 = north up.
    pub heading: f32,
}

/// An orbit camera looking at the globe centre.
///
/// # Coordinate System
/// - Azimuth: horizontal angle in degrees, 0 looks at longitude 0 (+Z)
/// - Elevation: vertical angle in degrees, clamped to [-85, 85]
/// - Distance: from the globe centre, clamped to [1.2, 12] globe radii
/// - Y is up
#[derive(Debug, Clone)]
pub struct GlobeCamera {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    /// Rotation of the view around its forward axis in degrees.
    pub heading: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for GlobeCamera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl GlobeCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: DEFAULT_DISTANCE,
            heading: 0.0,
            fov: DEFAULT_FOV,
            aspect,
        }
    }

    /// Compute the eye position from spherical coordinates.
    pub fn eye_position(&self) -> Vec3 {
        let azim_rad = self.azimuth.to_radians();
        let elev_rad = self.elevation.to_radians();

        let cos_elev = elev_rad.cos();
        Vec3::new(
            self.distance * cos_elev * azim_rad.sin(),
            self.distance * elev_rad.sin(),
            self.distance * cos_elev * azim_rad.cos(),
        )
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.eye_position(),
            target: Vec3::ZERO,
            fov: self.fov.to_radians(),
            aspect: self.aspect,
            heading: self.bearing(),
        }
    }

    /// Pick ray through `ndc`, accounting for the view heading.
    pub fn ray(&self, ndc: Position) -> Ray {
        let snapshot = self.snapshot();
        let (sin_h, cos_h) = self.heading.to_radians().sin_cos();
        let rotated = (ndc.x * cos_h - ndc.y * sin_h, ndc.x * sin_h + ndc.y * cos_h);
        RaycastConfig::from_snapshot(&snapshot).ray(snapshot.position, snapshot.target, rotated)
    }

    /// Rotate the globe by a pointer delta in pixels.
    ///
    /// Dragging right spins the globe eastwards under the pointer; dragging
    /// down brings the northern hemisphere into view. Sensitivity scales
    /// with distance so close-up drags stay precise.
    pub fn rotate(&mut self, delta: Position) {
        let sensitivity = ORBIT_SENSITIVITY * (self.distance - 1.0) / (DEFAULT_DISTANCE - 1.0);
        self.azimuth = (self.azimuth - delta.x * sensitivity).rem_euclid(360.0);
        self.elevation = (self.elevation + delta.y * sensitivity).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }

    /// Zoom by a wheel delta in lines; positive zooms in.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (-delta * ZOOM_FACTOR).exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// 1.0 at the default distance, larger when closer.
    pub fn zoom_level(&self) -> f32 {
        DEFAULT_DISTANCE / self.distance
    }

    /// View heading normalized to [0, 360).
    pub fn bearing(&self) -> f32 {
        self.heading.rem_euclid(360.0)
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Apply a navigation action. Returns whether the camera changed.
    pub fn apply_action(&mut self, event: &ActionEvent) -> bool {
        match (event.action, &event.data) {
            (ActionKind::NavigationDrag, ActionData::Drag { delta, .. })
            | (ActionKind::NavigationRotate, ActionData::Rotate { delta }) => {
                self.rotate(*delta);
                true
            }
            (ActionKind::NavigationZoom, ActionData::Zoom { delta, .. }) => {
                self.zoom(*delta);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::mode::InteractionMode;

    fn action(kind: ActionKind, data: ActionData) -> ActionEvent {
        ActionEvent {
            action: kind,
            data,
            timestamp_ms: 0.0,
            mode: InteractionMode::Navigation,
        }
    }

    #[test]
    fn test_default_eye_faces_origin_longitude() {
        let camera = GlobeCamera::new(1.0);
        assert!((camera.eye_position() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
        assert!((camera.zoom_level() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_clamps_elevation() {
        let mut camera = GlobeCamera::new(1.0);
        camera.rotate(Position::new(0.0, 10_000.0));
        assert_eq!(camera.elevation, MAX_ELEVATION);
        camera.rotate(Position::new(100.0, 0.0));
        assert!(camera.azimuth >= 0.0 && camera.azimuth < 360.0);
    }

    #[test]
    fn test_zoom_in_and_clamp() {
        let mut camera = GlobeCamera::new(1.0);
        camera.zoom(1.0);
        assert!(camera.distance < DEFAULT_DISTANCE);
        assert!(camera.zoom_level() > 1.0);

        camera.zoom(-1000.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
        camera.zoom(1000.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
    }

    #[test]
    fn test_heading_rotates_pick_ray() {
        let mut camera = GlobeCamera::new(1.0);
        let up = camera.ray(Position::new(0.0, 0.5));
        assert!(up.direction.y > 0.0);

        camera.heading = 180.0;
        let flipped = camera.ray(Position::new(0.0, 0.5));
        assert!(flipped.direction.y < 0.0);
        assert!((camera.bearing() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_pick_ray_uses_view_projection() {
        let mut camera = GlobeCamera::new(2.0);
        camera.fov = 30.0;
        let ray = camera.ray(Position::new(1.0, 0.0));

        // Right screen edge sits half the horizontal field of view off-axis
        let half_width = (15.0_f32.to_radians()).tan() * 2.0;
        let expected = half_width.atan();
        let angle = ray.direction.angle_between(-camera.eye_position().normalize());
        assert!((angle - expected).abs() < 1e-4);
    }

    #[test]
    fn test_apply_navigation_actions() {
        let mut camera = GlobeCamera::new(1.0);

        let drag = action(
            ActionKind::NavigationDrag,
            ActionData::Drag {
                origin: Position::zero(),
                current: Position::new(40.0, 0.0),
                delta: Position::new(40.0, 0.0),
                total: Position::new(40.0, 0.0),
            },
        );
        assert!(camera.apply_action(&drag));
        assert!((camera.azimuth - 350.0).abs() < 1e-3);

        let zoom = action(
            ActionKind::NavigationZoom,
            ActionData::Zoom {
                delta: 1.0,
                anchor: Position::zero(),
            },
        );
        assert!(camera.apply_action(&zoom));
        assert!(camera.distance < DEFAULT_DISTANCE);

        assert!(!camera.apply_action(&action(ActionKind::IntelSelect, ActionData::None)));
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut camera = GlobeCamera::new(1.0);
        camera.resize(800, 600);
        assert!((camera.aspect - 4.0 / 3.0).abs() < 1e-6);
        camera.resize(0, 600);
        assert!((camera.aspect - 4.0 / 3.0).abs() < 1e-6);
    }
}
