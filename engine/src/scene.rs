//! Scene Context
//!
//! The per-event snapshot of rendering state the input handlers need to
//! interpret an event spatially, and the provider interface the renderer
//! implements to produce it. [`GlobeScene`] is a self-contained provider:
//! an orbit camera around a sphere with marker picking.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraSnapshot, GlobeCamera, Ray, intersect_sphere};
use crate::config::InputConfig;
use crate::geo::GeoCoordinate;
use crate::input::event::{InputEvent, InputEventKind};

/// A marker found under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerHit {
    pub id: String,
    pub point: Vec3,
    pub coordinate: GeoCoordinate,
}

/// Read-only view of the scene for one input event.
///
/// Built fresh before every dispatch. Handlers keep their own cross-event
/// state and never use the context to talk to each other.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SceneContext {
    pub camera: Option<CameraSnapshot>,
    /// Pick ray through the pointer.
    pub ray: Option<Ray>,
    /// Point of the globe under the pointer, `None` when off-globe.
    pub intersection: Option<Vec3>,
    /// Latitude/longitude of `intersection`.
    pub surface: Option<GeoCoordinate>,
    pub marker: Option<MarkerHit>,
    pub zoom_level: f32,
    pub bearing: f32,
}

impl SceneContext {
    /// Context with nothing under the pointer.
    pub fn empty() -> Self {
        Self {
            zoom_level: 1.0,
            ..Self::default()
        }
    }

    /// Put the point `intersection` of a sphere centred at the origin
    /// under the pointer.
    pub fn with_surface_hit(mut self, intersection: Vec3) -> Self {
        self.intersection = Some(intersection);
        self.surface = GeoCoordinate::from_surface_point(intersection);
        self
    }

    /// Put the marker `id` under the pointer, at `point`.
    pub fn with_marker(mut self, id: impl Into<String>, point: Vec3) -> Self {
        if let Some(coordinate) = GeoCoordinate::from_surface_point(point) {
            self.marker = Some(MarkerHit {
                id: id.into(),
                point,
                coordinate,
            });
        }
        self.with_surface_hit(point)
    }

    pub fn is_on_globe(&self) -> bool {
        self.intersection.is_some()
    }
}

/// Supplies scene state for each input event.
///
/// Must answer synchronously and never panic; stale state (one frame
/// behind) is acceptable.
pub trait SceneContextProvider {
    fn scene_context(&self, event: &InputEvent) -> SceneContext;
}

impl<P: SceneContextProvider + ?Sized> SceneContextProvider for Rc<RefCell<P>> {
    fn scene_context(&self, event: &InputEvent) -> SceneContext {
        match self.try_borrow() {
            Ok(scene) => scene.scene_context(event),
            Err(_) => {
                log::warn!("[Scene] Provider is mutably borrowed, dispatching with an empty context");
                SceneContext::empty()
            }
        }
    }
}

/// A marker placed on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerAnchor {
    pub id: String,
    pub coordinate: GeoCoordinate,
}

impl MarkerAnchor {
    pub fn new(id: impl Into<String>, coordinate: GeoCoordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
        }
    }
}

/// Reference scene: a globe of `globe_radius` at the origin, viewed by a
/// [`GlobeCamera`], with point markers.
#[derive(Debug, Clone)]
pub struct GlobeScene {
    camera: GlobeCamera,
    globe_radius: f32,
    earth_radius_km: f64,
    marker_pick_radius_km: f64,
    markers: Vec<MarkerAnchor>,
}

impl GlobeScene {
    /// Unit globe with default picking settings.
    pub fn new(camera: GlobeCamera) -> Self {
        Self::with_config(camera, &InputConfig::default())
    }

    pub fn with_config(camera: GlobeCamera, config: &InputConfig) -> Self {
        Self {
            camera,
            globe_radius: 1.0,
            earth_radius_km: config.earth_radius_km,
            marker_pick_radius_km: config.marker_pick_radius_km,
            markers: Vec::new(),
        }
    }

    pub fn camera(&self) -> &GlobeCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut GlobeCamera {
        &mut self.camera
    }

    pub fn globe_radius(&self) -> f32 {
        self.globe_radius
    }

    pub fn markers(&self) -> &[MarkerAnchor] {
        &self.markers
    }

    pub fn set_markers(&mut self, markers: Vec<MarkerAnchor>) {
        self.markers = markers;
    }

    pub fn add_marker(&mut self, marker: MarkerAnchor) {
        self.markers.push(marker);
    }

    /// Remove a marker by id. Returns whether it existed.
    pub fn remove_marker(&mut self, id: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() != before
    }

    /// Nearest marker within the pick radius of `coordinate`.
    pub fn pick_marker(&self, coordinate: &GeoCoordinate) -> Option<&MarkerAnchor> {
        self.markers
            .iter()
            .map(|m| (m, m.coordinate.haversine_km(coordinate, self.earth_radius_km)))
            .filter(|(_, d)| *d <= self.marker_pick_radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)
    }
}

impl SceneContextProvider for GlobeScene {
    fn scene_context(&self, event: &InputEvent) -> SceneContext {
        let mut context = SceneContext {
            camera: Some(self.camera.snapshot()),
            zoom_level: self.camera.zoom_level(),
            bearing: self.camera.bearing(),
            ..SceneContext::default()
        };

        // Keyboard events have no pointer to cast from
        let positional = event.kind.is_pointer() || event.kind == InputEventKind::Wheel;
        if !positional {
            return context;
        }

        let ray = self.camera.ray(event.normalized);
        context.ray = Some(ray);

        let Some(t) = intersect_sphere(&ray, Vec3::ZERO, self.globe_radius) else {
            return context;
        };
        let point = ray.at(t);
        context.intersection = Some(point);
        context.surface = GeoCoordinate::from_surface_point(point);

        if let Some(coordinate) = context.surface {
            context.marker = self.pick_marker(&coordinate).map(|m| MarkerHit {
                id: m.id.clone(),
                point: m.coordinate.to_surface_point(self.globe_radius),
                coordinate: m.coordinate,
            });
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{RawInput, normalize};
    use crate::input::keyboard::KeyCode;
    use crate::input::surface::SurfaceRect;

    fn event(raw: RawInput) -> InputEvent {
        normalize(&raw, SurfaceRect::from_size(800.0, 600.0), 0.0).unwrap()
    }

    #[test]
    fn test_center_hits_front_of_globe() {
        let scene = GlobeScene::new(GlobeCamera::new(800.0 / 600.0));
        let context = scene.scene_context(&event(RawInput::pointer_move(400.0, 300.0)));

        let hit = context.intersection.unwrap();
        assert!((hit - Vec3::Z).length() < 1e-4);
        let coord = context.surface.unwrap();
        assert!(coord.latitude.abs() < 1e-3 && coord.longitude.abs() < 1e-3);
        assert!(context.marker.is_none());
    }

    #[test]
    fn test_corner_misses_globe() {
        let scene = GlobeScene::new(GlobeCamera::new(800.0 / 600.0));
        let context = scene.scene_context(&event(RawInput::pointer_move(0.0, 0.0)));
        assert!(context.ray.is_some());
        assert!(!context.is_on_globe());
        assert!(context.surface.is_none());
    }

    #[test]
    fn test_key_events_have_no_ray() {
        let scene = GlobeScene::new(GlobeCamera::new(1.0));
        let context = scene.scene_context(&event(RawInput::key_down(KeyCode::Enter)));
        assert!(context.camera.is_some());
        assert!(context.ray.is_none());
    }

    #[test]
    fn test_marker_picking() {
        let mut scene = GlobeScene::new(GlobeCamera::new(800.0 / 600.0));
        scene.add_marker(MarkerAnchor::new("near", GeoCoordinate::new(0.5, 0.5)));
        scene.add_marker(MarkerAnchor::new("far", GeoCoordinate::new(40.0, 40.0)));

        let context = scene.scene_context(&event(RawInput::pointer_move(400.0, 300.0)));
        assert_eq!(context.marker.unwrap().id, "near");

        assert!(scene.remove_marker("near"));
        assert!(!scene.remove_marker("near"));
        let context = scene.scene_context(&event(RawInput::pointer_move(400.0, 300.0)));
        assert!(context.marker.is_none());
    }

    #[test]
    fn test_shared_provider_while_borrowed() {
        let scene = Rc::new(RefCell::new(GlobeScene::new(GlobeCamera::new(1.0))));
        let pointer = event(RawInput::pointer_move(400.0, 300.0));

        assert!(scene.scene_context(&pointer).camera.is_some());

        let _guard = scene.borrow_mut();
        let context = scene.scene_context(&pointer);
        assert_eq!(context, SceneContext::empty());
    }

    #[test]
    fn test_context_builders() {
        let context = SceneContext::empty().with_marker("m1", Vec3::X);
        assert_eq!(context.marker.as_ref().unwrap().id, "m1");
        assert!(context.is_on_globe());
        assert!((context.surface.unwrap().longitude - 90.0).abs() < 1e-4);
    }
}
