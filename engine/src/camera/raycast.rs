//! Pick rays and ray/sphere intersection.
//!
//! Screen points arrive as normalized device coordinates (Y up) and leave
//! as world-space rays; the globe is a sphere, so one quadratic decides
//! what is under the pointer.

use glam::Vec3;
use serde::Serialize;

use super::globe_camera::CameraSnapshot;

/// Hits closer than this to the ray origin are ignored.
const MIN_HIT_DISTANCE: f32 = 0.001;

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Right and up vectors of a view looking along `forward`.
///
/// Uses world X as "right" when `forward` is (nearly) vertical, where the
/// cross product with world up degenerates.
fn view_basis(forward: Vec3) -> (Vec3, Vec3) {
    let right = if forward.y.abs() > 0.99 {
        Vec3::X
    } else {
        forward.cross(Vec3::Y).normalize()
    };
    (right, right.cross(forward).normalize_or_zero())
}

/// Pick ray from `camera_pos` through the screen point `ndc`.
///
/// `ndc` is in [-1, 1] with Y up, `aspect_ratio` is width / height and
/// `fov` the vertical field of view in radians.
pub fn ray_from_ndc(camera_pos: Vec3, camera_target: Vec3, ndc: (f32, f32), aspect_ratio: f32, fov: f32) -> Ray {
    let forward = (camera_target - camera_pos).normalize_or_zero();
    let (right, up) = view_basis(forward);

    let half_height = (fov * 0.5).tan();
    let half_width = half_height * aspect_ratio;
    Ray::new(camera_pos, forward + right * (ndc.0 * half_width) + up * (ndc.1 * half_height))
}

/// Distance along `ray` to the first point of the sphere in front of it.
///
/// From inside the sphere this is the exit point.
pub fn intersect_sphere(ray: &Ray, sphere_center: Vec3, sphere_radius: f32) -> Option<f32> {
    // |o + t d - c|² = r², |d| = 1
    let to_origin = ray.origin - sphere_center;
    let half_b = to_origin.dot(ray.direction);
    let c = to_origin.length_squared() - sphere_radius * sphere_radius;

    let discriminant = half_b * half_b - c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return None;
    }

    let root = discriminant.sqrt();
    [-half_b - root, -half_b + root]
        .into_iter()
        .find(|&t| t > MIN_HIT_DISTANCE)
}

/// Projection parameters shared by every pick ray of one view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastConfig {
    /// Width / height
    pub aspect_ratio: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl RaycastConfig {
    /// Projection of a camera snapshot.
    pub fn from_snapshot(snapshot: &CameraSnapshot) -> Self {
        Self {
            aspect_ratio: snapshot.aspect,
            fov: snapshot.fov,
        }
    }

    pub fn ray(&self, camera_pos: Vec3, camera_target: Vec3, ndc: (f32, f32)) -> Ray {
        ray_from_ndc(camera_pos, camera_target, ndc, self.aspect_ratio, self.fov)
    }
}
