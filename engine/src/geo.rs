//! Geographic Coordinates
//!
//! Conversion between points on the globe mesh and latitude/longitude, and
//! great-circle distances for the measurement tool.
//!
//! # Coordinate System
//! - Y is up (north pole at +Y)
//! - Latitude 0 / longitude 0 faces +Z
//! - Longitude grows towards +X

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Degrees north of the equator, in [-90, 90].
    pub latitude: f64,
    /// Degrees east of the prime meridian, in (-180, 180].
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Derive coordinates from a point on (or near) a sphere centred at the
    /// origin. Returns `None` for the centre itself or non-finite input.
    pub fn from_surface_point(point: Vec3) -> Option<Self> {
        let p = point.as_dvec3();
        let len = p.length();
        if !len.is_finite() || len < 1e-9 {
            return None;
        }

        let latitude = (p.y / len).clamp(-1.0, 1.0).asin().to_degrees();
        let longitude = p.x.atan2(p.z).to_degrees();
        Some(Self::new(latitude, longitude))
    }

    /// Unit vector pointing at this coordinate.
    pub fn to_unit_vector(&self) -> Vec3 {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(
            (cos_lat * lon.sin()) as f32,
            lat.sin() as f32,
            (cos_lat * lon.cos()) as f32,
        )
    }

    /// Point on a sphere of `radius` centred at the origin.
    pub fn to_surface_point(&self, radius: f32) -> Vec3 {
        self.to_unit_vector() * radius
    }

    /// Great-circle distance to `other` on a sphere of `radius_km`.
    pub fn haversine_km(&self, other: &GeoCoordinate, radius_km: f64) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();
        radius_km * c
    }
}

/// Total great-circle length of a polyline through `points`.
pub fn path_length_km(points: &[GeoCoordinate], radius_km: f64) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].haversine_km(&pair[1], radius_km))
        .sum()
}
