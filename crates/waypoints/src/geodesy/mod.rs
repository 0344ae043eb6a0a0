//! Coordinate synthesizers.
//!
//! Pure functions that turn a placement request into a geographic point:
//!
//! - [`sample_uniform_point`]: uniform surface point with underwater rejection
//! - [`sample_near_point`]: distance-constrained rejection sampling around an
//!   anchor, with a self-widening search window that always terminates
//! - [`resolve_static_point`]: static location plus a local-frame offset
//!
//! plus the spherical helpers they share. Angles at the API boundary are in
//! degrees, distances in metres.

pub mod near;
pub mod offset;
pub mod uniform;


pub use near::{sample_near_point, search_window, NearRequest, NearSample};
pub use offset::{frame_to_world_offset, resolve_static_point};
pub use uniform::sample_uniform_point;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::POLE_EPSILON;

/// A point on a body's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Wraps a longitude into `[-180, 180)`.
///
/// Longitudes already in range are returned unchanged.
pub fn normalize_longitude(longitude: f64) -> f64 {
    if (-180.0..180.0).contains(&longitude) {
        return longitude;
    }
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance between two points (haversine formula).
pub fn great_circle_distance(a: GeoPoint, b: GeoPoint, radius: f64) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * radius * h.sqrt().min(1.0).asin()
}

/// Point reached by travelling `distance` metres from `origin` along the
/// initial bearing `bearing` (radians, clockwise from north).
///
/// Standing on a pole every bearing is "south", so the longitude is held at
/// the origin's value (wrapped into `[-180, 180)`) instead of being derived
/// from the bearing.
pub fn destination_point(origin: GeoPoint, distance: f64, bearing: f64, radius: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let a = distance / radius;

    let sin_lat2 = lat1.sin() * a.cos() + lat1.cos() * a.sin() * bearing.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    if lat1.cos().abs() < POLE_EPSILON {
        return GeoPoint::new(lat2.to_degrees(), normalize_longitude(origin.longitude));
    }

    let lon2 = lon1
        + (bearing.sin() * a.sin() * lat1.cos()).atan2(a.cos() - lat1.sin() * sin_lat2);
    GeoPoint::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
}
