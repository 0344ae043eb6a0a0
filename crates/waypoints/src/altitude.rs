//! Altitude assignment once coordinates are known.

use rand::Rng;

use crate::environment::CelestialBody;
use crate::geodesy::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeProfile {
    /// No altitude was configured; draw one.
    pub random: bool,
    pub underwater: bool,
    /// Configured altitude, ignored when `random` is set.
    pub configured: f64,
}

/// Altitude for a waypoint placed at `point` on `body`.
///
/// - random, underwater, ocean: uniform between the sea floor and sea level
/// - random, atmosphere: uniform between the surface and the top of the
///   atmosphere
/// - random otherwise: on the surface (0)
/// - configured and underwater: clamped so it never sits below the sea floor
/// - configured otherwise: as configured
pub fn resolve_altitude<R: Rng + ?Sized>(
    profile: &AltitudeProfile,
    body: &dyn CelestialBody,
    point: GeoPoint,
    rng: &mut R,
) -> f64 {
    if profile.random {
        if profile.underwater && body.has_ocean() {
            let floor = body.surface_elevation(point.latitude, point.longitude);
            rng.gen::<f64>() * floor
        } else if let Some(depth) = body.atmosphere_depth() {
            rng.gen::<f64>() * depth
        } else {
            0.0
        }
    } else if profile.underwater {
        let floor = body.surface_elevation(point.latitude, point.longitude);
        profile.configured.max(floor)
    } else {
        profile.configured
    }
}
