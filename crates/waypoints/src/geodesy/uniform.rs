use bevy::log::warn;
use rand::RngCore;

use crate::environment::{CelestialBody, Environment, SurfaceConstraints};

use super::{normalize_longitude, GeoPoint};

/// Uniformly random surface point from the environment's oracle.
///
/// Underwater placements on a body with an ocean keep drawing until the
/// oracle lands below sea level. A body without an ocean has no point that
/// could ever satisfy that, so the first draw is taken and a warning logged.
pub fn sample_uniform_point(
    env: &dyn Environment,
    body: &dyn CelestialBody,
    constraints: SurfaceConstraints,
    underwater: bool,
    rng: &mut dyn RngCore,
) -> GeoPoint {
    let reject_dry = underwater && body.has_ocean();
    if underwater && !body.has_ocean() {
        warn!(
            "Underwater waypoint requested on {}, which has no ocean; placing it anywhere",
            body.name()
        );
    }

    loop {
        let (latitude, longitude) = env.random_surface_point(body, constraints, rng);
        let point = GeoPoint::new(latitude, normalize_longitude(longitude));
        if !reject_dry || body.surface_elevation(point.latitude, point.longitude) < 0.0 {
            return point;
        }
    }
}
