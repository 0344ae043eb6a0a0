//! Distance-constrained rejection sampling around an anchor point.

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::{MAX_NEAR_ATTEMPTS, WINDOW_GROWTH_RATE, WINDOW_GROWTH_START};
use crate::environment::CelestialBody;

use super::{destination_point, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearRequest {
    pub anchor: GeoPoint,
    pub min_distance: f64,
    pub max_distance: f64,
    pub underwater: bool,
    pub water_allowed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearSample {
    pub point: GeoPoint,
    /// Number of candidates drawn, including the returned one.
    pub attempts: u32,
    /// `false` when the attempt budget ran out and `point` is simply the last
    /// candidate drawn.
    pub validated: bool,
}

/// Widening factor applied to the distance range on a given attempt.
///
/// The configured range is used as-is for the first
/// [`WINDOW_GROWTH_START`] attempts; after that the maximum grows and the
/// minimum shrinks linearly so that even an infeasible range eventually
/// covers distances that exist on the body.
pub fn search_window(attempt: u32) -> f64 {
    if attempt < WINDOW_GROWTH_START {
        1.0
    } else {
        WINDOW_GROWTH_RATE * f64::from(attempt - WINDOW_GROWTH_START + 1)
    }
}

/// Draw a point between `min_distance` and `max_distance` from the anchor
/// that satisfies the land/water requirement.
///
/// Never fails: after [`MAX_NEAR_ATTEMPTS`] candidates the last one is
/// returned unvalidated.
pub fn sample_near_point<R: Rng + ?Sized>(
    body: &dyn CelestialBody,
    request: &NearRequest,
    rng: &mut R,
) -> NearSample {
    let radius = body.radius();
    // Without a surface there is no land to insist on.
    let water_allowed = request.water_allowed || !body.has_solid_surface();

    let mut last = request.anchor;
    for attempt in 0..MAX_NEAR_ATTEMPTS {
        let window = search_window(attempt);
        let max = request.max_distance * window;
        let min = request.min_distance / window;

        let distance = min + rng.gen::<f64>() * (max - min);
        let bearing = rng.gen::<f64>() * TAU;

        let candidate = destination_point(request.anchor, distance, bearing, radius);
        last = candidate;

        if accepts(body, request.underwater, water_allowed, candidate) {
            return NearSample {
                point: candidate,
                attempts: attempt + 1,
                validated: true,
            };
        }
    }

    NearSample {
        point: last,
        attempts: MAX_NEAR_ATTEMPTS,
        validated: false,
    }
}

fn accepts(
    body: &dyn CelestialBody,
    underwater: bool,
    water_allowed: bool,
    candidate: GeoPoint,
) -> bool {
    if !body.has_solid_surface() || !body.has_ocean() || (water_allowed && !underwater) {
        return true;
    }
    let elevation = body.surface_elevation(candidate.latitude, candidate.longitude);
    if underwater {
        elevation < 0.0
    } else {
        elevation > 0.0
    }
}
