//! Static locations displaced by an offset in the site's local frame.

use bevy::log::warn;
use bevy::math::DVec3;

use crate::config::DEGENERATE_FRAME_EPSILON;
use crate::environment::{CelestialBody, LocalFrame, StaticSite};

use super::{normalize_longitude, GeoPoint};

/// Converts an offset given in the site's (right, forward, up) frame into a
/// world-space displacement.
///
/// Uses the reciprocal basis of the frame, i.e. the cofactors of the basis
/// matrix divided by its determinant. For an orthonormal frame this equals
/// `right * v.x + forward * v.y + up * v.z`; for a skewed frame it is still
/// well defined as long as the basis spans space. Returns `None` when it
/// does not.
pub fn frame_to_world_offset(frame: &LocalFrame, offset: DVec3) -> Option<DVec3> {
    let i = frame.right;
    let j = frame.forward;
    let k = frame.up;

    let det = i.dot(j.cross(k));
    if !det.is_finite() || det.abs() < DEGENERATE_FRAME_EPSILON {
        return None;
    }

    let world = j.cross(k) * offset.x + k.cross(i) * offset.y + i.cross(j) * offset.z;
    Some(world / det)
}

/// Geographic position of a static site displaced by `offset` metres.
///
/// A zero offset yields the site's registered coordinates exactly, without a
/// round trip through the body's projection. A degenerate frame is logged
/// and also falls back to the registered coordinates. The returned
/// longitude is always in `[-180, 180)`.
pub fn resolve_static_point(body: &dyn CelestialBody, site: &StaticSite, offset: [f64; 3]) -> GeoPoint {
    let registered = GeoPoint::new(site.latitude, normalize_longitude(site.longitude));
    let offset = DVec3::from_array(offset);
    if offset == DVec3::ZERO {
        return registered;
    }

    match frame_to_world_offset(&site.frame, offset) {
        Some(displacement) => {
            let (latitude, longitude) = body.latitude_longitude(site.frame.origin + displacement);
            GeoPoint::new(latitude, normalize_longitude(longitude))
        }
        None => {
            warn!(
                "Static site '{}' on {} has a degenerate local frame; ignoring offset",
                site.name,
                body.name()
            );
            registered
        }
    }
}
