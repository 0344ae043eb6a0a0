// ---------------------------------------------------------------------------
// Resolution passes and the late static-site correction
// ---------------------------------------------------------------------------

use bevy::log::{debug, warn};

use crate::altitude::{resolve_altitude, AltitudeProfile};
use crate::environment::{CelestialBody, Environment, SurfaceConstraints};
use crate::geodesy::{
    resolve_static_point, sample_near_point, sample_uniform_point, GeoPoint, NearRequest,
};
use crate::instance::{MarkerInstance, PendingReason, Resolution};
use crate::mission_rng::{DrawPurpose, MissionRng};
use crate::template::{NearAnchor, Placement};

use super::WaypointGenerator;

/// What a single [`WaypointGenerator::resolve`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Instances placed by this pass.
    pub resolved: Vec<u32>,
    /// Instances still waiting, with the reason.
    pub pending: Vec<(u32, PendingReason)>,
}

impl ResolveReport {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Coordinates and altitude computed for one instance.
struct Placed {
    body: String,
    point: GeoPoint,
    altitude: f64,
}

fn profile(wp: &MarkerInstance) -> AltitudeProfile {
    AltitudeProfile {
        random: wp.random_altitude,
        underwater: wp.underwater,
        configured: wp.altitude,
    }
}

impl WaypointGenerator {
    /// Places every pending instance whose inputs are available.
    ///
    /// Instances are visited in index order and see the results of earlier
    /// instances in the same pass, so a chain anchored on earlier waypoints
    /// resolves in one call. Unavailable bodies, anchors, crafts or sites are
    /// not errors: the instance stays pending for a later call. Resolved
    /// instances are never touched again, which makes repeated calls
    /// idempotent.
    pub fn resolve(&mut self, env: &dyn Environment) -> ResolveReport {
        let mut report = ResolveReport::default();

        for i in 0..self.waypoints.len() {
            if self.waypoints[i].is_resolved() {
                continue;
            }

            match self.place(i, env) {
                Ok(placed) => {
                    let ready = self.environment_ready;
                    let wp = &mut self.waypoints[i];
                    wp.body = placed.body;
                    wp.latitude = placed.point.latitude;
                    wp.longitude = placed.point.longitude;
                    wp.altitude = placed.altitude;
                    wp.resolution = Resolution::Resolved;
                    wp.frame_corrected = ready;
                    debug!(
                        "Generated waypoint {} ({}) at {}, {} alt {} on {}",
                        wp.index, wp.name, wp.latitude, wp.longitude, wp.altitude, wp.body
                    );
                    report.resolved.push(wp.index);
                }
                Err(reason) => {
                    let wp = &mut self.waypoints[i];
                    wp.resolution = Resolution::Pending(reason);
                    report.pending.push((wp.index, reason));
                }
            }
        }

        report
    }

    fn place(&self, i: usize, env: &dyn Environment) -> Result<Placed, PendingReason> {
        let wp = &self.waypoints[i];
        let mut rng = MissionRng::for_waypoint(self.seed, wp.index, DrawPurpose::Placement);
        let own_body = || env.body(&wp.body).ok_or(PendingReason::BodyUnavailable);

        let (body, body_name, point) = match &wp.placement {
            Placement::Fixed {
                latitude,
                longitude,
            } => (own_body()?, wp.body.clone(), GeoPoint::new(*latitude, *longitude)),
            Placement::RandomUniform {
                water_allowed,
                force_equatorial,
            } => {
                let body = own_body()?;
                let constraints = SurfaceConstraints {
                    water_allowed: *water_allowed,
                    force_equatorial: *force_equatorial,
                };
                let point = sample_uniform_point(env, body, constraints, wp.underwater, &mut rng.0);
                (body, wp.body.clone(), point)
            }
            Placement::Static(_) => {
                let body = own_body()?;
                (body, wp.body.clone(), static_point(wp, body, env)?)
            }
            Placement::RandomNear(near) => {
                // Near placements live on the anchor's body.
                let (body_name, anchor) = match &near.anchor {
                    NearAnchor::Waypoint(a) => {
                        let anchor = self
                            .waypoints
                            .get(*a as usize)
                            .filter(|w| w.is_resolved())
                            .ok_or(PendingReason::AnchorPending)?;
                        (
                            anchor.body.clone(),
                            GeoPoint::new(anchor.latitude, anchor.longitude),
                        )
                    }
                    NearAnchor::Craft(key) => {
                        let fix = env.craft_fix(key).ok_or(PendingReason::CraftUnavailable)?;
                        (fix.body, GeoPoint::new(fix.latitude, fix.longitude))
                    }
                };
                let body = env.body(&body_name).ok_or(PendingReason::BodyUnavailable)?;

                let request = NearRequest {
                    anchor,
                    min_distance: near.min_distance,
                    max_distance: near.max_distance,
                    underwater: wp.underwater,
                    water_allowed: near.water_allowed,
                };
                let sample = sample_near_point(body, &request, &mut rng.0);
                if !sample.validated {
                    warn!(
                        "Waypoint {} ({}): no acceptable point within {}..{} m of {:?} after {} attempts; using last candidate",
                        wp.index, wp.name, near.min_distance, near.max_distance, anchor, sample.attempts
                    );
                }
                (body, body_name, sample.point)
            }
        };

        let altitude = resolve_altitude(&profile(wp), body, point, &mut rng.0);
        Ok(Placed {
            body: body_name,
            point,
            altitude,
        })
    }

    /// Records that the environment is fully loaded and re-places every
    /// resolved static-site instance that has not been corrected yet.
    ///
    /// Each instance is corrected at most once. Returns the indices that
    /// were re-placed so the caller can refresh them on the map.
    pub fn apply_late_correction(&mut self, env: &dyn Environment) -> Vec<u32> {
        self.environment_ready = true;
        let mut corrected = Vec::new();

        for wp in &mut self.waypoints {
            if !wp.is_static() || !wp.is_resolved() || wp.frame_corrected {
                continue;
            }
            let Some(body) = env.body(&wp.body) else {
                continue;
            };
            let Ok(point) = static_point(wp, body, env) else {
                warn!(
                    "Waypoint {} ({}): static site disappeared before late correction",
                    wp.index, wp.name
                );
                continue;
            };

            let mut rng = MissionRng::for_waypoint(wp.seed, wp.index, DrawPurpose::Correction);
            wp.altitude = resolve_altitude(&profile(wp), body, point, &mut rng.0);
            wp.latitude = point.latitude;
            wp.longitude = point.longitude;
            wp.frame_corrected = true;
            debug!(
                "Adjusted static waypoint {} ({}) to {}, {}",
                wp.index, wp.name, wp.latitude, wp.longitude
            );
            corrected.push(wp.index);
        }

        corrected
    }
}

fn static_point(
    wp: &MarkerInstance,
    body: &dyn CelestialBody,
    env: &dyn Environment,
) -> Result<GeoPoint, PendingReason> {
    let Placement::Static(placement) = &wp.placement else {
        return Err(PendingReason::StaticSiteUnavailable);
    };
    let site = env
        .static_site(&wp.body, placement.kind, &placement.site)
        .ok_or(PendingReason::StaticSiteUnavailable)?;
    Ok(resolve_static_point(body, &site, placement.offset))
}
