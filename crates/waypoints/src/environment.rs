//! Seams to the outside world.
//!
//! The engine never owns physics, terrain or craft state. Everything it needs
//! to know about the universe flows through the traits in this module, which
//! the host implements on top of its own planetary model:
//!
//! - [`CelestialBody`]: radius, terrain height, ocean/atmosphere presence and
//!   the body's world-to-geographic projection.
//! - [`Environment`]: body lookup by name, the uniform surface-point oracle,
//!   the static-location registry and the craft association lookup.

use bevy::math::DVec3;
use bitcode::{Decode, Encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Physical model of a single body, as seen by the placement engine.
pub trait CelestialBody {
    fn name(&self) -> &str;

    /// Mean radius in metres.
    fn radius(&self) -> f64;

    fn has_solid_surface(&self) -> bool;

    fn has_ocean(&self) -> bool;

    /// Height of the atmosphere in metres, `None` for airless bodies.
    fn atmosphere_depth(&self) -> Option<f64>;

    /// Terrain height relative to sea level at the given point (degrees).
    /// Negative values lie below sea level.
    fn surface_elevation(&self, latitude: f64, longitude: f64) -> f64;

    /// Projects a body-relative world position onto (latitude, longitude)
    /// in degrees.
    fn latitude_longitude(&self, position: DVec3) -> (f64, f64);
}

/// Constraints handed to the uniform surface-point oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConstraints {
    pub water_allowed: bool,
    pub force_equatorial: bool,
}

/// Which registry a static location is looked up in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum SiteKind {
    City,
    LaunchSite,
}

/// Local orthonormal frame attached to a static location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// World position of the site, relative to the body centre.
    pub origin: DVec3,
    pub right: DVec3,
    pub forward: DVec3,
    pub up: DVec3,
}

/// A named static location (city, launch site) resolved from the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticSite {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub frame: LocalFrame,
}

/// Current position of a craft associated with a key.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftFix {
    pub body: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything outside the engine that placement depends on.
///
/// All lookups may return `None` while the host is still loading; the
/// generator treats that as "not available yet" and retries on the next pass.
pub trait Environment {
    fn body(&self, name: &str) -> Option<&dyn CelestialBody>;

    /// Uniformly random surface point on `body` as (latitude, longitude).
    fn random_surface_point(
        &self,
        body: &dyn CelestialBody,
        constraints: SurfaceConstraints,
        rng: &mut dyn RngCore,
    ) -> (f64, f64);

    fn static_site(&self, body: &str, kind: SiteKind, name: &str) -> Option<StaticSite>;

    /// Position of the craft currently associated with `key`.
    fn craft_fix(&self, key: &str) -> Option<CraftFix>;
}
