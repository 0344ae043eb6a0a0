//! # Test fixtures for the waypoint engine
//!
//! Provides a spherical body with a trivially predictable terrain model, a
//! builder for an [`Environment`] holding bodies, static sites and crafts,
//! and a [`LiveMap`] that records what was published so tests can assert on
//! it after the map has been moved into a bevy resource.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use bevy::math::DVec3;
use rand::{Rng, RngCore};

use crate::environment::{
    CelestialBody, CraftFix, Environment, LocalFrame, SiteKind, StaticSite, SurfaceConstraints,
};
use crate::generator::WaypointGenerator;
use crate::mission::{Mission, MissionId, MissionState};
use crate::template::WaypointDefinitions;
use crate::visibility::{LiveMap, MapMarker, MarkerKey};

/// Draws made by the land-only oracle before it gives up and returns the last
/// candidate. Keeps a fixture with no land at all from hanging a test.
const ORACLE_MAX_DRAWS: u32 = 1_000;

// ---------------------------------------------------------------------------
// SphereBody
// ---------------------------------------------------------------------------

/// Terrain height model of a [`SphereBody`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terrain {
    /// The same elevation everywhere.
    Flat(f64),
    /// Western hemisphere (longitude < 0) is sea floor, eastern is land.
    Hemispheres { sea_floor: f64, land: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SphereBody {
    pub name: String,
    pub radius: f64,
    pub solid: bool,
    pub ocean: bool,
    pub atmosphere: Option<f64>,
    pub terrain: Terrain,
}

impl SphereBody {
    pub fn new(name: &str, radius: f64) -> Self {
        Self {
            name: name.to_string(),
            radius,
            solid: true,
            ocean: false,
            atmosphere: None,
            terrain: Terrain::Flat(100.0),
        }
    }

    pub fn with_ocean(mut self, sea_floor: f64, land: f64) -> Self {
        self.ocean = true;
        self.terrain = Terrain::Hemispheres { sea_floor, land };
        self
    }

    pub fn with_atmosphere(mut self, depth: f64) -> Self {
        self.atmosphere = Some(depth);
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn gaseous(mut self) -> Self {
        self.solid = false;
        self
    }

    /// Body-relative world position of a surface point. Z is the rotation
    /// axis, longitude 0 lies on +X.
    pub fn position_of(&self, latitude: f64, longitude: f64) -> DVec3 {
        let (lat, lon) = (latitude.to_radians(), longitude.to_radians());
        DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()) * self.radius
    }

    /// East/north/up frame at a surface point.
    pub fn surface_frame(&self, latitude: f64, longitude: f64) -> LocalFrame {
        let (lat, lon) = (latitude.to_radians(), longitude.to_radians());
        LocalFrame {
            origin: self.position_of(latitude, longitude),
            right: DVec3::new(-lon.sin(), lon.cos(), 0.0),
            forward: DVec3::new(-lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos()),
            up: DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()),
        }
    }
}

impl CelestialBody for SphereBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn has_solid_surface(&self) -> bool {
        self.solid
    }

    fn has_ocean(&self) -> bool {
        self.ocean
    }

    fn atmosphere_depth(&self) -> Option<f64> {
        self.atmosphere
    }

    fn surface_elevation(&self, _latitude: f64, longitude: f64) -> f64 {
        match self.terrain {
            Terrain::Flat(h) => h,
            Terrain::Hemispheres { sea_floor, land } => {
                if longitude < 0.0 {
                    sea_floor
                } else {
                    land
                }
            }
        }
    }

    fn latitude_longitude(&self, position: DVec3) -> (f64, f64) {
        let r = position.length();
        if r == 0.0 {
            return (0.0, 0.0);
        }
        let latitude = (position.z / r).clamp(-1.0, 1.0).asin().to_degrees();
        let longitude = position.y.atan2(position.x).to_degrees();
        (latitude, longitude)
    }
}

/// Ocean world with an atmosphere. West is sea, east is land.
pub fn kerbin() -> SphereBody {
    SphereBody::new("Kerbin", 600_000.0)
        .with_ocean(-800.0, 250.0)
        .with_atmosphere(70_000.0)
}

/// Airless, dry moon.
pub fn mun() -> SphereBody {
    SphereBody::new("Mun", 200_000.0).with_terrain(Terrain::Flat(1_200.0))
}

/// Gas giant: no solid surface.
pub fn jool() -> SphereBody {
    SphereBody::new("Jool", 6_000_000.0)
        .with_atmosphere(200_000.0)
        .gaseous()
}

// ---------------------------------------------------------------------------
// TestEnvironment
// ---------------------------------------------------------------------------

type SiteKey = (String, SiteKind, String);

/// In-memory [`Environment`] assembled with builder methods.
#[derive(Debug, Clone, Default)]
pub struct TestEnvironment {
    bodies: Vec<SphereBody>,
    sites: BTreeMap<SiteKey, StaticSite>,
    crafts: BTreeMap<String, CraftFix>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kerbin, Mun and Jool.
    pub fn standard() -> Self {
        Self::new()
            .with_body(kerbin())
            .with_body(mun())
            .with_body(jool())
    }

    pub fn with_body(mut self, body: SphereBody) -> Self {
        self.bodies.retain(|b| b.name != body.name);
        self.bodies.push(body);
        self
    }

    pub fn remove_body(&mut self, name: &str) -> Option<SphereBody> {
        let pos = self.bodies.iter().position(|b| b.name == name)?;
        Some(self.bodies.remove(pos))
    }

    pub fn with_city(self, body: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        self.with_site(body, SiteKind::City, name, latitude, longitude)
    }

    pub fn with_launch_site(self, body: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        self.with_site(body, SiteKind::LaunchSite, name, latitude, longitude)
    }

    /// Registers a site with an east/north/up frame. The body must already
    /// have been added.
    pub fn with_site(
        mut self,
        body: &str,
        kind: SiteKind,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        let frame = self
            .sphere(body)
            .map(|b| b.surface_frame(latitude, longitude))
            .unwrap_or(LocalFrame {
                origin: DVec3::ZERO,
                right: DVec3::X,
                forward: DVec3::Y,
                up: DVec3::Z,
            });
        self.insert_site(
            body,
            kind,
            StaticSite {
                name: name.to_string(),
                latitude,
                longitude,
                frame,
            },
        );
        self
    }

    pub fn insert_site(&mut self, body: &str, kind: SiteKind, site: StaticSite) {
        self.sites
            .insert((body.to_string(), kind, site.name.clone()), site);
    }

    /// Moves a registered site, as happens when the host finishes loading
    /// terrain and snaps sites onto it.
    pub fn move_site(&mut self, body: &str, kind: SiteKind, name: &str, latitude: f64, longitude: f64) {
        let frame = self.sphere(body).map(|b| b.surface_frame(latitude, longitude));
        if let Some(site) = self
            .sites
            .get_mut(&(body.to_string(), kind, name.to_string()))
        {
            site.latitude = latitude;
            site.longitude = longitude;
            if let Some(frame) = frame {
                site.frame = frame;
            }
        }
    }

    pub fn with_craft(mut self, key: &str, body: &str, latitude: f64, longitude: f64) -> Self {
        self.set_craft(key, body, latitude, longitude);
        self
    }

    pub fn set_craft(&mut self, key: &str, body: &str, latitude: f64, longitude: f64) {
        self.crafts.insert(
            key.to_string(),
            CraftFix {
                body: body.to_string(),
                latitude,
                longitude,
            },
        );
    }

    pub fn remove_craft(&mut self, key: &str) {
        self.crafts.remove(key);
    }

    pub fn sphere(&self, name: &str) -> Option<&SphereBody> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

impl Environment for TestEnvironment {
    fn body(&self, name: &str) -> Option<&dyn CelestialBody> {
        self.sphere(name).map(|b| b as &dyn CelestialBody)
    }

    fn random_surface_point(
        &self,
        body: &dyn CelestialBody,
        constraints: SurfaceConstraints,
        rng: &mut dyn RngCore,
    ) -> (f64, f64) {
        let mut point = (0.0, 0.0);
        for _ in 0..ORACLE_MAX_DRAWS {
            let latitude = if constraints.force_equatorial {
                0.0
            } else {
                (2.0 * rng.gen::<f64>() - 1.0).asin().to_degrees()
            };
            let longitude = rng.gen::<f64>() * 360.0 - 180.0;
            point = (latitude, longitude);

            let dry = body.surface_elevation(latitude, longitude) > 0.0;
            if constraints.water_allowed || !body.has_ocean() || dry {
                break;
            }
        }
        point
    }

    fn static_site(&self, body: &str, kind: SiteKind, name: &str) -> Option<StaticSite> {
        self.sites
            .get(&(body.to_string(), kind, name.to_string()))
            .cloned()
    }

    fn craft_fix(&self, key: &str) -> Option<CraftFix> {
        self.crafts.get(key).cloned()
    }
}

// ---------------------------------------------------------------------------
// RecordingMap
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MapLog {
    pub visible: BTreeMap<MarkerKey, MapMarker>,
    pub publishes: u32,
    pub retractions: u32,
}

/// [`LiveMap`] that keeps every call in a shared log. Clones share the log,
/// so a test can keep one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    log: Arc<Mutex<MapLog>>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut MapLog) -> T) -> T {
        let mut guard = self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn visible_keys(&self) -> Vec<MarkerKey> {
        self.with_log(|log| log.visible.keys().copied().collect())
    }

    pub fn visible_count(&self) -> usize {
        self.with_log(|log| log.visible.len())
    }

    pub fn marker(&self, key: MarkerKey) -> Option<MapMarker> {
        self.with_log(|log| log.visible.get(&key).cloned())
    }

    pub fn publishes(&self) -> u32 {
        self.with_log(|log| log.publishes)
    }

    pub fn retractions(&self) -> u32 {
        self.with_log(|log| log.retractions)
    }
}

impl LiveMap for RecordingMap {
    fn publish(&mut self, marker: MapMarker) {
        self.with_log(|log| {
            log.publishes += 1;
            log.visible.insert(marker.key, marker);
        });
    }

    fn retract(&mut self, key: MarkerKey) {
        self.with_log(|log| {
            log.retractions += 1;
            log.visible.remove(&key);
        });
    }
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// A mission targeting Kerbin in the given state.
pub fn mission(id: u64, seed: u64, state: MissionState) -> Mission {
    Mission::new(MissionId(id), seed)
        .with_target_body("Kerbin")
        .with_state(state)
}

pub fn active_mission(id: u64, seed: u64) -> Mission {
    mission(id, seed, MissionState::Active)
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Wraps definition objects into a document: `doc(r#"{...}, {...}"#)`.
pub fn doc(definitions: &str) -> String {
    format!(r#"{{ "waypoints": [ {definitions} ] }}"#)
}

/// Parses `json` and instantiates it for `mission`. Panics on invalid input.
pub fn generator(json: &str, mission: &Mission, env: &TestEnvironment) -> WaypointGenerator {
    let definitions = WaypointDefinitions::from_json(json, env).expect("definitions should parse");
    WaypointGenerator::instantiate(&definitions, mission, env).expect("definitions should instantiate")
}
