//! The per-mission waypoint generator.
//!
//! A [`WaypointGenerator`] owns every [`MarkerInstance`] of one mission. It is
//! created from validated definitions when the mission is instantiated and
//! then driven by the host:
//!
//! 1. [`WaypointGenerator::resolve`] places every instance whose inputs are
//!    available and leaves the rest pending. It is idempotent and may be
//!    called any number of times.
//! 2. [`WaypointGenerator::apply_late_correction`] re-places static-site
//!    instances once after the environment reports it is fully loaded.
//!
//! Publishing to the live map is handled in [`crate::visibility`], the
//! mapping from mission triggers onto these calls in [`crate::events`].

mod instantiate;
mod resolve;


pub use resolve::ResolveReport;

use crate::instance::MarkerInstance;
use crate::mission::MissionId;

#[derive(Debug, Clone, PartialEq)]
pub struct WaypointGenerator {
    pub(crate) mission: MissionId,
    pub(crate) seed: u64,
    pub(crate) waypoints: Vec<MarkerInstance>,
    /// The environment-ready signal has been received.
    pub(crate) environment_ready: bool,
    /// Listening for view-filter resets.
    pub(crate) filters_bound: bool,
}

impl WaypointGenerator {
    pub fn mission(&self) -> MissionId {
        self.mission
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn waypoints(&self) -> &[MarkerInstance] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: u32) -> Option<&MarkerInstance> {
        self.waypoints.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Every instance has been placed.
    pub fn is_fully_resolved(&self) -> bool {
        self.waypoints.iter().all(MarkerInstance::is_resolved)
    }

    pub fn environment_ready(&self) -> bool {
        self.environment_ready
    }

    pub fn filters_bound(&self) -> bool {
        self.filters_bound
    }

    pub fn published_count(&self) -> usize {
        self.waypoints.iter().filter(|w| w.is_published()).count()
    }
}
