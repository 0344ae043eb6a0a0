//! Procedural waypoint placement for generated missions.
//!
//! A mission type declares its waypoints once as JSON definitions. For every
//! mission instance a [`WaypointGenerator`] duplicates those definitions into
//! concrete markers, places them on a celestial body (fixed coordinates,
//! uniform random, random near another waypoint or craft, or relative to a
//! static site) and publishes the visible ones to the host's live map as the
//! mission moves through its lifecycle.
//!
//! All randomness derives from the mission seed, so a generator rebuilt from
//! the same definitions and seed places every waypoint identically.

pub mod altitude;
pub mod config;
pub mod environment;
pub mod error;
pub mod events;
pub mod generator;
pub mod geodesy;
pub mod instance;
pub mod mission;
pub mod mission_rng;
pub mod persistence;
pub mod plugin;
pub mod site_names;
pub mod template;
pub mod visibility;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use environment::{CelestialBody, CraftFix, Environment, LocalFrame, SiteKind, StaticSite};
pub use error::{DefinitionError, DefinitionErrors, RestoreError};
pub use events::{MissionTrigger, TerminationReason, TriggerContext, TriggerOutcome, ViewFilter};
pub use generator::{ResolveReport, WaypointGenerator};
pub use instance::{MarkerInstance, PendingReason};
pub use mission::{Mission, MissionId, MissionState, ParameterState};
pub use persistence::{SavedGenerator, SavedWaypoint};
pub use plugin::{MissionBoard, MissionEntry, MissionTriggerEvent, WaypointPlugin};
pub use template::WaypointDefinitions;
pub use visibility::{DisplaySettings, LiveMap, MapMarker, MarkerKey, ViewContext, ViewScene};
