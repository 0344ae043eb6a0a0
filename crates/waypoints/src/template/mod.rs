//! Mission-independent waypoint definitions.
//!
//! A definition list is parsed from JSON once per mission type and validated
//! as a whole; any error rejects the entire list. The resulting
//! [`WaypointDefinitions`] are then instantiated per mission by the
//! generator.

mod parse;
mod types;


pub use types::{
    MarkerTemplate, NearAnchor, NearPlacement, Placement, StaticPlacement, WaypointDefinitions,
    WaypointKind,
};
