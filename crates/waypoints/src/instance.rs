//! Mission-scoped waypoint instances.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::geodesy::GeoPoint;
use crate::mission::MissionId;
use crate::template::{Placement, WaypointKind};

/// Why an instance has not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum PendingReason {
    /// No resolution pass has looked at it yet.
    Unattempted,
    /// The anchor body is not known to the environment.
    BodyUnavailable,
    /// The anchoring waypoint is not resolved yet.
    AnchorPending,
    /// The craft association does not point at a craft right now.
    CraftUnavailable,
    /// The static location is not (or no longer) registered.
    StaticSiteUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum Resolution {
    Pending(PendingReason),
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode)]
pub enum PublishState {
    #[default]
    NotPublished,
    Published,
}

/// One concrete waypoint of one mission.
///
/// Coordinates are only meaningful once `resolution` is
/// [`Resolution::Resolved`]. For near placements `placement` holds the
/// instance-level anchor (after chaining), not the declaration index.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInstance {
    pub index: u32,
    /// Declaration index of the template this instance was copied from.
    pub definition: u32,
    pub name: String,
    /// Configured name list of the template, kept for the save record.
    pub names: Vec<String>,
    pub body: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub random_altitude: bool,
    pub parameters: Vec<String>,
    pub visible: bool,
    pub icon: String,
    pub underwater: bool,
    pub clustered: bool,
    /// Copies produced from the template (`count`).
    pub count: u32,
    pub placement: Placement,
    /// Mission seed the instance's random streams derive from.
    pub seed: u64,
    pub mission: Option<MissionId>,
    pub resolution: Resolution,
    pub publish: PublishState,
    /// Set once the one-shot late correction has been applied (or was not
    /// needed because the instance was resolved after the environment was
    /// ready).
    pub frame_corrected: bool,
}

impl MarkerInstance {
    pub fn is_resolved(&self) -> bool {
        self.resolution == Resolution::Resolved
    }

    pub fn is_published(&self) -> bool {
        self.publish == PublishState::Published
    }

    pub fn pending_reason(&self) -> Option<PendingReason> {
        match self.resolution {
            Resolution::Pending(reason) => Some(reason),
            Resolution::Resolved => None,
        }
    }

    /// The parameter whose completion gates publication, if any.
    pub fn gating_parameter(&self) -> Option<&str> {
        self.parameters.first().map(String::as_str)
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.is_resolved()
            .then(|| GeoPoint::new(self.latitude, self.longitude))
    }

    pub fn kind(&self) -> WaypointKind {
        self.placement.kind()
    }

    pub fn is_static(&self) -> bool {
        matches!(self.placement, Placement::Static(_))
    }

    pub fn water_allowed(&self) -> bool {
        self.placement.water_allowed()
    }
}
