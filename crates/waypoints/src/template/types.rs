use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::environment::SiteKind;

/// The five placement strategies a definition can ask for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum WaypointKind {
    Fixed,
    RandomUniform,
    RandomNear,
    StaticCity,
    StaticLaunchSite,
}

impl WaypointKind {
    /// Accepts the canonical tag and the legacy upper-case names.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Fixed" | "WAYPOINT" => Some(WaypointKind::Fixed),
            "RandomUniform" | "RANDOM_WAYPOINT" => Some(WaypointKind::RandomUniform),
            "RandomNear" | "RANDOM_WAYPOINT_NEAR" => Some(WaypointKind::RandomNear),
            "StaticCity" | "PQS_CITY" => Some(WaypointKind::StaticCity),
            "StaticLaunchSite" | "LAUNCH_SITE" => Some(WaypointKind::StaticLaunchSite),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            WaypointKind::Fixed => "Fixed",
            WaypointKind::RandomUniform => "RandomUniform",
            WaypointKind::RandomNear => "RandomNear",
            WaypointKind::StaticCity => "StaticCity",
            WaypointKind::StaticLaunchSite => "StaticLaunchSite",
        }
    }

    pub fn site_kind(self) -> Option<SiteKind> {
        match self {
            WaypointKind::StaticCity => Some(SiteKind::City),
            WaypointKind::StaticLaunchSite => Some(SiteKind::LaunchSite),
            _ => None,
        }
    }
}

/// What a near-placement is sampled around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum NearAnchor {
    /// Another waypoint. In a template this is a declaration index, in an
    /// instance it is the index of the anchoring instance.
    Waypoint(u32),
    /// Key of a craft association tracked by the host.
    Craft(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct NearPlacement {
    pub anchor: NearAnchor,
    pub min_distance: f64,
    pub max_distance: f64,
    pub water_allowed: bool,
    /// Copies after the first anchor on the copy before them instead of on
    /// `anchor`.
    pub chained: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StaticPlacement {
    pub kind: SiteKind,
    pub site: String,
    /// Displacement in the site's (right, forward, up) frame, metres.
    pub offset: [f64; 3],
}

/// Type-specific half of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum Placement {
    Fixed { latitude: f64, longitude: f64 },
    RandomUniform {
        water_allowed: bool,
        force_equatorial: bool,
    },
    RandomNear(NearPlacement),
    Static(StaticPlacement),
}

impl Placement {
    pub fn kind(&self) -> WaypointKind {
        match self {
            Placement::Fixed { .. } => WaypointKind::Fixed,
            Placement::RandomUniform { .. } => WaypointKind::RandomUniform,
            Placement::RandomNear(_) => WaypointKind::RandomNear,
            Placement::Static(s) => match s.kind {
                SiteKind::City => WaypointKind::StaticCity,
                SiteKind::LaunchSite => WaypointKind::StaticLaunchSite,
            },
        }
    }

    /// Whether random placement may end up in water. Only meaningful for
    /// random types; the others report `true`.
    pub fn water_allowed(&self) -> bool {
        match self {
            Placement::RandomUniform { water_allowed, .. } => *water_allowed,
            Placement::RandomNear(near) => near.water_allowed,
            _ => true,
        }
    }
}

/// A validated, mission-independent waypoint definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerTemplate {
    /// Position in the definition list.
    pub index: u32,
    /// `None` inherits the mission's target body.
    pub body: Option<String>,
    pub names: Vec<String>,
    /// `None` selects random altitude.
    pub altitude: Option<f64>,
    /// Gating parameter ids; only the first one is consulted.
    pub parameters: Vec<String>,
    pub visible: bool,
    pub icon: String,
    pub underwater: bool,
    pub clustered: bool,
    pub count: u32,
    pub placement: Placement,
}

impl MarkerTemplate {
    pub fn kind(&self) -> WaypointKind {
        self.placement.kind()
    }
}

/// An ordered, fully validated list of waypoint definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaypointDefinitions {
    pub(crate) templates: Vec<MarkerTemplate>,
}

impl WaypointDefinitions {
    pub fn templates(&self) -> &[MarkerTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Number of instances a mission built from these definitions will own.
    pub fn instance_count(&self) -> usize {
        self.templates.iter().map(|t| t.count as usize).sum()
    }
}
