//! Publishing waypoints to the host's live map.
//!
//! An instance is shown on the map when it is resolved, visible, belongs to
//! the mission, its gating parameter (if any) is complete, and the current
//! view permits the mission's state:
//!
//! | scene            | Active                   | Offered                   |
//! |------------------|--------------------------|---------------------------|
//! | Flight           | always                   | never                     |
//! | Tracking station | if `display_active`      | if `display_offered`      |
//! | Other            | never                    | never                     |

use bevy::log::debug;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::generator::WaypointGenerator;
use crate::instance::{MarkerInstance, PublishState};
use crate::mission::{Mission, MissionId, MissionState};

// ---------------------------------------------------------------------------
// View context
// ---------------------------------------------------------------------------

/// Player-facing display toggles.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Show active missions' waypoints in the tracking station.
    pub display_active: bool,
    /// Show offered missions' waypoints in the tracking station.
    pub display_offered: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            display_active: true,
            display_offered: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewScene {
    Flight,
    TrackingStation,
    #[default]
    Other,
}

/// Where the player currently is, and what they asked to see.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewContext {
    pub scene: ViewScene,
    pub settings: DisplaySettings,
}

impl ViewContext {
    pub fn new(scene: ViewScene, settings: DisplaySettings) -> Self {
        Self { scene, settings }
    }

    /// Whether waypoints of a mission in `state` may be shown right now.
    pub fn permits(&self, state: MissionState) -> bool {
        match (self.scene, state) {
            (ViewScene::Flight, MissionState::Active) => true,
            (ViewScene::TrackingStation, MissionState::Active) => self.settings.display_active,
            (ViewScene::TrackingStation, MissionState::Offered) => self.settings.display_offered,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Live map contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerKey {
    pub mission: MissionId,
    pub index: u32,
}

/// What the map is told about a published waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub key: MarkerKey,
    pub name: String,
    pub body: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub icon: String,
    pub clustered: bool,
    pub seed: u64,
    pub on_surface: bool,
    pub navigable: bool,
}

impl MapMarker {
    fn from_instance(mission: MissionId, wp: &MarkerInstance) -> Self {
        Self {
            key: MarkerKey {
                mission,
                index: wp.index,
            },
            name: wp.name.clone(),
            body: wp.body.clone(),
            latitude: wp.latitude,
            longitude: wp.longitude,
            altitude: wp.altitude,
            icon: wp.icon.clone(),
            clustered: wp.clustered,
            seed: wp.seed,
            on_surface: true,
            navigable: true,
        }
    }
}

/// The host's live map.
pub trait LiveMap {
    fn publish(&mut self, marker: MapMarker);
    fn retract(&mut self, key: MarkerKey);
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// No gating parameter, or the gating parameter is complete.
pub fn gating_satisfied(wp: &MarkerInstance, mission: &Mission) -> bool {
    wp.gating_parameter()
        .map_or(true, |id| mission.is_parameter_complete(id))
}

/// Eligible regardless of where the player is looking.
pub fn is_displayable(wp: &MarkerInstance, mission: &Mission) -> bool {
    wp.is_resolved()
        && wp.visible
        && wp.mission == Some(mission.id)
        && gating_satisfied(wp, mission)
}

pub fn is_eligible(wp: &MarkerInstance, mission: &Mission, view: &ViewContext) -> bool {
    is_displayable(wp, mission) && view.permits(mission.state)
}

// ---------------------------------------------------------------------------
// Publish / retract
// ---------------------------------------------------------------------------

impl WaypointGenerator {
    /// Publishes one instance if it is eligible and not already shown.
    /// Returns whether the map was called.
    pub fn publish(
        &mut self,
        index: u32,
        mission: &Mission,
        view: &ViewContext,
        map: &mut dyn LiveMap,
    ) -> bool {
        let Some(wp) = self.waypoints.get_mut(index as usize) else {
            return false;
        };
        if wp.is_published() || !is_eligible(wp, mission, view) {
            return false;
        }
        map.publish(MapMarker::from_instance(mission.id, wp));
        wp.publish = PublishState::Published;
        true
    }

    /// Removes one instance from the map if it is shown.
    pub fn retract(&mut self, index: u32, map: &mut dyn LiveMap) -> bool {
        let mission = self.mission;
        let Some(wp) = self.waypoints.get_mut(index as usize) else {
            return false;
        };
        if !wp.is_published() {
            return false;
        }
        map.retract(MarkerKey {
            mission,
            index: wp.index,
        });
        wp.publish = PublishState::NotPublished;
        true
    }

    /// Publishes every eligible instance not yet on the map.
    pub fn publish_eligible(
        &mut self,
        mission: &Mission,
        view: &ViewContext,
        map: &mut dyn LiveMap,
    ) -> Vec<u32> {
        let mut published = Vec::new();
        for index in 0..self.waypoints.len() as u32 {
            if self.publish(index, mission, view, map) {
                published.push(index);
            }
        }
        if !published.is_empty() {
            debug!("Published {} waypoints of mission {:?}", published.len(), mission.id);
        }
        published
    }

    pub fn retract_all(&mut self, map: &mut dyn LiveMap) -> Vec<u32> {
        (0..self.waypoints.len() as u32)
            .filter(|&index| self.retract(index, map))
            .collect()
    }

    /// Drops every marker from the map and publishes the eligible ones again
    /// from scratch.
    pub fn republish(
        &mut self,
        mission: &Mission,
        view: &ViewContext,
        map: &mut dyn LiveMap,
    ) -> Vec<u32> {
        self.retract_all(map);
        self.publish_eligible(mission, view, map)
    }

    /// Re-sends instances whose coordinates changed while published.
    pub(crate) fn refresh(
        &mut self,
        indices: &[u32],
        mission: &Mission,
        view: &ViewContext,
        map: &mut dyn LiveMap,
    ) {
        for &index in indices {
            if self.retract(index, map) {
                self.publish(index, mission, view, map);
            }
        }
    }

    /// Whether any instance would be shown somewhere, ignoring the current
    /// scene.
    pub fn any_displayable(&self, mission: &Mission) -> bool {
        self.waypoints.iter().any(|wp| is_displayable(wp, mission))
    }
}
