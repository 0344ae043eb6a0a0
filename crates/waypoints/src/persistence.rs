// ---------------------------------------------------------------------------
// Save records for generator state
// ---------------------------------------------------------------------------
//
// A saved generator is self-contained: it can be restored without the
// original definitions. Publish state is never stored; it is recomputed from
// the mission on restore.

use bevy::log::warn;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::RestoreError;
use crate::generator::WaypointGenerator;
use crate::instance::{MarkerInstance, PendingReason, PublishState, Resolution};
use crate::mission::{Mission, MissionId};
use crate::template::{NearAnchor, Placement};
use crate::visibility::{LiveMap, ViewContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SavedWaypoint {
    pub index: u32,
    pub definition: u32,
    pub name: String,
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
    pub count: u32,
    pub placement: Placement,
    pub resolved: bool,
    pub frame_corrected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SavedGenerator {
    pub mission: MissionId,
    pub seed: u64,
    pub environment_ready: bool,
    pub waypoints: Vec<SavedWaypoint>,
}

impl SavedGenerator {
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RestoreError> {
        bitcode::decode(bytes).map_err(|e| {
            warn!(
                "Waypoint generator: failed to decode {} bytes: {}",
                bytes.len(),
                e
            );
            RestoreError::from(e)
        })
    }
}

impl From<&MarkerInstance> for SavedWaypoint {
    fn from(wp: &MarkerInstance) -> Self {
        Self {
            index: wp.index,
            definition: wp.definition,
            name: wp.name.clone(),
            names: wp.names.clone(),
            body: wp.body.clone(),
            latitude: wp.latitude,
            longitude: wp.longitude,
            altitude: wp.altitude,
            random_altitude: wp.random_altitude,
            parameters: wp.parameters.clone(),
            visible: wp.visible,
            icon: wp.icon.clone(),
            underwater: wp.underwater,
            clustered: wp.clustered,
            count: wp.count,
            placement: wp.placement.clone(),
            resolved: wp.is_resolved(),
            frame_corrected: wp.frame_corrected,
        }
    }
}

impl WaypointGenerator {
    pub fn to_saved(&self) -> SavedGenerator {
        SavedGenerator {
            mission: self.mission,
            seed: self.seed,
            environment_ready: self.environment_ready,
            waypoints: self.waypoints.iter().map(SavedWaypoint::from).collect(),
        }
    }

    /// Rebuilds a generator from a save record and publishes whatever the
    /// mission's current state allows.
    ///
    /// Static-site references are looked up again and must still exist.
    pub fn restore(
        saved: SavedGenerator,
        mission: &Mission,
        env: &dyn Environment,
        view: &ViewContext,
        map: &mut dyn LiveMap,
    ) -> Result<Self, RestoreError> {
        let mut waypoints = Vec::with_capacity(saved.waypoints.len());

        for (position, w) in saved.waypoints.into_iter().enumerate() {
            if w.index as usize != position {
                return Err(RestoreError::Decode(format!(
                    "waypoint at position {position} has index {}",
                    w.index
                )));
            }
            match &w.placement {
                Placement::RandomNear(near) => {
                    if let NearAnchor::Waypoint(anchor) = near.anchor {
                        if anchor >= w.index {
                            return Err(RestoreError::AnchorOutOfRange {
                                waypoint: w.index,
                                anchor,
                            });
                        }
                    }
                }
                Placement::Static(site) => {
                    if env.static_site(&w.body, site.kind, &site.site).is_none() {
                        return Err(RestoreError::UnknownStaticSite {
                            waypoint: w.index,
                            site: site.site.clone(),
                            body: w.body.clone(),
                        });
                    }
                }
                Placement::Fixed { .. } | Placement::RandomUniform { .. } => {}
            }

            let resolution = if w.resolved {
                Resolution::Resolved
            } else {
                Resolution::Pending(PendingReason::Unattempted)
            };
            waypoints.push(MarkerInstance {
                index: w.index,
                definition: w.definition,
                name: w.name,
                names: w.names,
                body: w.body,
                latitude: w.latitude,
                longitude: w.longitude,
                altitude: w.altitude,
                random_altitude: w.random_altitude,
                parameters: w.parameters,
                visible: w.visible,
                icon: w.icon,
                underwater: w.underwater,
                clustered: w.clustered,
                count: w.count,
                placement: w.placement,
                seed: saved.seed,
                mission: Some(mission.id),
                resolution,
                publish: PublishState::NotPublished,
                frame_corrected: w.frame_corrected,
            });
        }

        let mut generator = WaypointGenerator {
            mission: mission.id,
            seed: saved.seed,
            waypoints,
            environment_ready: saved.environment_ready,
            filters_bound: false,
        };

        if mission.state.is_live() {
            if generator.any_displayable(mission) {
                generator.filters_bound = true;
            }
            generator.publish_eligible(mission, view, map);
        }

        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::MissionState;
    use crate::test_harness::{doc, generator, mission, RecordingMap, TestEnvironment};
    use crate::visibility::{DisplaySettings, ViewScene};

    const MIXED: &str = r#"
        { "type": "Fixed", "icon": "pin", "latitude": 1.0, "longitude": 2.0, "name": "Home" },
        { "type": "RandomNear", "icon": "flag", "nearIndex": 0, "count": 2, "chained": true,
          "minDistance": 100.0, "maxDistance": 900.0 },
        { "type": "StaticCity", "icon": "city", "site": "Island Airfield", "offset": [5.0, 0.0, 0.0],
          "parameter": "land" },
        { "type": "RandomNear", "icon": "rover", "vessel": "rover", "maxDistance": 500.0 }
    "#;

    fn env() -> TestEnvironment {
        TestEnvironment::standard().with_city("Kerbin", "Island Airfield", -1.52, -71.9)
    }

    fn flight() -> ViewContext {
        ViewContext::new(ViewScene::Flight, DisplaySettings::default())
    }

    #[test]
    fn test_round_trip_reproduces_instances() {
        let env = env();
        let m = mission(3, 99, MissionState::Active);
        let mut gen = generator(&doc(MIXED), &m, &env);
        gen.resolve(&env);
        gen.apply_late_correction(&env);

        let bytes = gen.to_saved().to_bytes();
        let saved = SavedGenerator::from_bytes(&bytes).expect("decodes");
        let mut map = RecordingMap::new();
        let restored = WaypointGenerator::restore(saved, &m, &env, &ViewContext::default(), &mut map)
            .expect("restores");

        assert_eq!(restored.mission(), gen.mission());
        assert_eq!(restored.seed(), gen.seed());
        assert!(restored.environment_ready());
        assert_eq!(restored.len(), gen.len());
        for (a, b) in gen.waypoints().iter().zip(restored.waypoints()) {
            assert_eq!(SavedWaypoint::from(a), SavedWaypoint::from(b));
            assert_eq!(a.is_resolved(), b.is_resolved());
            assert!(!b.is_published());
        }
        // The craft was never available, so the last waypoint stays pending.
        assert_eq!(
            restored.waypoints()[4].pending_reason(),
            Some(PendingReason::Unattempted)
        );
    }

    #[test]
    fn test_publish_state_is_recomputed() {
        let env = env();
        let m = mission(3, 99, MissionState::Active);
        let mut gen = generator(&doc(MIXED), &m, &env);
        gen.resolve(&env);
        let mut map = RecordingMap::new();
        gen.publish_eligible(&m, &flight(), &mut map);
        assert_eq!(gen.published_count(), 3);

        // Restoring into a finished mission publishes nothing.
        let done = mission(3, 99, MissionState::Completed);
        let mut fresh = RecordingMap::new();
        let restored = WaypointGenerator::restore(gen.to_saved(), &done, &env, &flight(), &mut fresh)
            .expect("restores");
        assert_eq!(restored.published_count(), 0);
        assert_eq!(fresh.visible_count(), 0);
        assert!(!restored.filters_bound());

        // Restoring into the active mission publishes the same set again.
        let mut again = RecordingMap::new();
        let restored = WaypointGenerator::restore(gen.to_saved(), &m, &env, &flight(), &mut again)
            .expect("restores");
        assert_eq!(restored.published_count(), 3);
        assert_eq!(again.visible_count(), 3);
        assert!(restored.filters_bound());
    }

    #[test]
    fn test_missing_static_site_fails_restore() {
        let env = env();
        let m = mission(3, 99, MissionState::Active);
        let mut gen = generator(&doc(MIXED), &m, &env);
        gen.resolve(&env);

        let mut map = RecordingMap::new();
        let err = WaypointGenerator::restore(
            gen.to_saved(),
            &m,
            &TestEnvironment::standard(),
            &flight(),
            &mut map,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RestoreError::UnknownStaticSite {
                waypoint: 3,
                site: "Island Airfield".to_string(),
                body: "Kerbin".to_string(),
            }
        );
    }

    #[test]
    fn test_forward_anchor_fails_restore() {
        let env = env();
        let m = mission(3, 99, MissionState::Active);
        let gen = generator(&doc(MIXED), &m, &env);
        let mut saved = gen.to_saved();
        if let Placement::RandomNear(near) = &mut saved.waypoints[1].placement {
            near.anchor = NearAnchor::Waypoint(2);
        }
        let mut map = RecordingMap::new();
        let err = WaypointGenerator::restore(saved, &m, &env, &flight(), &mut map).unwrap_err();
        assert_eq!(
            err,
            RestoreError::AnchorOutOfRange {
                waypoint: 1,
                anchor: 2
            }
        );
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = SavedGenerator::from_bytes(&[]).unwrap_err();
        assert!(matches!(err, RestoreError::Decode(_)));
    }

    #[test]
    fn test_record_is_inspectable_as_json() {
        let env = env();
        let m = mission(3, 99, MissionState::Active);
        let gen = generator(&doc(MIXED), &m, &env);
        let json = serde_json::to_string(&gen.to_saved()).expect("serializes");
        assert!(json.contains("Island Airfield"));
        let back: SavedGenerator = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, gen.to_saved());
    }
}
