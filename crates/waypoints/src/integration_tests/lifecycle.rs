use crate::environment::SiteKind;
use crate::events::{MissionTrigger, TerminationReason, TriggerContext, TriggerOutcome, ViewFilter};
use crate::generator::WaypointGenerator;
use crate::mission::{Mission, MissionState, ParameterState};
use crate::persistence::SavedGenerator;
use crate::test_harness::{doc, generator, mission, RecordingMap, TestEnvironment};
use crate::visibility::{DisplaySettings, MarkerKey, ViewContext, ViewScene};

/// One mission with everything its generator talks to.
struct Scenario {
    env: TestEnvironment,
    mission: Mission,
    view: ViewContext,
    map: RecordingMap,
    gen: WaypointGenerator,
}

impl Scenario {
    fn new(definitions: &str, env: TestEnvironment, state: MissionState) -> Self {
        let mission = mission(11, 2024, state);
        let gen = generator(&doc(definitions), &mission, &env);
        Self {
            env,
            mission,
            view: ViewContext::new(ViewScene::Flight, DisplaySettings::default()),
            map: RecordingMap::new(),
            gen,
        }
    }

    fn fire(&mut self, trigger: MissionTrigger) -> TriggerOutcome {
        let mut map = self.map.clone();
        let mut ctx = TriggerContext {
            mission: &self.mission,
            env: &self.env,
            view: &self.view,
            map: &mut map,
        };
        self.gen.handle(trigger, &mut ctx)
    }

    fn key(&self, index: u32) -> MarkerKey {
        MarkerKey {
            mission: self.mission.id,
            index,
        }
    }
}

const SURVEY: &str = r#"
    { "type": "Fixed", "icon": "pin", "name": "Base", "latitude": 0.5, "longitude": 20.0 },
    { "type": "RandomNear", "icon": "flag", "nearIndex": 0, "count": 2, "chained": true,
      "minDistance": 500.0, "maxDistance": 1500.0 },
    { "type": "RandomUniform", "icon": "scan", "parameter": "reach_orbit" },
    { "type": "Fixed", "hidden": true, "latitude": 1.0, "longitude": 1.0 }
"#;

// ====================================================================
// Offer, accept, complete
// ====================================================================

#[test]
fn test_offer_accept_complete() {
    let mut s = Scenario::new(SURVEY, TestEnvironment::standard(), MissionState::Generated);

    let out = s.fire(MissionTrigger::Registered);
    assert_eq!(out.resolved, vec![0, 1, 2, 3, 4]);
    assert!(out.published.is_empty());
    assert!(s.gen.filters_bound());

    // Offered missions only show in the tracking station when asked to.
    s.mission.state = MissionState::Offered;
    s.view = ViewContext::new(
        ViewScene::TrackingStation,
        DisplaySettings {
            display_active: true,
            display_offered: true,
        },
    );
    let out = s.fire(MissionTrigger::Offered);
    assert!(out.resolved.is_empty());
    assert_eq!(out.published, vec![0, 1, 2]);
    assert_eq!(s.map.visible_count(), 3);

    s.mission.state = MissionState::Active;
    s.view = ViewContext::new(ViewScene::Flight, DisplaySettings::default());
    let out = s.fire(MissionTrigger::Accepted);
    assert!(out.published.is_empty());

    s.mission
        .set_parameter_state("reach_orbit", ParameterState::Complete);
    let out = s.fire(MissionTrigger::ParameterStateChanged);
    assert_eq!(out.published, vec![3]);
    assert_eq!(s.map.visible_count(), 4);
    let marker = s.map.marker(s.key(0)).expect("base is shown");
    assert_eq!(marker.name, "Base");
    assert_eq!(marker.body, "Kerbin");

    s.mission.state = MissionState::Completed;
    let out = s.fire(MissionTrigger::Terminated(TerminationReason::Completed));
    assert_eq!(out.retracted, vec![0, 1, 2, 3]);
    assert_eq!(s.map.visible_count(), 0);
    assert!(!s.gen.filters_bound());
    assert_eq!(s.gen.published_count(), 0);
}

#[test]
fn test_declined_offer_retracts() {
    let mut s = Scenario::new(SURVEY, TestEnvironment::standard(), MissionState::Offered);
    s.view = ViewContext::new(
        ViewScene::TrackingStation,
        DisplaySettings {
            display_active: true,
            display_offered: true,
        },
    );
    s.fire(MissionTrigger::Registered);
    assert_eq!(s.map.visible_count(), 3);

    s.mission.state = MissionState::Declined;
    s.fire(MissionTrigger::Terminated(TerminationReason::Declined));
    assert_eq!(s.map.visible_count(), 0);
}

// ====================================================================
// View filters
// ====================================================================

#[test]
fn test_filter_reset_republishes() {
    let mut s = Scenario::new(SURVEY, TestEnvironment::standard(), MissionState::Active);
    s.fire(MissionTrigger::Registered);
    assert_eq!(s.map.publishes(), 3);

    let out = s.fire(MissionTrigger::ViewFiltersModified(ViewFilter::Other));
    assert_eq!(out, TriggerOutcome::default());

    let out = s.fire(MissionTrigger::ViewFiltersModified(ViewFilter::None));
    assert_eq!(out.retracted, vec![0, 1, 2]);
    assert_eq!(out.published, vec![0, 1, 2]);
    assert_eq!(s.map.retractions(), 3);
    assert_eq!(s.map.publishes(), 6);
    assert_eq!(s.map.visible_count(), 3);
}

#[test]
fn test_filter_reset_ignored_when_unbound() {
    let mut s = Scenario::new(SURVEY, TestEnvironment::standard(), MissionState::Active);
    s.fire(MissionTrigger::Loaded);
    assert!(!s.gen.filters_bound());
    assert_eq!(s.map.visible_count(), 3);

    let out = s.fire(MissionTrigger::ViewFiltersModified(ViewFilter::None));
    assert_eq!(out, TriggerOutcome::default());
    assert_eq!(s.map.retractions(), 0);
}

#[test]
fn test_nothing_shown_outside_flight_and_tracking() {
    let mut s = Scenario::new(SURVEY, TestEnvironment::standard(), MissionState::Active);
    s.view = ViewContext::default();
    let out = s.fire(MissionTrigger::Registered);
    assert_eq!(out.resolved.len(), 5);
    assert!(out.published.is_empty());
    assert_eq!(s.map.publishes(), 0);
}

// ====================================================================
// Deferred inputs
// ====================================================================

#[test]
fn test_craft_arrival_resolves_on_next_trigger() {
    let defs = r#"
        { "type": "RandomNear", "icon": "pin", "vessel": "lander", "maxDistance": 800.0 },
        { "type": "RandomNear", "icon": "pin", "nearIndex": 0, "maxDistance": 800.0 }
    "#;
    let mut s = Scenario::new(defs, TestEnvironment::standard(), MissionState::Active);

    let out = s.fire(MissionTrigger::Accepted);
    assert!(out.resolved.is_empty());
    assert_eq!(s.map.visible_count(), 0);

    s.env.set_craft("lander", "Mun", -3.0, 40.0);
    let out = s.fire(MissionTrigger::Loaded);
    assert_eq!(out.resolved, vec![0, 1]);
    assert_eq!(out.published, vec![0, 1]);
    let marker = s.map.marker(s.key(1)).expect("follower is shown");
    assert_eq!(marker.body, "Mun");

    // Once placed, the craft moving away changes nothing.
    s.env.set_craft("lander", "Kerbin", 0.0, 0.0);
    let before = s.gen.clone();
    s.fire(MissionTrigger::Loaded);
    assert_eq!(s.gen, before);
}

// ====================================================================
// Environment ready
// ====================================================================

#[test]
fn test_environment_ready_moves_published_static_marker() {
    let env = TestEnvironment::standard().with_city("Kerbin", "Island Airfield", -1.52, 71.9);
    let defs = r#"
        { "type": "StaticCity", "icon": "city", "site": "Island Airfield" },
        { "type": "Fixed", "icon": "pin", "latitude": 0.0, "longitude": 0.0 }
    "#;
    let mut s = Scenario::new(defs, env, MissionState::Active);
    s.fire(MissionTrigger::Registered);
    assert_eq!(s.map.publishes(), 2);

    s.env
        .move_site("Kerbin", SiteKind::City, "Island Airfield", -1.6, 72.1);
    let out = s.fire(MissionTrigger::EnvironmentReady);
    assert_eq!(out.corrected, vec![0]);
    assert!(out.published.is_empty());
    assert_eq!(s.map.retractions(), 1);
    assert_eq!(s.map.publishes(), 3);

    let marker = s.map.marker(s.key(0)).expect("still shown");
    assert_eq!((marker.latitude, marker.longitude), (-1.6, 72.1));

    // A second signal does not correct again.
    s.env
        .move_site("Kerbin", SiteKind::City, "Island Airfield", 10.0, 10.0);
    let out = s.fire(MissionTrigger::EnvironmentReady);
    assert!(out.corrected.is_empty());
    assert_eq!(s.map.publishes(), 3);
}

// ====================================================================
// Save and restore
// ====================================================================

#[test]
fn test_restore_midway_matches_live_state() {
    let mut s = Scenario::new(SURVEY, TestEnvironment::standard(), MissionState::Active);
    s.fire(MissionTrigger::Registered);
    let shown = s.map.visible_keys();

    let bytes = s.gen.to_saved().to_bytes();
    let saved = SavedGenerator::from_bytes(&bytes).expect("decodes");
    let fresh_map = RecordingMap::new();
    let mut handle = fresh_map.clone();
    let restored = WaypointGenerator::restore(saved, &s.mission, &s.env, &s.view, &mut handle)
        .expect("restores");

    assert_eq!(fresh_map.visible_keys(), shown);
    for key in shown {
        assert_eq!(fresh_map.marker(key), s.map.marker(key));
    }
    assert!(restored.filters_bound());
    assert!(restored.is_fully_resolved());
}
