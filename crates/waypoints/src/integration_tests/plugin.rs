use bevy::prelude::*;

use crate::events::{MissionTrigger, TerminationReason};
use crate::mission::{MissionId, MissionState};
use crate::plugin::{
    MissionBoard, MissionTriggerEvent, WaypointEnvironment, WaypointMap, WaypointPlugin,
    WaypointsUpdated,
};
use crate::test_harness::{doc, generator, mission, RecordingMap, TestEnvironment};
use crate::visibility::{DisplaySettings, ViewContext, ViewScene};

const DEFS: &str = r#"
    { "type": "Fixed", "icon": "pin", "latitude": 3.0, "longitude": 4.0 },
    { "type": "RandomNear", "icon": "pin", "nearIndex": 0, "maxDistance": 1000.0 }
"#;

fn app_with_mission(state: MissionState) -> (App, RecordingMap) {
    let env = TestEnvironment::standard();
    let map = RecordingMap::new();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(WaypointPlugin);
    app.insert_resource(WaypointEnvironment(Box::new(env.clone())));
    app.insert_resource(WaypointMap(Box::new(map.clone())));
    app.world_mut().resource_mut::<ViewContext>().scene = ViewScene::Flight;

    let m = mission(7, 31, state);
    let gen = generator(&doc(DEFS), &m, &env);
    app.world_mut().resource_mut::<MissionBoard>().insert(m, gen);
    (app, map)
}

fn send(app: &mut App, trigger: MissionTrigger) {
    app.world_mut().send_event(MissionTriggerEvent {
        mission: MissionId(7),
        trigger,
    });
    app.update();
}

fn updates(app: &App) -> Vec<WaypointsUpdated> {
    app.world()
        .resource::<Events<WaypointsUpdated>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

#[test]
fn test_plugin_registers_resources() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(WaypointPlugin);
    app.update();

    assert!(app.world().get_resource::<MissionBoard>().is_some());
    assert!(app.world().get_resource::<ViewContext>().is_some());
    assert_eq!(
        *app.world().resource::<DisplaySettings>(),
        DisplaySettings::default()
    );
}

#[test]
fn test_registered_trigger_publishes_through_resource_map() {
    let (mut app, map) = app_with_mission(MissionState::Active);
    send(&mut app, MissionTrigger::Registered);

    assert_eq!(map.visible_count(), 2);
    let board = app.world().resource::<MissionBoard>();
    let entry = board.get(MissionId(7)).expect("mission tracked");
    assert!(entry.generator.is_fully_resolved());
    assert!(entry.generator.filters_bound());

    let updates = updates(&app);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].outcome.published, vec![0, 1]);
}

#[test]
fn test_display_settings_flow_into_view() {
    let (mut app, map) = app_with_mission(MissionState::Offered);
    app.world_mut().resource_mut::<ViewContext>().scene = ViewScene::TrackingStation;
    send(&mut app, MissionTrigger::Offered);
    assert_eq!(map.visible_count(), 0);

    app.world_mut()
        .resource_mut::<DisplaySettings>()
        .display_offered = true;
    send(&mut app, MissionTrigger::Offered);
    assert!(app.world().resource::<ViewContext>().settings.display_offered);
    assert_eq!(map.visible_count(), 2);
}

#[test]
fn test_unregistered_mission_leaves_board() {
    let (mut app, map) = app_with_mission(MissionState::Active);
    send(&mut app, MissionTrigger::Registered);
    assert_eq!(map.visible_count(), 2);

    send(&mut app, MissionTrigger::Unregistered);
    assert_eq!(map.visible_count(), 0);
    assert!(app.world().resource::<MissionBoard>().is_empty());
}

#[test]
fn test_terminated_mission_stays_on_board() {
    let (mut app, map) = app_with_mission(MissionState::Active);
    send(&mut app, MissionTrigger::Registered);

    app.world_mut()
        .resource_mut::<MissionBoard>()
        .get_mut(MissionId(7))
        .expect("tracked")
        .mission
        .state = MissionState::Failed;
    send(&mut app, MissionTrigger::Terminated(TerminationReason::Failed));

    assert_eq!(map.visible_count(), 0);
    assert_eq!(app.world().resource::<MissionBoard>().len(), 1);
}

#[test]
fn test_unknown_mission_is_ignored() {
    let (mut app, map) = app_with_mission(MissionState::Active);
    app.world_mut().send_event(MissionTriggerEvent {
        mission: MissionId(999),
        trigger: MissionTrigger::Registered,
    });
    app.update();
    assert_eq!(map.publishes(), 0);
    assert!(updates(&app).is_empty());
}

#[test]
fn test_triggers_without_environment_are_dropped() {
    let (mut app, map) = app_with_mission(MissionState::Active);
    app.world_mut().remove_resource::<WaypointEnvironment>();
    send(&mut app, MissionTrigger::Registered);
    assert_eq!(map.publishes(), 0);

    // Reinstalling the environment does not replay the dropped trigger.
    app.insert_resource(WaypointEnvironment(Box::new(TestEnvironment::standard())));
    app.update();
    assert_eq!(map.publishes(), 0);
    let board = app.world().resource::<MissionBoard>();
    assert!(!board.get(MissionId(7)).expect("tracked").generator.is_fully_resolved());
}
