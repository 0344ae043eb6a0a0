use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::environment::Environment;
use crate::events::{MissionTrigger, TriggerContext, TriggerOutcome};
use crate::generator::WaypointGenerator;
use crate::mission::{Mission, MissionId};
use crate::visibility::{DisplaySettings, LiveMap, ViewContext};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A mission together with the generator that owns its waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionEntry {
    pub mission: Mission,
    pub generator: WaypointGenerator,
}

/// Every mission the engine currently tracks, keyed by id.
///
/// The host updates `MissionEntry::mission` (state, parameter completion)
/// before sending the trigger that reports the change.
#[derive(Resource, Debug, Default)]
pub struct MissionBoard {
    entries: BTreeMap<MissionId, MissionEntry>,
}

impl MissionBoard {
    pub fn insert(&mut self, mission: Mission, generator: WaypointGenerator) -> Option<MissionEntry> {
        self.entries
            .insert(mission.id, MissionEntry { mission, generator })
    }

    pub fn get(&self, id: MissionId) -> Option<&MissionEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: MissionId) -> Option<&mut MissionEntry> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: MissionId) -> Option<MissionEntry> {
        self.entries.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissionEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The host's planetary model.
#[derive(Resource)]
pub struct WaypointEnvironment(pub Box<dyn Environment + Send + Sync>);

/// The host's live map.
#[derive(Resource)]
pub struct WaypointMap(pub Box<dyn LiveMap + Send + Sync>);

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Sent by the host whenever something happens to a tracked mission.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionTriggerEvent {
    pub mission: MissionId,
    pub trigger: MissionTrigger,
}

/// Sent after a trigger has been handled.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct WaypointsUpdated {
    pub mission: MissionId,
    pub trigger: MissionTrigger,
    pub outcome: TriggerOutcome,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Routes each trigger to its mission's generator. Unregistered missions
/// are dropped from the board once their markers are retracted.
fn dispatch_mission_triggers(
    mut triggers: EventReader<MissionTriggerEvent>,
    mut board: ResMut<MissionBoard>,
    view: Res<ViewContext>,
    env: Option<Res<WaypointEnvironment>>,
    map: Option<ResMut<WaypointMap>>,
    mut updated: EventWriter<WaypointsUpdated>,
) {
    let (Some(env), Some(mut map)) = (env, map) else {
        if !triggers.is_empty() {
            warn!(
                "Waypoints: {} mission triggers dropped, environment or map not installed",
                triggers.len()
            );
            triggers.clear();
        }
        return;
    };

    for ev in triggers.read() {
        let Some(entry) = board.get_mut(ev.mission) else {
            warn!("Waypoints: trigger {:?} for unknown mission {:?}", ev.trigger, ev.mission);
            continue;
        };

        let MissionEntry { mission, generator } = entry;
        let mut ctx = TriggerContext {
            mission,
            env: &*env.0,
            view: &view,
            map: &mut *map.0,
        };
        let outcome = generator.handle(ev.trigger, &mut ctx);

        if ev.trigger == MissionTrigger::Unregistered {
            board.remove(ev.mission);
        }

        updated.send(WaypointsUpdated {
            mission: ev.mission,
            trigger: ev.trigger,
            outcome,
        });
    }
}

/// Keeps the view context's display toggles in sync with the settings
/// resource.
fn sync_display_settings(settings: Res<DisplaySettings>, mut view: ResMut<ViewContext>) {
    if settings.is_changed() && view.settings != *settings {
        view.settings = *settings;
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the mission board, view resources and trigger dispatch.
///
/// The host inserts [`WaypointEnvironment`] and [`WaypointMap`]; triggers
/// arriving before both exist are discarded with a warning.
pub struct WaypointPlugin;

impl Plugin for WaypointPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissionBoard>()
            .init_resource::<DisplaySettings>()
            .init_resource::<ViewContext>()
            .add_event::<MissionTriggerEvent>()
            .add_event::<WaypointsUpdated>()
            .add_systems(
                Update,
                (sync_display_settings, dispatch_mission_triggers).chain(),
            );
    }
}
