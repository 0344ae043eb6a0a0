// ---------------------------------------------------------------------------
// Mission board <-> save data
// ---------------------------------------------------------------------------

use std::path::Path;

use bevy::log::info;

use waypoints::{
    Environment, LiveMap, MapMarker, MarkerKey, MissionBoard, ViewContext, WaypointGenerator,
};

use crate::atomic_write::atomic_write;
use crate::save_codec::{decode_save, encode_save, Compression};
use crate::save_error::SaveError;
use crate::save_types::{SaveData, SavedMission, CURRENT_SAVE_VERSION};

/// Snapshot of every tracked mission, in id order.
pub fn collect_save_data(board: &MissionBoard) -> SaveData {
    SaveData {
        version: CURRENT_SAVE_VERSION,
        missions: board
            .iter()
            .map(|entry| SavedMission {
                mission: entry.mission.clone(),
                generator: entry.generator.to_saved(),
            })
            .collect(),
    }
}

/// Collects markers published during a restore so that nothing reaches the
/// live map unless every mission restored.
#[derive(Default)]
struct StagedMap {
    markers: Vec<MapMarker>,
}

impl LiveMap for StagedMap {
    fn publish(&mut self, marker: MapMarker) {
        self.markers.push(marker);
    }

    fn retract(&mut self, key: MarkerKey) {
        self.markers.retain(|m| m.key != key);
    }
}

/// Rebuilds a board from save data and publishes the eligible markers.
///
/// Either every mission is restored or the map is left untouched.
pub fn restore_board(
    data: SaveData,
    env: &dyn Environment,
    view: &ViewContext,
    map: &mut dyn LiveMap,
) -> Result<MissionBoard, SaveError> {
    let mut board = MissionBoard::default();
    let mut staged = StagedMap::default();

    for saved in data.missions {
        let id = saved.mission.id;
        if saved.generator.mission != id {
            return Err(SaveError::Decode(format!(
                "mission {} carries the generator of mission {}",
                id.0, saved.generator.mission.0
            )));
        }
        let generator =
            WaypointGenerator::restore(saved.generator, &saved.mission, env, view, &mut staged)
                .map_err(|source| SaveError::Restore {
                    mission: id,
                    source,
                })?;
        board.insert(saved.mission, generator);
    }

    for marker in staged.markers {
        map.publish(marker);
    }
    Ok(board)
}

pub fn save_board(path: &Path, board: &MissionBoard, compression: Compression) -> Result<(), SaveError> {
    let bytes = encode_save(&collect_save_data(board), compression);
    atomic_write(path, &bytes)?;
    info!(
        "Saved {} missions ({} bytes) to {}",
        board.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

pub fn load_board(
    path: &Path,
    env: &dyn Environment,
    view: &ViewContext,
    map: &mut dyn LiveMap,
) -> Result<MissionBoard, SaveError> {
    let bytes = std::fs::read(path)?;
    let board = restore_board(decode_save(&bytes)?, env, view, map)?;
    info!("Loaded {} missions from {}", board.len(), path.display());
    Ok(board)
}
