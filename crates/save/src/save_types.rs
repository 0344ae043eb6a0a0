// ---------------------------------------------------------------------------
// Save data schema
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use waypoints::{Mission, SavedGenerator};

/// Schema version of [`SaveData`].
///
/// v1 = missions with their full generator records
pub const CURRENT_SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SavedMission {
    /// Id, seed, state, target body and parameter states.
    pub mission: Mission,
    pub generator: SavedGenerator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveData {
    pub version: u32,
    pub missions: Vec<SavedMission>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: CURRENT_SAVE_VERSION,
            missions: Vec::new(),
        }
    }
}
