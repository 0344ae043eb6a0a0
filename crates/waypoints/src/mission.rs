//! The slice of mission state the waypoint engine reads.
//!
//! Missions themselves (objectives, rewards, the combinator parameters) live
//! in the host. The engine only needs the stable seed, the lifecycle state,
//! the default target body and the completion state of gating parameters.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Stable identifier of a mission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct MissionId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum MissionState {
    #[default]
    Generated,
    Offered,
    Active,
    Declined,
    OfferExpired,
    Completed,
    Failed,
    Cancelled,
}

impl MissionState {
    /// Offered and Active missions are the only ones whose waypoints may be
    /// shown on the map.
    pub fn is_live(self) -> bool {
        matches!(self, MissionState::Offered | MissionState::Active)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum ParameterState {
    #[default]
    Incomplete,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Mission {
    pub id: MissionId,
    /// Seed from which all of this mission's randomness is derived.
    pub seed: u64,
    pub state: MissionState,
    /// Body used by definitions that do not name their own `targetBody`.
    pub target_body: Option<String>,
    parameters: BTreeMap<String, ParameterState>,
}

impl Mission {
    pub fn new(id: MissionId, seed: u64) -> Self {
        Self {
            id,
            seed,
            state: MissionState::Generated,
            target_body: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_target_body(mut self, body: impl Into<String>) -> Self {
        self.target_body = Some(body.into());
        self
    }

    pub fn with_state(mut self, state: MissionState) -> Self {
        self.state = state;
        self
    }

    pub fn set_parameter_state(&mut self, id: impl Into<String>, state: ParameterState) {
        self.parameters.insert(id.into(), state);
    }

    /// Unknown parameters read as `None`, which never counts as complete.
    pub fn parameter_state(&self, id: &str) -> Option<ParameterState> {
        self.parameters.get(id).copied()
    }

    pub fn is_parameter_complete(&self, id: &str) -> bool {
        self.parameter_state(id) == Some(ParameterState::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_states() {
        assert!(MissionState::Offered.is_live());
        assert!(MissionState::Active.is_live());
        assert!(!MissionState::Generated.is_live());
        assert!(!MissionState::Completed.is_live());
        assert!(!MissionState::Declined.is_live());
    }

    #[test]
    fn test_parameter_completion() {
        let mut mission = Mission::new(MissionId(1), 7);
        assert!(!mission.is_parameter_complete("reach_orbit"));

        mission.set_parameter_state("reach_orbit", ParameterState::Incomplete);
        assert!(!mission.is_parameter_complete("reach_orbit"));

        mission.set_parameter_state("reach_orbit", ParameterState::Complete);
        assert!(mission.is_parameter_complete("reach_orbit"));
        assert_eq!(mission.parameter_state("missing"), None);
    }
}
