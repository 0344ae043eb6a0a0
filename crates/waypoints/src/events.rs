//! Inbound mission triggers and how the generator reacts to them.
//!
//! The host owns the mission lifecycle. Whenever something happens that may
//! change what can be placed or shown, it hands the generator a
//! [`MissionTrigger`] together with an explicit [`TriggerContext`]; there is
//! no global event bus inside the engine.

use bevy::log::debug;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::generator::WaypointGenerator;
use crate::mission::Mission;
use crate::visibility::{LiveMap, ViewContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    Completed,
    Failed,
    Cancelled,
    Declined,
    OfferExpired,
}

/// Map view filter state carried by a filters-modified notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewFilter {
    /// All filters cleared. Only this value triggers republication.
    None,
    /// Any narrower filter selection.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionTrigger {
    Registered,
    Unregistered,
    Offered,
    ParameterStateChanged,
    Accepted,
    Loaded,
    ViewFiltersModified(ViewFilter),
    /// The environment finished loading; static sites may have moved.
    EnvironmentReady,
    Terminated(TerminationReason),
}

/// Everything a trigger may need, passed in by the caller.
pub struct TriggerContext<'a> {
    /// Mission state after the change the trigger reports.
    pub mission: &'a Mission,
    pub env: &'a dyn Environment,
    pub view: &'a ViewContext,
    pub map: &'a mut dyn LiveMap,
}

/// What handling a trigger changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub resolved: Vec<u32>,
    pub corrected: Vec<u32>,
    pub published: Vec<u32>,
    pub retracted: Vec<u32>,
}

impl WaypointGenerator {
    pub fn handle(&mut self, trigger: MissionTrigger, ctx: &mut TriggerContext<'_>) -> TriggerOutcome {
        let mut outcome = TriggerOutcome::default();
        debug!("Mission {:?}: {:?}", self.mission, trigger);

        match trigger {
            MissionTrigger::Registered => {
                self.filters_bound = true;
                outcome.resolved = self.resolve(ctx.env).resolved;
                outcome.published = self.publish_eligible(ctx.mission, ctx.view, ctx.map);
            }
            MissionTrigger::Offered | MissionTrigger::ParameterStateChanged => {
                outcome.resolved = self.resolve(ctx.env).resolved;
                if self.any_displayable(ctx.mission) {
                    self.filters_bound = true;
                }
                outcome.published = self.publish_eligible(ctx.mission, ctx.view, ctx.map);
            }
            MissionTrigger::Accepted | MissionTrigger::Loaded => {
                outcome.resolved = self.resolve(ctx.env).resolved;
                outcome.published = self.publish_eligible(ctx.mission, ctx.view, ctx.map);
            }
            MissionTrigger::ViewFiltersModified(filter) => {
                if self.filters_bound && filter == ViewFilter::None {
                    outcome.retracted = self.retract_all(ctx.map);
                    outcome.published = self.publish_eligible(ctx.mission, ctx.view, ctx.map);
                }
            }
            MissionTrigger::EnvironmentReady => {
                outcome.corrected = self.apply_late_correction(ctx.env);
                self.refresh(&outcome.corrected, ctx.mission, ctx.view, ctx.map);
                outcome.resolved = self.resolve(ctx.env).resolved;
                outcome.published = self.publish_eligible(ctx.mission, ctx.view, ctx.map);
            }
            MissionTrigger::Terminated(_) | MissionTrigger::Unregistered => {
                self.filters_bound = false;
                outcome.retracted = self.retract_all(ctx.map);
            }
        }

        outcome
    }
}
