use bevy::log::debug;
use rand::Rng;

use crate::config::PLACEHOLDER_NAME;
use crate::environment::Environment;
use crate::error::{DefinitionError, DefinitionErrors};
use crate::instance::{MarkerInstance, PendingReason, PublishState, Resolution};
use crate::mission::Mission;
use crate::mission_rng::{DrawPurpose, MissionRng};
use crate::site_names::generate_site_name;
use crate::template::{MarkerTemplate, NearAnchor, Placement, WaypointDefinitions};

use super::WaypointGenerator;

impl WaypointGenerator {
    /// Duplicates every definition `count` times into mission-scoped
    /// instances.
    ///
    /// Definitions without a `targetBody` take the mission's target body.
    /// Static sites on such inherited bodies are checked here, since the
    /// body was not known when the definitions were parsed.
    pub fn instantiate(
        definitions: &WaypointDefinitions,
        mission: &Mission,
        env: &dyn Environment,
    ) -> Result<Self, DefinitionErrors> {
        let mut errors = Vec::new();
        let mut waypoints: Vec<MarkerInstance> = Vec::with_capacity(definitions.instance_count());
        // Declaration index -> index of the first instance it produced.
        let mut first_instance: Vec<u32> = Vec::with_capacity(definitions.len());

        for template in definitions.templates() {
            let index = template.index as usize;
            first_instance.push(waypoints.len() as u32);

            let Some(body) = template.body.clone().or_else(|| mission.target_body.clone()) else {
                errors.push(DefinitionError::MissingBody { index });
                continue;
            };

            if let Placement::Static(site) = &template.placement {
                let site_missing = template.body.is_none()
                    && env.body(&body).is_some()
                    && env.static_site(&body, site.kind, &site.site).is_none();
                if site_missing {
                    errors.push(DefinitionError::UnknownStaticSite {
                        index,
                        kind: site.kind,
                        site: site.site.clone(),
                        body: body.clone(),
                    });
                    continue;
                }
            }

            for copy in 0..template.count {
                let instance_index = waypoints.len() as u32;
                let placement = instance_placement(template, copy, instance_index, &first_instance);
                let name = pick_name(template, copy, mission.seed, instance_index, &body);

                let (latitude, longitude) = match &placement {
                    Placement::Fixed {
                        latitude,
                        longitude,
                    } => (*latitude, *longitude),
                    _ => (0.0, 0.0),
                };

                waypoints.push(MarkerInstance {
                    index: instance_index,
                    definition: template.index,
                    name,
                    names: template.names.clone(),
                    body: body.clone(),
                    latitude,
                    longitude,
                    altitude: template.altitude.unwrap_or(0.0),
                    random_altitude: template.altitude.is_none(),
                    parameters: template.parameters.clone(),
                    visible: template.visible,
                    icon: template.icon.clone(),
                    underwater: template.underwater,
                    clustered: template.clustered,
                    count: template.count,
                    placement,
                    seed: mission.seed,
                    mission: Some(mission.id),
                    resolution: Resolution::Pending(PendingReason::Unattempted),
                    publish: PublishState::NotPublished,
                    frame_corrected: false,
                });
            }
        }

        if !errors.is_empty() {
            return Err(DefinitionErrors(errors));
        }

        debug!(
            "Instantiated {} waypoints for mission {:?} from {} definitions",
            waypoints.len(),
            mission.id,
            definitions.len()
        );

        Ok(WaypointGenerator {
            mission: mission.id,
            seed: mission.seed,
            waypoints,
            environment_ready: false,
            filters_bound: false,
        })
    }
}

/// Rewrites a template's near anchor from a declaration index to an instance
/// index. Chained copies after the first anchor on the copy before them.
fn instance_placement(
    template: &MarkerTemplate,
    copy: u32,
    instance_index: u32,
    first_instance: &[u32],
) -> Placement {
    let mut placement = template.placement.clone();
    if let Placement::RandomNear(near) = &mut placement {
        if let NearAnchor::Waypoint(declaration) = near.anchor {
            let target = if near.chained && copy > 0 {
                instance_index - 1
            } else {
                first_instance
                    .get(declaration as usize)
                    .copied()
                    .unwrap_or(declaration)
            };
            near.anchor = NearAnchor::Waypoint(target);
        }
    }
    placement
}

/// A single configured name applies to every copy; otherwise copies take
/// names positionally. Missing, empty or placeholder names are generated.
fn pick_name(template: &MarkerTemplate, copy: u32, seed: u64, instance_index: u32, body: &str) -> String {
    let configured = match template.names.as_slice() {
        [only] => Some(only),
        names => names.get(copy as usize),
    };

    match configured {
        Some(name) if !name.is_empty() && !name.eq_ignore_ascii_case(PLACEHOLDER_NAME) => name.clone(),
        _ => {
            let mut rng = MissionRng::for_waypoint(seed, instance_index, DrawPurpose::Naming);
            generate_site_name(rng.0.gen(), body, template.placement.water_allowed())
        }
    }
}
