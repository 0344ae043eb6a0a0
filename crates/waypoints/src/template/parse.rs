// ---------------------------------------------------------------------------
// JSON definition parsing and validation
// ---------------------------------------------------------------------------
//
// serde handles the shape of the document (unknown fields, duplicate keys,
// wrong value types). Everything that depends on the waypoint type or on the
// environment is checked by hand so that all problems in a list are reported
// together instead of stopping at the first.

use serde::Deserialize;

use crate::config::{DEFAULT_WATER_ALLOWED, MAX_WAYPOINT_COUNT};
use crate::environment::{Environment, SiteKind};
use crate::error::{DefinitionError, DefinitionErrors};

use super::types::{
    MarkerTemplate, NearAnchor, NearPlacement, Placement, StaticPlacement, WaypointDefinitions,
    WaypointKind,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    waypoints: Vec<RawDefinition>,
}

/// A field that accepts either a single string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawDefinition {
    #[serde(rename = "type")]
    kind: String,
    target_body: Option<String>,
    name: Option<OneOrMany>,
    altitude: Option<f64>,
    parameter: Option<OneOrMany>,
    hidden: Option<bool>,
    icon: Option<String>,
    underwater: Option<bool>,
    clustered: Option<bool>,

    latitude: Option<f64>,
    longitude: Option<f64>,

    water_allowed: Option<bool>,
    force_equatorial: Option<bool>,
    count: Option<i64>,

    near_index: Option<i64>,
    #[serde(alias = "craft")]
    vessel: Option<String>,
    chained: Option<bool>,
    min_distance: Option<f64>,
    max_distance: Option<f64>,

    site: Option<String>,
    pqs_city: Option<String>,
    launch_site: Option<String>,
    #[serde(alias = "pqsOffset")]
    offset: Option<[f64; 3]>,
}

impl WaypointDefinitions {
    /// Parses and validates a definition document.
    ///
    /// Bodies named by `targetBody` must exist in `env`, and static sites on
    /// those bodies must be registered. Definitions that inherit the mission
    /// body have their static site checked at instantiation instead.
    pub fn from_json(json: &str, env: &dyn Environment) -> Result<Self, DefinitionErrors> {
        let doc: RawDocument =
            serde_json::from_str(json).map_err(|e| DefinitionErrors::from(DefinitionError::from(e)))?;

        let mut errors = Vec::new();
        let mut templates = Vec::with_capacity(doc.waypoints.len());
        for (index, raw) in doc.waypoints.into_iter().enumerate() {
            let mut v = Validator {
                index,
                errors: &mut errors,
            };
            if let Some(template) = v.template(raw, env) {
                templates.push(template);
            }
        }

        if errors.is_empty() {
            Ok(WaypointDefinitions { templates })
        } else {
            Err(DefinitionErrors(errors))
        }
    }
}

struct Validator<'a> {
    index: usize,
    errors: &'a mut Vec<DefinitionError>,
}

impl Validator<'_> {
    fn push(&mut self, err: DefinitionError) {
        self.errors.push(err);
    }

    fn missing(&mut self, field: &'static str) {
        let index = self.index;
        self.push(DefinitionError::MissingField { index, field });
    }

    fn conflict(&mut self, field: &'static str, other: &'static str) {
        let index = self.index;
        self.push(DefinitionError::ConflictingFields {
            index,
            field,
            other,
        });
    }

    fn out_of_range(&mut self, field: &'static str, reason: impl Into<String>) {
        let index = self.index;
        self.push(DefinitionError::OutOfRange {
            index,
            field,
            reason: reason.into(),
        });
    }

    /// Reports `field` as not applicable to `kind` when it is present.
    fn only_for(&mut self, present: bool, field: &'static str, kind: WaypointKind, allowed: &[WaypointKind]) {
        if present && !allowed.contains(&kind) {
            self.conflict(field, kind.tag());
        }
    }

    fn finite(&mut self, value: Option<f64>, field: &'static str) -> Option<f64> {
        match value {
            Some(x) if !x.is_finite() => {
                self.out_of_range(field, "must be a finite number");
                None
            }
            other => other,
        }
    }

    fn template(&mut self, raw: RawDefinition, env: &dyn Environment) -> Option<MarkerTemplate> {
        let index = self.index;
        let errors_before = self.errors.len();

        let Some(kind) = WaypointKind::from_tag(&raw.kind) else {
            self.push(DefinitionError::UnknownType {
                index,
                tag: raw.kind,
            });
            return None;
        };

        self.check_applicable(&raw, kind);

        if let Some(body) = &raw.target_body {
            if env.body(body).is_none() {
                self.push(DefinitionError::UnknownBody {
                    index,
                    body: body.clone(),
                });
            }
        }

        let visible = !raw.hidden.unwrap_or(false);
        let icon = raw.icon.clone().unwrap_or_default();
        if visible && icon.is_empty() {
            self.missing("icon");
        }

        let mut altitude = self.finite(raw.altitude, "altitude");

        let count = match raw.count {
            None => 1,
            Some(n) if n >= 1 && n <= i64::from(MAX_WAYPOINT_COUNT) => n as u32,
            Some(n) => {
                self.out_of_range(
                    "count",
                    format!("must be between 1 and {MAX_WAYPOINT_COUNT}, got {n}"),
                );
                1
            }
        };

        let placement = match kind {
            WaypointKind::Fixed => self.fixed(&raw),
            WaypointKind::RandomUniform => Some(Placement::RandomUniform {
                water_allowed: raw.water_allowed.unwrap_or(DEFAULT_WATER_ALLOWED),
                force_equatorial: raw.force_equatorial.unwrap_or(false),
            }),
            WaypointKind::RandomNear => self.near(&raw).map(Placement::RandomNear),
            WaypointKind::StaticCity | WaypointKind::StaticLaunchSite => {
                // Static sites sit on the ground unless told otherwise.
                altitude = Some(altitude.unwrap_or(0.0));
                self.static_site(&raw, kind, env).map(Placement::Static)
            }
        };

        if self.errors.len() > errors_before {
            return None;
        }

        Some(MarkerTemplate {
            index: index as u32,
            body: raw.target_body,
            names: raw.name.map(OneOrMany::into_vec).unwrap_or_default(),
            altitude,
            parameters: raw.parameter.map(OneOrMany::into_vec).unwrap_or_default(),
            visible,
            icon,
            underwater: raw.underwater.unwrap_or(false),
            clustered: raw.clustered.unwrap_or(false),
            count,
            placement: placement?,
        })
    }

    fn check_applicable(&mut self, raw: &RawDefinition, kind: WaypointKind) {
        use WaypointKind::*;

        self.only_for(raw.latitude.is_some(), "latitude", kind, &[Fixed]);
        self.only_for(raw.longitude.is_some(), "longitude", kind, &[Fixed]);
        self.only_for(raw.water_allowed.is_some(), "waterAllowed", kind, &[RandomUniform, RandomNear]);
        self.only_for(raw.force_equatorial.is_some(), "forceEquatorial", kind, &[RandomUniform]);
        self.only_for(raw.count.is_some(), "count", kind, &[RandomUniform, RandomNear]);
        self.only_for(raw.near_index.is_some(), "nearIndex", kind, &[RandomNear]);
        self.only_for(raw.vessel.is_some(), "vessel", kind, &[RandomNear]);
        self.only_for(raw.chained.is_some(), "chained", kind, &[RandomNear]);
        self.only_for(raw.min_distance.is_some(), "minDistance", kind, &[RandomNear]);
        self.only_for(raw.max_distance.is_some(), "maxDistance", kind, &[RandomNear]);
        self.only_for(raw.site.is_some(), "site", kind, &[StaticCity, StaticLaunchSite]);
        self.only_for(raw.pqs_city.is_some(), "pqsCity", kind, &[StaticCity]);
        self.only_for(raw.launch_site.is_some(), "launchSite", kind, &[StaticLaunchSite]);
        self.only_for(raw.offset.is_some(), "offset", kind, &[StaticCity, StaticLaunchSite]);
    }

    fn fixed(&mut self, raw: &RawDefinition) -> Option<Placement> {
        let latitude = self.finite(raw.latitude, "latitude");
        let longitude = self.finite(raw.longitude, "longitude");
        if raw.latitude.is_none() {
            self.missing("latitude");
        }
        if raw.longitude.is_none() {
            self.missing("longitude");
        }
        let (latitude, longitude) = (latitude?, longitude?);
        if !(-90.0..=90.0).contains(&latitude) {
            self.out_of_range("latitude", format!("must be within [-90, 90], got {latitude}"));
            return None;
        }
        Some(Placement::Fixed {
            latitude,
            longitude,
        })
    }

    fn near(&mut self, raw: &RawDefinition) -> Option<NearPlacement> {
        let anchor = match (raw.near_index, &raw.vessel) {
            (Some(_), Some(_)) => {
                self.conflict("nearIndex", "vessel");
                None
            }
            (None, None) => {
                self.missing("nearIndex");
                None
            }
            (Some(near), None) => {
                if near < 0 || near >= self.index as i64 {
                    self.out_of_range(
                        "nearIndex",
                        format!("must refer to an earlier waypoint (0..{}), got {near}", self.index),
                    );
                    None
                } else {
                    Some(NearAnchor::Waypoint(near as u32))
                }
            }
            (None, Some(key)) => {
                if key.is_empty() {
                    self.out_of_range("vessel", "must not be empty");
                    None
                } else {
                    Some(NearAnchor::Craft(key.clone()))
                }
            }
        };

        let chained = raw.chained.unwrap_or(false);
        if chained && raw.vessel.is_some() {
            self.conflict("chained", "vessel");
        }

        let min_distance = self.finite(raw.min_distance, "minDistance").unwrap_or(0.0);
        let max_distance = self.finite(raw.max_distance, "maxDistance");
        if raw.max_distance.is_none() {
            self.missing("maxDistance");
        }
        if min_distance < 0.0 {
            self.out_of_range("minDistance", format!("must be at least 0, got {min_distance}"));
        }
        let max_distance = max_distance?;
        if max_distance <= 0.0 {
            self.out_of_range("maxDistance", format!("must be greater than 0, got {max_distance}"));
        } else if min_distance > max_distance {
            self.out_of_range(
                "minDistance",
                format!("must not exceed maxDistance ({min_distance} > {max_distance})"),
            );
        }

        Some(NearPlacement {
            anchor: anchor?,
            min_distance,
            max_distance,
            water_allowed: raw.water_allowed.unwrap_or(DEFAULT_WATER_ALLOWED),
            chained,
        })
    }

    fn static_site(
        &mut self,
        raw: &RawDefinition,
        kind: WaypointKind,
        env: &dyn Environment,
    ) -> Option<StaticPlacement> {
        let site_kind = kind.site_kind()?;
        let alias = match site_kind {
            SiteKind::City => ("pqsCity", &raw.pqs_city),
            SiteKind::LaunchSite => ("launchSite", &raw.launch_site),
        };

        let site = match (&raw.site, alias.1) {
            (Some(_), Some(_)) => {
                self.conflict("site", alias.0);
                return None;
            }
            (Some(s), None) | (None, Some(s)) => s.clone(),
            (None, None) => {
                self.missing("site");
                return None;
            }
        };

        let offset = raw.offset.unwrap_or([0.0; 3]);
        if offset.iter().any(|c| !c.is_finite()) {
            self.out_of_range("offset", "must contain finite numbers");
        }

        if let Some(body) = &raw.target_body {
            if env.body(body).is_some() && env.static_site(body, site_kind, &site).is_none() {
                self.push(DefinitionError::UnknownStaticSite {
                    index: self.index,
                    kind: site_kind,
                    site: site.clone(),
                    body: body.clone(),
                });
            }
        }

        Some(StaticPlacement {
            kind: site_kind,
            site,
            offset,
        })
    }
}
