// ---------------------------------------------------------------------------
// Error types for definition parsing and state restore
// ---------------------------------------------------------------------------

use std::fmt;

use crate::environment::SiteKind;

/// A single problem found while validating waypoint definitions.
///
/// `index` is the declaration index of the offending definition.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// The document is not valid JSON or does not match the schema.
    Json(String),
    UnknownType { index: usize, tag: String },
    MissingField { index: usize, field: &'static str },
    /// Two fields were given that cannot be combined, or a field was given
    /// that does not apply to this waypoint type.
    ConflictingFields {
        index: usize,
        field: &'static str,
        other: &'static str,
    },
    OutOfRange {
        index: usize,
        field: &'static str,
        reason: String,
    },
    UnknownBody { index: usize, body: String },
    /// No anchor body was configured and the mission has no target body.
    MissingBody { index: usize },
    UnknownStaticSite {
        index: usize,
        kind: SiteKind,
        site: String,
        body: String,
    },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::Json(msg) => write!(f, "invalid waypoint document: {msg}"),
            DefinitionError::UnknownType { index, tag } => {
                write!(f, "waypoint {index}: unrecognized waypoint type '{tag}'")
            }
            DefinitionError::MissingField { index, field } => {
                write!(f, "waypoint {index}: missing required field '{field}'")
            }
            DefinitionError::ConflictingFields {
                index,
                field,
                other,
            } => write!(
                f,
                "waypoint {index}: field '{field}' cannot be used together with '{other}'"
            ),
            DefinitionError::OutOfRange {
                index,
                field,
                reason,
            } => write!(f, "waypoint {index}: field '{field}' {reason}"),
            DefinitionError::UnknownBody { index, body } => {
                write!(f, "waypoint {index}: unknown body '{body}'")
            }
            DefinitionError::MissingBody { index } => write!(
                f,
                "waypoint {index}: no targetBody given and the mission has no target body"
            ),
            DefinitionError::UnknownStaticSite {
                index,
                kind,
                site,
                body,
            } => write!(
                f,
                "waypoint {index}: couldn't find {} '{site}' on '{body}'",
                match kind {
                    SiteKind::City => "city",
                    SiteKind::LaunchSite => "launch site",
                }
            ),
        }
    }
}

impl std::error::Error for DefinitionError {}

impl From<serde_json::Error> for DefinitionError {
    fn from(e: serde_json::Error) -> Self {
        DefinitionError::Json(e.to_string())
    }
}

/// Every problem found in a definition list. A list with any error is
/// rejected as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionErrors(pub Vec<DefinitionError>);

impl DefinitionErrors {
    pub fn errors(&self) -> &[DefinitionError] {
        &self.0
    }
}

impl fmt::Display for DefinitionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mission definition invalid ({} errors)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DefinitionErrors {}

impl From<DefinitionError> for DefinitionErrors {
    fn from(e: DefinitionError) -> Self {
        DefinitionErrors(vec![e])
    }
}

/// Errors raised while rebuilding a generator from saved state.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreError {
    /// Saved bytes could not be decoded.
    Decode(String),
    /// A static location referenced by the save is not in the registry.
    UnknownStaticSite {
        waypoint: u32,
        site: String,
        body: String,
    },
    /// A near-anchor points at a waypoint that does not precede it.
    AnchorOutOfRange { waypoint: u32, anchor: u32 },
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::Decode(msg) => write!(f, "decoding error: {msg}"),
            RestoreError::UnknownStaticSite {
                waypoint,
                site,
                body,
            } => write!(
                f,
                "waypoint {waypoint}: static location '{site}' on '{body}' is not available"
            ),
            RestoreError::AnchorOutOfRange { waypoint, anchor } => write!(
                f,
                "waypoint {waypoint}: near-anchor {anchor} does not refer to an earlier waypoint"
            ),
        }
    }
}

impl std::error::Error for RestoreError {}

impl From<bitcode::Error> for RestoreError {
    fn from(e: bitcode::Error) -> Self {
        RestoreError::Decode(e.to_string())
    }
}
