// ---------------------------------------------------------------------------
// SaveError: error types for the save container
// ---------------------------------------------------------------------------

use std::fmt;

use waypoints::{MissionId, RestoreError};

/// Errors that can occur while writing or reading a waypoint save.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The save data could not be encoded.
    Encode(String),
    /// The header, compressed payload or bitcode body is malformed.
    Decode(String),
    /// The payload does not match the checksum stored in the header.
    Checksum { expected: u32, found: u32 },
    /// Save file (or header layout) is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// A mission's generator could not be rebuilt from its record.
    Restore {
        mission: MissionId,
        source: RestoreError,
    },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::Checksum { expected, found } => write!(
                f,
                "Save file is corrupted: checksum mismatch (expected {expected:#010X}, got {found:#010X})"
            ),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: save is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::Restore { mission, source } => {
                write!(f, "Mission {}: {source}", mission.0)
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Restore { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for SaveError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        SaveError::Decode(format!("lz4: {e}"))
    }
}
