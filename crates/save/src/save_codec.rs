// ---------------------------------------------------------------------------
// Encoding and decoding of whole save files
// ---------------------------------------------------------------------------
//
// On save: SaveData -> bitcode -> (optional) LZ4 -> header with checksum
// On load: header + checksum -> (optional) LZ4 -> bitcode -> version check

use bevy::log::warn;

use crate::file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};
use crate::save_error::SaveError;
use crate::save_types::{SaveData, CURRENT_SAVE_VERSION};

/// Whether to LZ4-compress the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    None,
    #[default]
    Lz4,
}

pub fn encode_save(data: &SaveData, compression: Compression) -> Vec<u8> {
    let encoded = bitcode::encode(data);
    match compression {
        Compression::None => wrap_with_header(&encoded, encoded.len(), 0),
        Compression::Lz4 => {
            let compressed = lz4_flex::compress_prepend_size(&encoded);
            wrap_with_header(&compressed, encoded.len(), FLAG_COMPRESSED)
        }
    }
}

pub fn decode_save(bytes: &[u8]) -> Result<SaveData, SaveError> {
    let (header, payload) = unwrap_header(bytes)?;

    let decompressed;
    let body = if header.is_compressed() {
        decompressed = lz4_flex::decompress_size_prepended(payload)?;
        if decompressed.len() != header.uncompressed_size as usize {
            return Err(SaveError::Decode(format!(
                "payload decompressed to {} bytes, header says {}",
                decompressed.len(),
                header.uncompressed_size
            )));
        }
        decompressed.as_slice()
    } else {
        payload
    };

    let data: SaveData = bitcode::decode(body).map_err(|e| {
        warn!("Waypoint save: failed to decode {} bytes: {}", body.len(), e);
        SaveError::from(e)
    })?;

    if data.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: CURRENT_SAVE_VERSION,
            found: data.version,
        });
    }
    Ok(data)
}
