//! Versioned, checksummed save files for waypoint generator state.

mod atomic_write;
pub mod file_header;
pub mod mission_io;
pub mod save_codec;
pub mod save_error;
pub mod save_types;

pub use mission_io::{collect_save_data, load_board, restore_board, save_board};
pub use save_codec::{decode_save, encode_save, Compression};
pub use save_error::SaveError;
pub use save_types::{SaveData, SavedMission, CURRENT_SAVE_VERSION};
