//! Deterministic per-mission randomness.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic draws. Every random
//! decision about a waypoint (its generated name, where it lands, its random
//! altitude) comes from a stream derived from the mission seed, the
//! waypoint's index and the purpose of the draw. Two generators built from
//! the same mission seed therefore agree on every waypoint no matter in which
//! order, or over how many passes, the waypoints get resolved.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// What a stream of draws is used for. Each purpose gets its own stream so
/// that e.g. naming a waypoint never shifts where it is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPurpose {
    Naming = 0,
    Placement = 1,
    Correction = 2,
}

const PURPOSE_BITS: u32 = 2;

/// Deterministic RNG handed to samplers and oracles.
///
/// Use `rng.0` (a `ChaCha8Rng` implementing `rand::Rng`) for draws.
pub struct MissionRng(pub ChaCha8Rng);

impl MissionRng {
    /// Create a new `MissionRng` seeded from the given mission seed.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// The stream belonging to one waypoint and one purpose.
    pub fn for_waypoint(seed: u64, index: u32, purpose: DrawPurpose) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream_id(index, purpose));
        Self(rng)
    }
}

fn stream_id(index: u32, purpose: DrawPurpose) -> u64 {
    (u64::from(index) << PURPOSE_BITS) | purpose as u64
}
