//! Human-readable names for waypoints configured with the `site`
//! placeholder or without a name.
//!
//! A name is a pure function of one random draw, the body and whether the
//! site may be in water, so a mission regenerated from the same seed gets
//! the same names.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use xxhash_rust::xxh32::xxh32;

const ADJECTIVES: &[&str] = &[
    "Amber", "Ashen", "Broken", "Crimson", "Distant", "Dusty", "Echoing", "Forgotten", "Frozen",
    "Gilded", "Hidden", "Hollow", "Jagged", "Lonely", "Misty", "Quiet", "Restless", "Shattered",
    "Silent", "Sunken", "Twin", "Whispering", "Windswept", "Verdant",
];

const LAND_FEATURES: &[&str] = &[
    "Basin", "Bluff", "Butte", "Canyon", "Crater", "Crest", "Dunes", "Escarpment", "Flats",
    "Gorge", "Highlands", "Hills", "Mesa", "Plateau", "Ridge", "Rise", "Valley", "Wastes",
];

const WATER_FEATURES: &[&str] = &[
    "Bay", "Cove", "Deep", "Gulf", "Inlet", "Lagoon", "Reef", "Shallows", "Shoals", "Sound",
    "Strait", "Trench",
];

fn pick<R: Rng>(rng: &mut R, table: &[&'static str]) -> &'static str {
    table.choose(rng).copied().unwrap_or_default()
}

/// Generates a site name from a random `draw`.
///
/// When `water_allowed` is false only land features are used. The body name
/// is hashed into the seed so the same draw reads differently per body.
pub fn generate_site_name(draw: u64, body: &str, water_allowed: bool) -> String {
    let seed = draw ^ (u64::from(xxh32(body.as_bytes(), 0)) << 32);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let adjective = pick(&mut rng, ADJECTIVES);
    let feature = if water_allowed {
        let slot = rng.gen_range(0..LAND_FEATURES.len() + WATER_FEATURES.len());
        match LAND_FEATURES.get(slot) {
            Some(feature) => *feature,
            None => pick(&mut rng, WATER_FEATURES),
        }
    } else {
        pick(&mut rng, LAND_FEATURES)
    };
    let designation: u32 = rng.gen_range(10..100);

    format!("{adjective} {feature} {designation}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_draw_same_name() {
        assert_eq!(
            generate_site_name(42, "Kerbin", true),
            generate_site_name(42, "Kerbin", true)
        );
    }

    #[test]
    fn test_body_changes_name() {
        let on_kerbin: Vec<_> = (0..16).map(|d| generate_site_name(d, "Kerbin", true)).collect();
        let on_duna: Vec<_> = (0..16).map(|d| generate_site_name(d, "Duna", true)).collect();
        assert_ne!(on_kerbin, on_duna);
    }

    #[test]
    fn test_land_only_never_uses_water_features() {
        for draw in 0..2_000u64 {
            let name = generate_site_name(draw.wrapping_mul(0x9E37_79B9_7F4A_7C15), "Kerbin", false);
            let feature = name.split(' ').nth(1).unwrap_or_default();
            assert!(LAND_FEATURES.contains(&feature), "{name}");
        }
    }

    #[test]
    fn test_water_features_appear_when_allowed() {
        let water = (0..500u64)
            .map(|draw| generate_site_name(draw, "Kerbin", true))
            .filter(|name| {
                let feature = name.split(' ').nth(1).unwrap_or_default();
                WATER_FEATURES.contains(&feature)
            })
            .count();
        assert!(water > 0 && water < 500, "water names: {water}");
    }

    #[test]
    fn test_name_shape() {
        let name = generate_site_name(7, "Mun", true);
        let parts: Vec<_> = name.split(' ').collect();
        assert_eq!(parts.len(), 3, "{name}");
        assert!(ADJECTIVES.contains(&parts[0]));
        let number: u64 = parts[2].parse().expect("designation is numeric");
        assert!((10..100).contains(&number));
    }
}
