/// Maximum number of draws the near-point sampler makes before it settles
/// for the last (unvalidated) candidate.
pub const MAX_NEAR_ATTEMPTS: u32 = 10_000;

/// Attempts made with the configured distance range before the search
/// window starts widening.
pub const WINDOW_GROWTH_START: u32 = 100;

/// Per-attempt growth of the search window once widening has started.
pub const WINDOW_GROWTH_RATE: f64 = 1.01;

/// `|cos(latitude)|` below this value is treated as standing on a pole.
pub const POLE_EPSILON: f64 = 1e-4;

/// Frames whose basis determinant is smaller than this cannot be inverted.
pub const DEGENERATE_FRAME_EPSILON: f64 = 1e-12;

/// Largest `count` a single definition may ask for.
pub const MAX_WAYPOINT_COUNT: u32 = 1_000;

/// Reserved name token meaning "generate a name for me" (case-insensitive).
pub const PLACEHOLDER_NAME: &str = "site";

/// Random placements may land in water unless the definition says otherwise.
pub const DEFAULT_WATER_ALLOWED: bool = true;
