/*!
Probe tolerances and surface classification thresholds.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// A wall-set hit whose normal has `|normal.y|` at or above this value is a floor or
/// ceiling, not a wall, and is discarded by wall queries.
pub const WALL_NORMAL_MAX_Y: f32 = 0.7;

/// Ground-query ray origins start this far above the query point (meters).
pub const GROUND_PROBE_LIFT: f32 = 20.0;

/// Maximum ground-query distance below the lifted origin (meters).
pub const GROUND_PROBE_RANGE: f32 = 100.0;

/// Minimum squared length for a direction to be considered castable.
pub const MIN_DIR_SQ: f32 = 1.0e-8;
