/// Gravity magnitude in meters per second squared (positive value).
/// Integrate as a downward acceleration.
pub const GRAVITY_MPS2: f32 = 9.81;

/// Terminal fall speed (negative/downward, meters per second).
///
/// Every loose body clamps `velocity.y` to at least this value so a single step
/// can never carry it through a thin ground slab.
pub const TERMINAL_FALL_SPEED_MPS: f32 = -15.0;

/// Reference frame rate that the per-frame constants were tuned at.
///
/// Decays written as "fraction kept per frame at 60 Hz" are converted to
/// "fraction kept per second" with `per_frame.powf(REFERENCE_HZ)`.
pub const REFERENCE_HZ: f32 = 60.0;

/// Height used for ground when no ground mesh set is registered (meters).
pub const FLAT_GROUND_HEIGHT: f32 = 0.0;

/// Minimum planar motion required to update yaw.
pub const YAW_EPS: f32 = 1.0e-6;

/// Floor applied to the longitudinal speed in slip-angle denominators (m/s).
pub const SLIP_SPEED_FLOOR_MPS: f32 = 0.1;

/// Speed below which a body counts as "not moving" for impact purposes (m/s).
pub const IMPACT_MIN_VEHICLE_SPEED_MPS: f32 = 0.5;

/// Convert meters per second to kilometers per hour.
pub const MPS_TO_KMH: f32 = 3.6;
