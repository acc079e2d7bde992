use crate::YAW_EPS;
use nalgebra::{UnitQuaternion, Vector2, Vector3};

/// Common math aliases for clarity and consistency.
pub type Vec3 = Vector3<f32>;
pub type Quat = UnitQuaternion<f32>;

/// Yaw (radians) that faces the planar direction `xz`, or `None` for a zero vector.
///
/// Convention: yaw 0 faces -Z, positive yaw turns toward -X (counter-clockwise seen from above).
pub fn yaw_from_xz(xz: Vector2<f32>) -> Option<f32> {
    if xz.norm_squared() > YAW_EPS {
        return Some((-xz[0]).atan2(-xz[1]));
    }

    None
}

/// World-space forward unit vector for a yaw angle (yaw 0 faces -Z).
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// World-space right unit vector for a yaw angle (yaw 0 has right = +X).
#[inline]
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Rotation about +Y only.
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_axis_angle(&Vector3::y_axis(), yaw)
}

/// Rotation composed in Y (yaw), then X (pitch), then Z (roll) order.
///
/// This keeps pitch and roll expressed in the already-yawed body frame.
pub fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Quat {
    yaw_rotation(yaw)
        * Quat::from_axis_angle(&Vector3::x_axis(), pitch)
        * Quat::from_axis_angle(&Vector3::z_axis(), roll)
}

/// Drop the vertical component of a vector.
#[inline]
pub fn to_planar(v: &Vec3) -> Vector2<f32> {
    Vector2::new(v.x, v.z)
}

/// Same vector with `y` set to zero.
#[inline]
pub fn horizontal(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Planar (XZ) distance between two world positions (meters).
pub fn planar_distance(a: &Vec3, b: &Vec3) -> f32 {
    let x = b.x - a.x;
    let z = b.z - a.z;
    (x * x + z * z).sqrt()
}

/// Fraction of a quantity left after `dt` seconds, given the fraction left after one second.
///
/// Applying `decay(f, a) * decay(f, b)` equals `decay(f, a + b)`, which is what makes
/// every friction term in the simulation step-size independent.
#[inline]
pub fn decay(remaining_per_second: f32, dt: f32) -> f32 {
    remaining_per_second.clamp(0.0, 1.0).powf(dt.max(0.0))
}

/// Blend weight for exponential smoothing toward a target with time constant `tau` seconds.
///
/// `tau <= 0` snaps immediately.
#[inline]
pub fn smoothing_alpha(tau: f32, dt: f32) -> f32 {
    if tau <= 0.0 {
        return 1.0;
    }
    1.0 - (-dt.max(0.0) / tau).exp()
}

/// Move `current` toward `target` by exponential smoothing.
#[inline]
pub fn approach(current: f32, target: f32, tau: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_alpha(tau, dt)
}

/// Normalize, returning `None` for (near) zero vectors instead of NaN.
#[inline]
pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
    v.try_normalize(1.0e-6)
}
