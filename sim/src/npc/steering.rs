use crate::{collision::SurfaceProbe, utils::Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Random unit direction on the ground plane.
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Perpendicular to the right of a planar direction.
pub fn right_of(dir: &Vec3) -> Vec3 {
    Vec3::new(-dir.z, 0.0, dir.x)
}

/// Perpendicular to the left of a planar direction.
pub fn left_of(dir: &Vec3) -> Vec3 {
    Vec3::new(dir.z, 0.0, -dir.x)
}

/// Direction to walk when `dir` is blocked within `reach`.
///
/// Tries a right turn, then a left turn, and falls back to walking straight back.
/// Returns `None` when the way ahead is clear.
pub fn detour<P: SurfaceProbe + ?Sized>(
    probe: &P,
    origin: &Vec3,
    dir: &Vec3,
    reach: f32,
) -> Option<Vec3> {
    let blocked = |d: &Vec3| probe.wall_along(origin, d, reach).is_some();
    if !blocked(dir) {
        return None;
    }
    [right_of(dir), left_of(dir)]
        .into_iter()
        .find(|candidate| !blocked(candidate))
        .or(Some(-dir))
}
