use super::probe::SurfaceProbe;
use crate::utils::Vec3;

/// Center plus the four cardinal offsets at `offset` meters, on the XZ plane.
pub fn cardinal_footprint(center: &Vec3, offset: f32) -> [Vec3; 5] {
    [
        *center,
        center + Vec3::new(offset, 0.0, 0.0),
        center + Vec3::new(-offset, 0.0, 0.0),
        center + Vec3::new(0.0, 0.0, offset),
        center + Vec3::new(0.0, 0.0, -offset),
    ]
}

/// Lowest ground height found under any of `samples`, casting down from `from_y`.
///
/// Returns `None` when every sample misses.
pub fn lowest_ground<P: SurfaceProbe + ?Sized>(
    probe: &P,
    samples: &[Vec3],
    from_y: f32,
    max_dist: f32,
) -> Option<f32> {
    samples
        .iter()
        .filter_map(|s| probe.ground_below_from(s.x, s.z, from_y, max_dist))
        .map(|hit| hit.point.y)
        .reduce(f32::min)
}
