/*!
Core collision types shared by the probe, the resolver and the actor models.

This module intentionally contains no algorithms.
*/

use crate::utils::Vec3;

/// The two disjoint classes of static collision geometry.
///
/// Ground meshes answer vertical height queries; wall/building meshes answer
/// horizontal blocking queries. An actor is never tested against the wrong class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceSet {
    Ground,
    Walls,
}

/// Nearest intersection of a ray with a static geometry set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// World-space unit surface normal at the hit.
    pub normal: Vec3,
    /// Distance from the ray origin along the (unit) direction.
    pub distance: f32,
}

/// Axis-aligned bounds in a body's local frame (meters, relative to the body origin).
///
/// Computed from collision sub-mesh vertices, never from the rotating visual,
/// so tumbling does not inflate the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Box centered on the origin with the given half extents.
    pub fn from_half_extents(half: Vec3) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance from the body origin down to the lowest point of the box.
    pub fn depth_below_origin(&self) -> f32 {
        -self.min.y
    }

    /// Half of the footprint width seen along a horizontal unit normal.
    pub fn half_width_along(&self, normal: &Vec3) -> f32 {
        let size = self.size();
        (normal.x.abs() * size.x).max(normal.z.abs() * size.z) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn half_extents_center_the_box() {
        let b = Bounds::from_half_extents(Vec3::new(0.5, 0.25, 1.0));
        assert_eq!(b.size(), Vec3::new(1.0, 0.5, 2.0));
        assert_relative_eq!(b.depth_below_origin(), 0.25);
    }

    #[test]
    fn half_width_uses_dominant_axis() {
        let b = Bounds::from_half_extents(Vec3::new(0.5, 0.3, 1.5));
        assert_relative_eq!(b.half_width_along(&Vec3::x()), 0.5);
        assert_relative_eq!(b.half_width_along(&Vec3::z()), 1.5);
    }
}
