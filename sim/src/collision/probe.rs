use super::{
    settings::{GROUND_PROBE_LIFT, GROUND_PROBE_RANGE, MIN_DIR_SQ, WALL_NORMAL_MAX_Y},
    types::{RayHit, SurfaceSet},
};
use crate::utils::Vec3;

/// Ray queries against the static geometry sets.
///
/// Contract
/// - `cast` returns the nearest intersection within `max_dist` against one set, or `None`.
/// - Ground queries always cast straight down from above the query point and accept any
///   normal.
/// - Wall queries cast along a horizontal direction and discard a hit whose normal is
///   floor-like (`|normal.y| >= WALL_NORMAL_MAX_Y`). There is no retry past a discarded hit.
/// - A miss (or an unregistered set) just means "ungrounded"/"unobstructed" for this tick.
pub trait SurfaceProbe {
    /// Nearest hit along `dir` (need not be normalized) within `max_dist`.
    fn cast(&self, set: SurfaceSet, origin: &Vec3, dir: &Vec3, max_dist: f32) -> Option<RayHit>;

    /// Whether any geometry has been registered for `set`.
    fn has_set(&self, set: SurfaceSet) -> bool;

    /// Ground hit under `(x, z)`, casting down from `from_y` over `max_dist`.
    fn ground_below_from(&self, x: f32, z: f32, from_y: f32, max_dist: f32) -> Option<RayHit> {
        self.cast(
            SurfaceSet::Ground,
            &Vec3::new(x, from_y, z),
            &Vec3::new(0.0, -1.0, 0.0),
            max_dist,
        )
    }

    /// Ground hit under a point, casting from well above it so a body that sank into
    /// the ground still finds the surface it belongs on.
    fn ground_below(&self, at: &Vec3) -> Option<RayHit> {
        self.ground_below_from(at.x, at.z, at.y + GROUND_PROBE_LIFT, GROUND_PROBE_RANGE)
    }

    /// Wall hit along `dir`, with floor/ceiling hits rejected.
    fn wall_along(&self, origin: &Vec3, dir: &Vec3, max_dist: f32) -> Option<RayHit> {
        if dir.norm_squared() <= MIN_DIR_SQ || max_dist <= 0.0 {
            return None;
        }
        self.cast(SurfaceSet::Walls, origin, dir, max_dist)
            .filter(|hit| hit.normal.y.abs() < WALL_NORMAL_MAX_Y)
    }

    /// `true` when no wall lies within `radius` in any of the eight compass directions.
    fn is_clear_around(&self, at: &Vec3, radius: f32) -> bool {
        const D: f32 = std::f32::consts::FRAC_1_SQRT_2;
        let dirs = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(D, 0.0, D),
            Vec3::new(-D, 0.0, D),
            Vec3::new(D, 0.0, -D),
            Vec3::new(-D, 0.0, -D),
        ];
        dirs.iter().all(|dir| self.wall_along(at, dir, radius).is_none())
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Analytic probe used by unit tests: a flat ground plane plus axis-aligned wall slabs.

    use super::*;

    /// Vertical wall slab spanning `min..max` on the ground plane, infinitely tall.
    #[derive(Clone, Copy, Debug)]
    pub struct WallBox {
        pub min_x: f32,
        pub max_x: f32,
        pub min_z: f32,
        pub max_z: f32,
    }

    #[derive(Clone, Debug, Default)]
    pub struct StubProbe {
        pub ground_y: Option<f32>,
        pub walls: Vec<WallBox>,
    }

    impl StubProbe {
        pub fn flat(ground_y: f32) -> Self {
            Self {
                ground_y: Some(ground_y),
                walls: Vec::new(),
            }
        }

        pub fn with_wall(mut self, wall: WallBox) -> Self {
            self.walls.push(wall);
            self
        }

        fn cast_walls(&self, origin: &Vec3, dir: &Vec3, max_dist: f32) -> Option<RayHit> {
            let mut best: Option<RayHit> = None;
            for w in &self.walls {
                // Slab test on X and Z.
                let mut t_enter = 0.0f32;
                let mut t_exit = max_dist;
                let mut normal = Vec3::zeros();
                for (o, d, lo, hi, axis) in [
                    (origin.x, dir.x, w.min_x, w.max_x, Vec3::x()),
                    (origin.z, dir.z, w.min_z, w.max_z, Vec3::z()),
                ] {
                    if d.abs() < 1.0e-9 {
                        if o < lo || o > hi {
                            t_enter = f32::INFINITY;
                        }
                        continue;
                    }
                    let (t0, t1) = ((lo - o) / d, (hi - o) / d);
                    let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
                    if near > t_enter {
                        t_enter = near;
                        normal = if d > 0.0 { -axis } else { axis };
                    }
                    t_exit = t_exit.min(far);
                }
                if t_enter <= t_exit && t_enter.is_finite() && t_enter > 0.0 {
                    if best.map_or(true, |b| t_enter < b.distance) {
                        best = Some(RayHit {
                            point: origin + dir * t_enter,
                            normal,
                            distance: t_enter,
                        });
                    }
                }
            }
            best
        }
    }

    impl SurfaceProbe for StubProbe {
        fn cast(
            &self,
            set: SurfaceSet,
            origin: &Vec3,
            dir: &Vec3,
            max_dist: f32,
        ) -> Option<RayHit> {
            let dir = dir.try_normalize(1.0e-6)?;
            match set {
                SurfaceSet::Ground => {
                    let gy = self.ground_y?;
                    if dir.y >= 0.0 || origin.y < gy {
                        return None;
                    }
                    let t = (origin.y - gy) / -dir.y;
                    (t <= max_dist).then(|| RayHit {
                        point: origin + dir * t,
                        normal: Vec3::y(),
                        distance: t,
                    })
                }
                SurfaceSet::Walls => self.cast_walls(origin, &dir, max_dist),
            }
        }

        fn has_set(&self, set: SurfaceSet) -> bool {
            match set {
                SurfaceSet::Ground => self.ground_y.is_some(),
                SurfaceSet::Walls => !self.walls.is_empty(),
            }
        }
    }
}
