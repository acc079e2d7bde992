//! Ground conformance and wall bumps for a car body.

use crate::{
    collision::{RayHit, SurfaceProbe, SurfaceSet},
    config::ProbeSettings,
    utils::{Vec3, approach, forward_from_yaw, right_from_yaw},
};

/// Wheel corners in a fixed order: front-left, front-right, rear-left, rear-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::FrontLeft,
        Corner::FrontRight,
        Corner::RearLeft,
        Corner::RearRight,
    ];

    pub fn is_front(self) -> bool {
        matches!(self, Corner::FrontLeft | Corner::FrontRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::FrontLeft | Corner::RearLeft)
    }

    /// World-space footprint of this wheel for a body at `position` facing `yaw`.
    pub fn footprint(self, position: &Vec3, yaw: f32, probe: &ProbeSettings) -> Vec3 {
        let along = if self.is_front() {
            probe.wheel_front_m
        } else {
            -probe.wheel_rear_m
        };
        let side = if self.is_left() {
            -probe.wheel_side_m
        } else {
            probe.wheel_side_m
        };
        position + forward_from_yaw(yaw) * along + right_from_yaw(yaw) * side
    }
}

/// Result of sampling the ground under the four wheels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroundStance {
    /// Ground height under each wheel, in [`Corner::ALL`] order.
    pub heights: [Option<f32>; 4],
}

impl GroundStance {
    pub fn grounded(&self) -> usize {
        self.heights.iter().flatten().count()
    }

    pub fn mean_height(&self) -> Option<f32> {
        let n = self.grounded();
        (n > 0).then(|| self.heights.iter().flatten().sum::<f32>() / n as f32)
    }

    fn average(&self, pick: impl Fn(Corner) -> bool) -> Option<f32> {
        let picked: Vec<f32> = Corner::ALL
            .iter()
            .zip(self.heights.iter())
            .filter(|(c, _)| pick(**c))
            .filter_map(|(_, h)| *h)
            .collect();
        (!picked.is_empty()).then(|| picked.iter().sum::<f32>() / picked.len() as f32)
    }

    /// Nose-up pitch from front and rear axle heights.
    pub fn pitch(&self, probe: &ProbeSettings) -> Option<f32> {
        let front = self.average(Corner::is_front)?;
        let rear = self.average(|c| !c.is_front())?;
        Some((front - rear).atan2(probe.wheel_front_m + probe.wheel_rear_m))
    }

    /// Roll raising the right side when the right wheels sit higher.
    pub fn roll(&self, probe: &ProbeSettings) -> Option<f32> {
        let left = self.average(Corner::is_left)?;
        let right = self.average(|c| !c.is_left())?;
        Some((right - left).atan2(probe.wheel_side_m * 2.0))
    }
}

/// Cast the four wheel rays.
pub fn sample_stance<P: SurfaceProbe + ?Sized>(
    probe: &P,
    position: &Vec3,
    yaw: f32,
    settings: &ProbeSettings,
) -> GroundStance {
    let mut heights = [None; 4];
    for (slot, corner) in heights.iter_mut().zip(Corner::ALL) {
        let foot = corner.footprint(position, yaw, settings);
        *slot = probe
            .ground_below_from(
                foot.x,
                foot.z,
                foot.y + settings.wheel_ray_lift_m,
                settings.wheel_ray_range_m,
            )
            .map(|hit| hit.point.y);
    }
    GroundStance { heights }
}

/// Height and tilt the body should take this tick, if the stance allows one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conformance {
    pub height: f32,
    pub pitch: f32,
    /// Terrain roll, without the suspension term.
    pub roll: f32,
}

/// Fit the body to the terrain under its wheels.
///
/// - No ground set registered: rest at the flat reference height, level.
/// - Fewer than `min_grounded_wheels` hits: `None`, the body keeps its height and tilt.
pub fn conform<P: SurfaceProbe + ?Sized>(
    probe: &P,
    position: &Vec3,
    yaw: f32,
    settings: &ProbeSettings,
    flat_ground_y: f32,
) -> Option<Conformance> {
    if !probe.has_set(SurfaceSet::Ground) {
        return Some(Conformance {
            height: flat_ground_y + settings.ride_clearance_m,
            pitch: 0.0,
            roll: 0.0,
        });
    }

    let stance = sample_stance(probe, position, yaw, settings);
    if stance.grounded() < settings.min_grounded_wheels {
        return None;
    }
    Some(Conformance {
        height: stance.mean_height()? + settings.ride_clearance_m,
        pitch: stance.pitch(settings).unwrap_or(0.0),
        roll: stance.roll(settings).unwrap_or(0.0),
    })
}

/// Body roll from cornering: leans away from the turn, smoothed over time.
pub fn suspension_roll(current: f32, yaw_rate: f32, settings: &ProbeSettings, dt: f32) -> f32 {
    let limit = settings.max_suspension_roll_rad;
    let target = (-yaw_rate * settings.roll_per_yaw_rate).clamp(-limit, limit);
    approach(current, target, settings.suspension_roll_tau_s, dt)
}

/// Which end of the car touched a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallSide {
    Front,
    Rear,
}

/// A wall close enough to bump into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallBump {
    pub side: WallSide,
    pub hit: RayHit,
    /// `|vx|` on contact, before the bounce.
    pub speed: f32,
}

/// Probe for walls just ahead of and just behind the car.
///
/// Ray length grows with `|vx|`; only hits nearer than `wall_hit_distance_m` count.
/// Returns the front bump first when both ends touch.
pub fn wall_bumps<P: SurfaceProbe + ?Sized>(
    probe: &P,
    position: &Vec3,
    yaw: f32,
    vx: f32,
    settings: &ProbeSettings,
) -> Vec<WallBump> {
    if !probe.has_set(SurfaceSet::Walls) {
        return Vec::new();
    }
    let forward = forward_from_yaw(yaw);
    let lifted = position + Vec3::y() * settings.wall_ray_height_m;
    let ray_len = settings
        .wall_ray_min_m
        .max(vx.abs() * settings.wall_ray_speed_factor);

    let rays = [
        (WallSide::Front, lifted + forward * settings.wall_front_offset_m, forward),
        (WallSide::Rear, lifted - forward * settings.wall_rear_offset_m, -forward),
    ];
    rays.into_iter()
        .filter_map(|(side, origin, dir)| {
            probe
                .wall_along(&origin, &dir, ray_len)
                .filter(|hit| hit.distance < settings.wall_hit_distance_m)
                .map(|hit| WallBump {
                    side,
                    hit,
                    speed: vx.abs(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::probe::stub::{StubProbe, WallBox};
    use approx::assert_relative_eq;

    /// Ground whose height depends on x: a ramp rising toward +x.
    struct Ramp {
        slope: f32,
    }

    impl SurfaceProbe for Ramp {
        fn cast(
            &self,
            set: SurfaceSet,
            origin: &Vec3,
            dir: &Vec3,
            max_dist: f32,
        ) -> Option<RayHit> {
            if set != SurfaceSet::Ground || dir.y >= 0.0 {
                return None;
            }
            let gy = origin.x * self.slope;
            let t = origin.y - gy;
            (t >= 0.0 && t <= max_dist).then(|| RayHit {
                point: Vec3::new(origin.x, gy, origin.z),
                normal: Vec3::y(),
                distance: t,
            })
        }

        fn has_set(&self, set: SurfaceSet) -> bool {
            set == SurfaceSet::Ground
        }
    }

    #[test]
    fn footprints_follow_yaw() {
        let settings = ProbeSettings::default();
        let fl = Corner::FrontLeft.footprint(&Vec3::zeros(), 0.0, &settings);
        assert_relative_eq!(fl, Vec3::new(-0.7, 0.0, -1.0), epsilon = 1.0e-6);
        let rr = Corner::RearRight.footprint(&Vec3::zeros(), 0.0, &settings);
        assert_relative_eq!(rr, Vec3::new(0.7, 0.0, 1.0), epsilon = 1.0e-6);
    }

    #[test]
    fn flat_ground_gives_level_body() {
        let probe = StubProbe::flat(2.0);
        let settings = ProbeSettings::default();
        let c = conform(&probe, &Vec3::new(0.0, 2.5, 0.0), 0.3, &settings, 0.0).unwrap();
        assert_relative_eq!(c.height, 2.05, epsilon = 1.0e-5);
        assert_relative_eq!(c.pitch, 0.0, epsilon = 1.0e-6);
        assert_relative_eq!(c.roll, 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn ramp_toward_the_right_rolls_the_body() {
        // Facing -Z, the car's right is +X, which is uphill.
        let probe = Ramp { slope: 0.1 };
        let settings = ProbeSettings::default();
        let c = conform(&probe, &Vec3::new(0.0, 1.0, 0.0), 0.0, &settings, 0.0).unwrap();
        assert_relative_eq!(c.roll, (0.14f32).atan2(1.4), epsilon = 1.0e-5);
        assert_relative_eq!(c.pitch, 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn ramp_ahead_pitches_nose_up() {
        // Facing +X (yaw -90°) the ramp rises ahead.
        let probe = Ramp { slope: 0.1 };
        let settings = ProbeSettings::default();
        let yaw = -std::f32::consts::FRAC_PI_2;
        let c = conform(&probe, &Vec3::new(0.0, 1.0, 0.0), yaw, &settings, 0.0).unwrap();
        assert_relative_eq!(c.pitch, (0.2f32).atan2(2.0), epsilon = 1.0e-5);
    }

    #[test]
    fn too_few_wheels_leaves_body_alone() {
        // Ground exists but everything is out of ray range.
        let probe = StubProbe::flat(-50.0);
        let settings = ProbeSettings::default();
        assert!(conform(&probe, &Vec3::zeros(), 0.0, &settings, 0.0).is_none());
    }

    #[test]
    fn no_ground_set_uses_flat_height() {
        let probe = StubProbe::default();
        let settings = ProbeSettings::default();
        let c = conform(&probe, &Vec3::new(0.0, 7.0, 0.0), 0.0, &settings, 1.0).unwrap();
        assert_relative_eq!(c.height, 1.05, epsilon = 1.0e-6);
    }

    #[test]
    fn suspension_roll_leans_out_of_turn() {
        let settings = ProbeSettings::default();
        let mut roll = 0.0;
        for _ in 0..600 {
            roll = suspension_roll(roll, 1.0, &settings, 1.0 / 60.0);
        }
        assert_relative_eq!(roll, -0.08, epsilon = 1.0e-4);
        let capped = suspension_roll(0.0, -100.0, &settings, 100.0);
        assert_relative_eq!(capped, settings.max_suspension_roll_rad, epsilon = 1.0e-5);
    }

    #[test]
    fn wall_ahead_is_reported_only_when_close() {
        let probe = StubProbe::flat(0.0).with_wall(WallBox {
            min_x: -5.0,
            max_x: 5.0,
            min_z: -3.0,
            max_z: -2.0,
        });
        let settings = ProbeSettings::default();
        // Front ray starts at z = -1.5, wall face at z = -2.0: 0.5 away.
        let bumps = wall_bumps(&probe, &Vec3::new(0.0, 0.0, -1.0), 0.0, 3.0, &settings);
        assert_eq!(bumps.len(), 1);
        assert_eq!(bumps[0].side, WallSide::Front);
        assert_relative_eq!(bumps[0].hit.normal, Vec3::z(), epsilon = 1.0e-6);

        let far = wall_bumps(&probe, &Vec3::new(0.0, 0.0, 0.0), 0.0, 3.0, &settings);
        assert!(far.is_empty());
    }
}
