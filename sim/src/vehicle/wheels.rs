use super::terrain::Corner;
use crate::utils::{Quat, Vec3};
use std::f32::consts::TAU;

/// Visual pose of one wheel relative to the car body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelPose {
    pub corner: Corner,
    /// Steering angle about the wheel's vertical axis (front wheels only).
    pub steer: f32,
    /// Rolling angle about the axle, in `[0, 2π)`.
    pub roll: f32,
    /// Steer applied first, then roll, so neither disturbs the other.
    pub rotation: Quat,
}

/// Rolling angle for the accumulated travel distance.
pub fn roll_angle(travel: f32, tire_radius: f32) -> f32 {
    (travel / tire_radius).rem_euclid(TAU)
}

/// Poses for all four wheels. `steer` is the displayed steering angle.
pub fn wheel_poses(travel: f32, tire_radius: f32, steer: f32) -> [WheelPose; 4] {
    let roll = roll_angle(travel, tire_radius);
    Corner::ALL.map(|corner| {
        let steer = if corner.is_front() { steer } else { 0.0 };
        WheelPose {
            corner,
            steer,
            roll,
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), steer)
                * Quat::from_axis_angle(&Vec3::x_axis(), roll),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn roll_wraps_both_directions() {
        let r = 0.32;
        assert_relative_eq!(roll_angle(TAU * r + 0.32, r), 1.0, epsilon = 1.0e-4);
        let back = roll_angle(-0.32, r);
        assert_relative_eq!(back, TAU - 1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn only_front_wheels_steer() {
        let poses = wheel_poses(0.0, 0.32, 0.4);
        for pose in poses {
            let expected = if pose.corner.is_front() { 0.4 } else { 0.0 };
            assert_relative_eq!(pose.steer, expected);
        }
    }

    #[test]
    fn steer_does_not_change_roll_axis() {
        let poses = wheel_poses(1.0, 0.32, 0.5);
        let axle = poses[0].rotation * Vec3::x();
        let expected = Quat::from_axis_angle(&Vec3::y_axis(), 0.5) * Vec3::x();
        assert_relative_eq!(axle, expected, epsilon = 1.0e-5);
    }
}
