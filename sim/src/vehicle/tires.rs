use crate::{SLIP_SPEED_FLOOR_MPS, config::VehicleParams};

/// Front and rear slip angles and the lateral forces they produce.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TireForces {
    pub slip_front: f32,
    pub slip_rear: f32,
    pub front: f32,
    pub rear: f32,
}

/// Bicycle-model lateral tire forces.
///
/// `vy` is positive toward the car's left, as is `steer_angle`. The longitudinal speed
/// in the slip denominator is floored so a stationary car never divides by zero.
pub fn lateral_forces(
    vx: f32,
    vy: f32,
    yaw_rate: f32,
    steer_angle: f32,
    params: &VehicleParams,
) -> TireForces {
    let half_base = params.wheelbase_m * 0.5;
    let denom = vx.abs().max(SLIP_SPEED_FLOOR_MPS);

    let slip_front = (vy + half_base * yaw_rate).atan2(denom) - steer_angle;
    let slip_rear = (vy - half_base * yaw_rate).atan2(denom);

    let (limit, scale) = (params.max_slip_rad, params.lateral_force_scale);
    let front = -slip_front.clamp(-limit, limit).sin() * params.grip_front * scale;
    let rear = -slip_rear.clamp(-limit, limit).sin() * params.grip_rear * scale;

    TireForces {
        slip_front,
        slip_rear,
        front,
        rear,
    }
}

impl TireForces {
    /// Net lateral force on the body (N).
    pub fn lateral(&self, steer_angle: f32) -> f32 {
        self.front * steer_angle.cos() + self.rear
    }

    /// Yaw torque about the vertical axis (N·m).
    pub fn yaw_torque(&self, steer_angle: f32, wheelbase: f32) -> f32 {
        wheelbase * 0.5 * (self.front * steer_angle.cos() - self.rear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_running_has_no_lateral_force() {
        let f = lateral_forces(15.0, 0.0, 0.0, 0.0, &VehicleParams::default());
        assert_relative_eq!(f.front, 0.0);
        assert_relative_eq!(f.rear, 0.0);
    }

    #[test]
    fn left_steer_pulls_left_and_yaws_left() {
        let params = VehicleParams::default();
        let f = lateral_forces(10.0, 0.0, 0.0, 0.2, &params);
        assert!(f.front > 0.0);
        assert!(f.lateral(0.2) > 0.0);
        assert!(f.yaw_torque(0.2, params.wheelbase_m) > 0.0);
    }

    #[test]
    fn slip_is_saturated() {
        let params = VehicleParams::default();
        let f = lateral_forces(1.0, 50.0, 0.0, 0.0, &params);
        let cap = 0.35f32.sin() * params.grip_rear * params.lateral_force_scale;
        assert_relative_eq!(f.rear, -cap, epsilon = 1.0e-2);
    }

    #[test]
    fn stationary_car_stays_finite() {
        let f = lateral_forces(0.0, 0.0, 1.0, 0.5, &VehicleParams::default());
        assert!(f.front.is_finite() && f.rear.is_finite());
    }
}
