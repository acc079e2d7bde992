//! Engine speed, automatic gearbox, torque curve and longitudinal forces.

use crate::config::VehicleParams;
use std::f32::consts::TAU;

/// Wheel revolutions per minute at longitudinal speed `vx` (direction ignored).
pub fn wheel_rpm(vx: f32, tire_radius: f32) -> f32 {
    vx.abs() / (TAU * tire_radius) * 60.0
}

/// Ratio of the engaged gear. Reversing always uses the reverse ratio.
pub fn gear_ratio(gear: u8, reversing: bool, params: &VehicleParams) -> f32 {
    if reversing {
        return params.reverse_ratio;
    }
    let idx = usize::from(gear.max(1) - 1).min(params.gear_ratios.len().saturating_sub(1));
    params.gear_ratios.get(idx).copied().unwrap_or(params.reverse_ratio)
}

/// Engine speed from wheel speed through the gearbox and final drive, floored at idle.
pub fn engine_rpm(wheel_rpm: f32, ratio: f32, params: &VehicleParams) -> f32 {
    (wheel_rpm * ratio * params.final_drive_ratio).max(params.idle_rpm)
}

/// Gear after this tick's shift decision.
///
/// Moves at most one gear per call, stays within `1..=top_gear`, and is pinned to 1
/// while reversing.
pub fn select_gear(gear: u8, rpm: f32, reversing: bool, params: &VehicleParams) -> u8 {
    if reversing {
        return 1;
    }
    let top = params.top_gear();
    let gear = gear.clamp(1, top);
    if rpm > params.redline_rpm * params.shift_up_fraction && gear < top {
        gear + 1
    } else if rpm < params.redline_rpm * params.shift_down_fraction && gear > 1 {
        gear - 1
    } else {
        gear
    }
}

/// Fraction of peak torque available at `rpm`.
///
/// Ramps 0.85 to 1.0 from idle to 1500 RPM, flat to 6000 RPM, then falls off toward 0.7.
/// Reverse is always flat.
pub fn torque_curve(rpm: f32, reversing: bool, idle_rpm: f32) -> f32 {
    if reversing {
        return 1.0;
    }
    let rpm = rpm.max(idle_rpm);
    if rpm < 1500.0 {
        let span = (1500.0 - idle_rpm).max(1.0);
        (0.85 + (rpm - idle_rpm) / span * 0.15).min(1.0)
    } else if rpm < 6000.0 {
        1.0
    } else {
        (1.0 - (rpm - 6000.0) / 1000.0 * 0.15).max(0.7)
    }
}

/// Longitudinal tractive force at the contact patch (N), clamped to the configured range.
pub fn drive_force(throttle: f32, rpm: f32, ratio: f32, params: &VehicleParams) -> f32 {
    if throttle == 0.0 {
        return 0.0;
    }
    let reversing = throttle < 0.0;
    let torque = params.peak_torque_nm * torque_curve(rpm, reversing, params.idle_rpm) * throttle;
    let force = torque * ratio * params.final_drive_ratio / params.tire_radius_m;
    if reversing {
        let limit = params.reverse_drive_force_limit_n;
        force.clamp(-limit, limit)
    } else {
        force.clamp(params.drive_force_min_n, params.drive_force_max_n)
    }
}

/// Brake force opposing `vx` (N). Zero inside the speed deadband.
pub fn brake_force(brake: f32, vx: f32, speed: f32, params: &VehicleParams) -> f32 {
    if brake <= 0.0 || speed <= params.brake_deadband_mps {
        return 0.0;
    }
    let magnitude = (vx.abs() * params.brake_force_per_mps).min(params.brake_force_max_n);
    -vx.signum() * magnitude * brake.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn engine_never_drops_below_idle() {
        let params = VehicleParams::default();
        assert_relative_eq!(engine_rpm(0.0, 3.635, &params), 1000.0);
        let at_10 = engine_rpm(wheel_rpm(10.0, params.tire_radius_m), 3.635, &params);
        assert!(at_10 > 4000.0);
    }

    #[rstest]
    #[case(1, 5000.0, 2)]
    #[case(1, 4800.0, 1)]
    #[case(3, 2700.0, 2)]
    #[case(1, 1000.0, 1)]
    #[case(6, 6900.0, 6)]
    fn shifts_one_gear_at_a_time(#[case] gear: u8, #[case] rpm: f32, #[case] expected: u8) {
        assert_eq!(select_gear(gear, rpm, false, &VehicleParams::default()), expected);
    }

    #[test]
    fn reversing_pins_first_gear() {
        let params = VehicleParams::default();
        assert_eq!(select_gear(4, 3000.0, true, &params), 1);
        assert_relative_eq!(gear_ratio(4, true, &params), 3.5);
    }

    #[rstest]
    #[case(1000.0, 0.85)]
    #[case(1250.0, 0.925)]
    #[case(3000.0, 1.0)]
    #[case(7000.0, 0.85)]
    #[case(9000.0, 0.7)]
    fn torque_curve_shape(#[case] rpm: f32, #[case] expected: f32) {
        assert_relative_eq!(torque_curve(rpm, false, 1000.0), expected, epsilon = 1.0e-5);
    }

    #[test]
    fn drive_force_is_clamped() {
        let params = VehicleParams::default();
        let f = drive_force(1.0, 3000.0, 3.635, &params);
        assert_relative_eq!(f, 228.0 * 3.635 * 4.1 / 0.32, epsilon = 1.0e-2);
        assert_relative_eq!(drive_force(1.0, 3000.0, 6.0, &params), 16000.0);

        let r = drive_force(-1.0, 1000.0, params.reverse_ratio, &params);
        assert_relative_eq!(r, -228.0 * 3.5 * 4.1 / 0.32, epsilon = 1.0e-2);
        assert_relative_eq!(drive_force(-1.0, 1000.0, 9.0, &params), -25000.0);
        assert_relative_eq!(drive_force(0.0, 3000.0, 3.635, &params), 0.0);
    }

    #[test]
    fn brake_opposes_motion_with_deadband() {
        let params = VehicleParams::default();
        assert_relative_eq!(brake_force(1.0, 20.0, 20.0, &params), -20000.0);
        assert_relative_eq!(brake_force(1.0, -2.0, 2.0, &params), 6000.0);
        assert_relative_eq!(brake_force(1.0, 0.05, 0.05, &params), 0.0);
    }
}
