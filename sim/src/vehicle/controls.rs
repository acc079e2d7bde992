use crate::{config::VehicleParams, utils::approach};

/// Driving keys held this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverInput {
    pub forward: bool,
    pub reverse: bool,
    pub brake: bool,
    pub left: bool,
    pub right: bool,
}

/// Pedal positions after input mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pedals {
    /// `1` forward, `0` idle, `-1` backing up.
    pub throttle: f32,
    pub brake: f32,
    pub backing_up: bool,
}

/// Map held keys to pedals.
///
/// The reverse key is a small state machine:
/// - moving faster than `reverse_engage_speed_mps` it only brakes,
/// - nearly stopped it latches `backing_up` and drives backwards,
/// - once latched it keeps backing up until the key is released.
pub fn map_pedals(
    input: &DriverInput,
    speed: f32,
    backing_up: bool,
    params: &VehicleParams,
) -> Pedals {
    let throttle = if input.forward { 1.0 } else { 0.0 };

    if !input.reverse {
        return Pedals {
            throttle,
            brake: if input.brake { 1.0 } else { 0.0 },
            backing_up: false,
        };
    }

    if backing_up || speed <= params.reverse_engage_speed_mps {
        Pedals {
            throttle: -1.0,
            brake: 0.0,
            backing_up: true,
        }
    } else {
        Pedals {
            throttle: 0.0,
            brake: 1.0,
            backing_up: false,
        }
    }
}

/// Steering target in `{-1, 0, 1}`; positive steers left.
pub fn steer_target(input: &DriverInput) -> f32 {
    match (input.left, input.right) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Smooth the steering position toward its target.
pub fn smooth_steer(current: f32, target: f32, tau: f32, dt: f32) -> f32 {
    approach(current, target, tau, dt).clamp(-1.0, 1.0)
}

/// Steering lock at `speed`: full lock up to the taper start, then shrinking linearly
/// toward `steer_min_rad`.
pub fn max_steer_angle(speed: f32, params: &VehicleParams) -> f32 {
    if speed < params.steer_taper_start_mps {
        return params.steer_max_rad;
    }
    let span = params.steer_taper_span_mps.max(f32::EPSILON);
    let t = (1.0 - (speed - params.steer_taper_start_mps) / span).max(0.0);
    params.steer_min_rad + (params.steer_max_rad - params.steer_min_rad) * t
}

/// Road-wheel angle for a steering position. Flipped while rolling backwards.
pub fn steer_angle(steer: f32, speed: f32, vx: f32, params: &VehicleParams) -> f32 {
    let angle = steer * max_steer_angle(speed, params);
    if vx < 0.0 { -angle } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn reverse_held() -> DriverInput {
        DriverInput {
            reverse: true,
            ..DriverInput::default()
        }
    }

    #[test]
    fn reverse_at_speed_only_brakes() {
        let p = map_pedals(&reverse_held(), 20.0, false, &VehicleParams::default());
        assert_eq!(
            p,
            Pedals {
                throttle: 0.0,
                brake: 1.0,
                backing_up: false
            }
        );
    }

    #[test]
    fn reverse_near_stop_backs_up_and_latches() {
        let params = VehicleParams::default();
        let p = map_pedals(&reverse_held(), 0.3, false, &params);
        assert!(p.backing_up);
        assert_relative_eq!(p.throttle, -1.0);

        // Latched: keeps reversing even once speed builds up.
        let p = map_pedals(&reverse_held(), 2.5, true, &params);
        assert!(p.backing_up);
        assert_relative_eq!(p.throttle, -1.0);

        // Released: latch clears.
        let p = map_pedals(&DriverInput::default(), 2.5, true, &params);
        assert!(!p.backing_up);
        assert_relative_eq!(p.throttle, 0.0);
    }

    #[rstest]
    #[case(true, false, 1.0)]
    #[case(false, true, -1.0)]
    #[case(true, true, 0.0)]
    #[case(false, false, 0.0)]
    fn steer_target_from_keys(#[case] left: bool, #[case] right: bool, #[case] expected: f32) {
        let input = DriverInput {
            left,
            right,
            ..DriverInput::default()
        };
        assert_relative_eq!(steer_target(&input), expected);
    }

    #[rstest]
    #[case(0.0, 0.7)]
    #[case(9.9, 0.7)]
    #[case(10.0, 0.7)]
    #[case(35.0, 0.5)]
    #[case(60.0, 0.3)]
    #[case(120.0, 0.3)]
    fn steering_lock_shrinks_with_speed(#[case] speed: f32, #[case] expected: f32) {
        assert_relative_eq!(
            max_steer_angle(speed, &VehicleParams::default()),
            expected,
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn steer_angle_flips_in_reverse() {
        let params = VehicleParams::default();
        assert_relative_eq!(steer_angle(1.0, 1.0, 1.0, &params), 0.7);
        assert_relative_eq!(steer_angle(1.0, 1.0, -1.0, &params), -0.7);
    }

    #[test]
    fn steering_smoothing_is_step_size_independent() {
        let tau = VehicleParams::default().steer_tau_s;
        let mut coarse = 0.0;
        for _ in 0..5 {
            coarse = smooth_steer(coarse, 1.0, tau, 0.02);
        }
        let mut fine = 0.0;
        for _ in 0..50 {
            fine = smooth_steer(fine, 1.0, tau, 0.002);
        }
        assert_relative_eq!(coarse, fine, epsilon = 1.0e-4);
    }
}
