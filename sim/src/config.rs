//! Tunable parameters for every actor kind.
//!
//! Conventions
//! - Decays are "fraction remaining after one second" and are applied as `keep.powf(dt)`.
//! - Smoothing rates are time constants in seconds (`alpha = 1 - exp(-dt / tau)`).
//! - Per-frame values measured at 60 Hz are converted with [`per_second`].
//!
//! Every struct is `#[serde(default)]`, so a scenario file only needs to list the
//! fields it overrides.

use crate::{
    FLAT_GROUND_HEIGHT, GRAVITY_MPS2, IMPACT_MIN_VEHICLE_SPEED_MPS, REFERENCE_HZ,
    TERMINAL_FALL_SPEED_MPS,
    error::{SimError, ensure_fraction, ensure_positive},
};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Convert a "fraction kept per 60 Hz frame" into "fraction kept per second".
pub fn per_second(per_frame: f32) -> f32 {
    per_frame.powf(REFERENCE_HZ)
}

/// Time constant equivalent to blending `per_frame` of the gap every 60 Hz frame.
pub fn tau_from_per_frame(per_frame: f32) -> f32 {
    -1.0 / (REFERENCE_HZ * (1.0 - per_frame).ln())
}

/// Drivetrain, tire and steering constants for a car.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub mass_kg: f32,
    pub peak_torque_nm: f32,
    pub idle_rpm: f32,
    pub redline_rpm: f32,
    pub wheelbase_m: f32,
    pub tire_radius_m: f32,
    pub yaw_inertia: f32,

    /// Forward gear ratios, first gear first.
    pub gear_ratios: Vec<f32>,
    pub reverse_ratio: f32,
    pub final_drive_ratio: f32,
    /// Shift up above this fraction of redline.
    pub shift_up_fraction: f32,
    /// Shift down below this fraction of redline.
    pub shift_down_fraction: f32,

    pub grip_front: f32,
    pub grip_rear: f32,
    pub lateral_force_scale: f32,
    pub max_slip_rad: f32,

    pub drive_force_min_n: f32,
    pub drive_force_max_n: f32,
    /// Symmetric clamp applied while reversing.
    pub reverse_drive_force_limit_n: f32,

    pub brake_force_max_n: f32,
    pub brake_force_per_mps: f32,
    /// Brakes do nothing below this speed (m/s).
    pub brake_deadband_mps: f32,

    pub steer_max_rad: f32,
    pub steer_min_rad: f32,
    /// Speed at which the steering lock starts to shrink (m/s).
    pub steer_taper_start_mps: f32,
    /// Speed span over which the lock shrinks to `steer_min_rad` (m/s).
    pub steer_taper_span_mps: f32,
    pub steer_tau_s: f32,
    pub driverless_steer_tau_s: f32,

    /// Holding reverse above this speed brakes instead of backing up (m/s).
    pub reverse_engage_speed_mps: f32,
    pub reverse_speed_cap_mps: f32,

    pub longitudinal_keep: f32,
    pub reverse_longitudinal_keep: f32,
    pub driverless_longitudinal_keep: f32,
    pub lateral_keep: f32,
    pub yaw_rate_keep: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass_kg: 1250.0,
            peak_torque_nm: 228.0,
            idle_rpm: 1000.0,
            redline_rpm: 7000.0,
            wheelbase_m: 2.6,
            tire_radius_m: 0.32,
            yaw_inertia: 2500.0,

            gear_ratios: vec![3.635, 2.188, 1.562, 1.194, 1.0, 0.888],
            reverse_ratio: 3.5,
            final_drive_ratio: 4.1,
            shift_up_fraction: 0.7,
            shift_down_fraction: 0.4,

            grip_front: 1.6,
            grip_rear: 1.4,
            lateral_force_scale: 8000.0,
            max_slip_rad: 0.35,

            drive_force_min_n: -4000.0,
            drive_force_max_n: 16000.0,
            reverse_drive_force_limit_n: 25000.0,

            brake_force_max_n: 20000.0,
            brake_force_per_mps: 3000.0,
            brake_deadband_mps: 0.1,

            steer_max_rad: 0.7,
            steer_min_rad: 0.3,
            steer_taper_start_mps: 10.0,
            steer_taper_span_mps: 50.0,
            steer_tau_s: tau_from_per_frame(0.25),
            driverless_steer_tau_s: 0.3,

            reverse_engage_speed_mps: 0.5,
            reverse_speed_cap_mps: 2.78,

            longitudinal_keep: per_second(0.9992),
            reverse_longitudinal_keep: per_second(0.9999),
            driverless_longitudinal_keep: per_second(0.98),
            lateral_keep: per_second(0.97),
            yaw_rate_keep: per_second(0.97),
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_positive("vehicle.mass_kg", self.mass_kg)?;
        ensure_positive("vehicle.peak_torque_nm", self.peak_torque_nm)?;
        ensure_positive("vehicle.idle_rpm", self.idle_rpm)?;
        ensure_positive("vehicle.wheelbase_m", self.wheelbase_m)?;
        ensure_positive("vehicle.tire_radius_m", self.tire_radius_m)?;
        ensure_positive("vehicle.yaw_inertia", self.yaw_inertia)?;
        ensure_positive("vehicle.reverse_ratio", self.reverse_ratio)?;
        ensure_positive("vehicle.final_drive_ratio", self.final_drive_ratio)?;
        ensure_positive("vehicle.max_slip_rad", self.max_slip_rad)?;
        ensure_positive("vehicle.reverse_speed_cap_mps", self.reverse_speed_cap_mps)?;

        if self.gear_ratios.is_empty() {
            return Err(SimError::param("vehicle.gear_ratios", "needs at least one gear"));
        }
        for &ratio in &self.gear_ratios {
            ensure_positive("vehicle.gear_ratios", ratio)?;
        }
        if self.redline_rpm <= self.idle_rpm {
            return Err(SimError::param("vehicle.redline_rpm", "must exceed idle_rpm"));
        }
        if self.shift_down_fraction >= self.shift_up_fraction {
            return Err(SimError::param(
                "vehicle.shift_down_fraction",
                "must be below shift_up_fraction",
            ));
        }
        if self.drive_force_min_n > self.drive_force_max_n {
            return Err(SimError::param(
                "vehicle.drive_force_min_n",
                "must not exceed drive_force_max_n",
            ));
        }

        ensure_fraction("vehicle.longitudinal_keep", self.longitudinal_keep)?;
        ensure_fraction("vehicle.reverse_longitudinal_keep", self.reverse_longitudinal_keep)?;
        ensure_fraction(
            "vehicle.driverless_longitudinal_keep",
            self.driverless_longitudinal_keep,
        )?;
        ensure_fraction("vehicle.lateral_keep", self.lateral_keep)?;
        ensure_fraction("vehicle.yaw_rate_keep", self.yaw_rate_keep)?;
        Ok(())
    }

    /// Highest forward gear (1-based).
    pub fn top_gear(&self) -> u8 {
        self.gear_ratios.len().min(u8::MAX as usize) as u8
    }
}

/// Where a car casts its terrain and wall rays, and how it reacts to them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Front axle distance ahead of the body origin (m).
    pub wheel_front_m: f32,
    /// Rear axle distance behind the body origin (m).
    pub wheel_rear_m: f32,
    /// Half track width (m).
    pub wheel_side_m: f32,
    /// Wheel rays start this far above the footprint (m).
    pub wheel_ray_lift_m: f32,
    pub wheel_ray_range_m: f32,
    /// Minimum grounded wheels for the body to conform to terrain.
    pub min_grounded_wheels: usize,
    pub ride_clearance_m: f32,

    pub wall_front_offset_m: f32,
    pub wall_rear_offset_m: f32,
    /// Wall rays leave the body this far above its origin (m).
    pub wall_ray_height_m: f32,
    pub wall_ray_min_m: f32,
    /// Wall ray length grows by `|vx|` times this factor.
    pub wall_ray_speed_factor: f32,
    /// A wall closer than this counts as a collision (m).
    pub wall_hit_distance_m: f32,
    /// Longitudinal velocity multiplier on a wall hit (negative bounces back).
    pub wall_bounce_factor: f32,
    pub wall_lateral_keep: f32,
    pub wall_yaw_rate_keep: f32,
    pub wall_push_m: f32,

    /// Suspension roll per unit yaw rate (rad per rad/s).
    pub roll_per_yaw_rate: f32,
    pub max_suspension_roll_rad: f32,
    pub suspension_roll_tau_s: f32,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            wheel_front_m: 1.0,
            wheel_rear_m: 1.0,
            wheel_side_m: 0.7,
            wheel_ray_lift_m: 3.0,
            wheel_ray_range_m: 10.0,
            min_grounded_wheels: 3,
            ride_clearance_m: 0.05,

            wall_front_offset_m: 0.5,
            wall_rear_offset_m: 1.0,
            wall_ray_height_m: 0.5,
            wall_ray_min_m: 1.5,
            wall_ray_speed_factor: 1.5,
            wall_hit_distance_m: 0.6,
            wall_bounce_factor: -0.15,
            wall_lateral_keep: 0.3,
            wall_yaw_rate_keep: 0.5,
            wall_push_m: 0.15,

            roll_per_yaw_rate: 0.08,
            max_suspension_roll_rad: PI / 12.0,
            suspension_roll_tau_s: tau_from_per_frame(0.1),
        }
    }
}

impl ProbeSettings {
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_positive("probe.wheel_front_m", self.wheel_front_m)?;
        ensure_positive("probe.wheel_rear_m", self.wheel_rear_m)?;
        ensure_positive("probe.wheel_side_m", self.wheel_side_m)?;
        ensure_positive("probe.wheel_ray_range_m", self.wheel_ray_range_m)?;
        ensure_positive("probe.wall_hit_distance_m", self.wall_hit_distance_m)?;
        if !(1..=4).contains(&self.min_grounded_wheels) {
            return Err(SimError::param("probe.min_grounded_wheels", "must be within 1..=4"));
        }
        ensure_fraction("probe.wall_lateral_keep", self.wall_lateral_keep)?;
        ensure_fraction("probe.wall_yaw_rate_keep", self.wall_yaw_rate_keep)?;
        Ok(())
    }
}

/// Shared shape of every loose rigid body (props, and NPCs while knocked down).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub mass_kg: f32,
    pub gravity_mps2: f32,
    /// Lower bound on vertical velocity (m/s, negative).
    pub terminal_fall_speed_mps: f32,
    pub linear_keep: f32,
    pub angular_keep: f32,
    /// Minimum gap kept between the body's lowest point and the ground (m).
    pub ground_clearance_m: f32,
    /// Below this total speed a grounded body settles (m/s).
    pub rest_speed_mps: f32,
    /// Extra spin decay applied while settling.
    pub rest_spin_keep: f32,
    pub wall_restitution: f32,
    pub wall_min_push_m: f32,
    pub wall_push_margin_m: f32,
    /// Planar offset of the four outer wall sample points (m).
    pub wall_sample_offset_m: f32,
    /// Wall rays look `|v_h| * dt * lookahead` ahead.
    pub wall_lookahead: f32,
    pub wall_ray_max_m: f32,
    /// No wall test below this horizontal speed (m/s).
    pub wall_min_speed_mps: f32,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            mass_kg: 5.0,
            gravity_mps2: GRAVITY_MPS2,
            terminal_fall_speed_mps: TERMINAL_FALL_SPEED_MPS,
            linear_keep: per_second(0.98),
            angular_keep: per_second(0.95),
            ground_clearance_m: 0.05,
            rest_speed_mps: 0.1,
            rest_spin_keep: per_second(0.85),
            wall_restitution: 0.4,
            wall_min_push_m: 0.15,
            wall_push_margin_m: 0.05,
            wall_sample_offset_m: 0.5,
            wall_lookahead: 2.0,
            wall_ray_max_m: 0.5,
            wall_min_speed_mps: 0.01,
        }
    }
}

impl BodyParams {
    pub fn validate(&self, prefix: &'static str) -> Result<(), SimError> {
        ensure_positive(prefix, self.mass_kg)?;
        if !(self.terminal_fall_speed_mps < 0.0) {
            return Err(SimError::param(prefix, "terminal fall speed must be negative"));
        }
        ensure_fraction(prefix, self.linear_keep)?;
        ensure_fraction(prefix, self.angular_keep)?;
        ensure_fraction(prefix, self.rest_spin_keep)?;
        ensure_fraction(prefix, self.wall_restitution)?;
        Ok(())
    }
}

/// Loose props and how cars knock them around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropParams {
    pub body: BodyParams,
    /// Ground snapping is suppressed for this long after spawning (s).
    pub spawn_grace_s: f32,
    /// The one-shot placement ray starts this far above the spawn point (m).
    pub initial_probe_lift_m: f32,
    /// A car closer than this (center to center) hits the prop (m).
    pub impact_radius_m: f32,
    pub impact_min_vehicle_speed_mps: f32,
    /// Velocity added along the car-to-prop direction, per unit car speed.
    pub impact_push_per_speed: f32,
    pub impact_lift_per_speed: f32,
    pub impact_spin_per_speed: f32,
    /// Minimum time between two impacts on the same prop (s).
    pub impact_cooldown_s: f32,
}

impl Default for PropParams {
    fn default() -> Self {
        Self {
            body: BodyParams::default(),
            spawn_grace_s: 10.0 / REFERENCE_HZ,
            initial_probe_lift_m: 10.0,
            impact_radius_m: 2.5,
            impact_min_vehicle_speed_mps: IMPACT_MIN_VEHICLE_SPEED_MPS,
            impact_push_per_speed: 0.8,
            impact_lift_per_speed: 0.6,
            impact_spin_per_speed: 1.5,
            impact_cooldown_s: 0.25,
        }
    }
}

impl PropParams {
    pub fn validate(&self) -> Result<(), SimError> {
        self.body.validate("prop.body")?;
        ensure_positive("prop.impact_radius_m", self.impact_radius_m)?;
        Ok(())
    }
}

/// Pedestrian NPCs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcParams {
    pub body: BodyParams,
    /// Half extents of the NPC's collision box (m).
    pub half_extents: [f32; 3],
    pub walk_speed_mps: f32,
    pub turn_interval_min_s: f32,
    pub turn_interval_max_s: f32,
    /// Length of the forward obstruction probe (m).
    pub forward_probe_m: f32,
    /// Height above the NPC origin at which the forward probe runs (m).
    pub probe_height_m: f32,

    pub impact_radius_m: f32,
    /// A car slower than this never knocks anyone down, however fast the NPC walks into it.
    pub impact_min_vehicle_speed_mps: f32,
    pub impact_min_relative_speed_mps: f32,
    /// Assumed duration of a car hitting a pedestrian (s).
    pub contact_time_s: f32,
    /// Knockback acceleration is capped at this many g.
    pub max_knockback_g: f32,
    /// Fraction of the knockback speed added upward.
    pub knockback_lift: f32,
    /// Spin added per m/s of knockback.
    pub knockback_spin: f32,
    pub impact_cooldown_s: f32,

    pub rest_linear_mps: f32,
    pub rest_angular_radps: f32,
    /// Speeds must stay below the rest thresholds this long before getting up (s).
    pub rest_duration_s: f32,
    pub recover_duration_s: f32,
}

impl Default for NpcParams {
    fn default() -> Self {
        Self {
            body: BodyParams {
                mass_kg: 70.0,
                ..BodyParams::default()
            },
            half_extents: [0.3, 0.9, 0.3],
            walk_speed_mps: 1.4,
            turn_interval_min_s: 3.0,
            turn_interval_max_s: 6.0,
            forward_probe_m: 1.0,
            probe_height_m: 0.0,

            impact_radius_m: 1.8,
            impact_min_vehicle_speed_mps: IMPACT_MIN_VEHICLE_SPEED_MPS,
            impact_min_relative_speed_mps: IMPACT_MIN_VEHICLE_SPEED_MPS,
            contact_time_s: 0.1,
            max_knockback_g: 9.0,
            knockback_lift: 0.3,
            knockback_spin: 0.8,
            impact_cooldown_s: 0.25,

            rest_linear_mps: 0.2,
            rest_angular_radps: 0.2,
            rest_duration_s: 1.5,
            recover_duration_s: 1.0,
        }
    }
}

impl NpcParams {
    pub fn validate(&self) -> Result<(), SimError> {
        self.body.validate("npc.body")?;
        for &h in &self.half_extents {
            ensure_positive("npc.half_extents", h)?;
        }
        ensure_positive("npc.walk_speed_mps", self.walk_speed_mps)?;
        ensure_positive("npc.turn_interval_min_s", self.turn_interval_min_s)?;
        if self.turn_interval_max_s < self.turn_interval_min_s {
            return Err(SimError::param(
                "npc.turn_interval_max_s",
                "must not be below turn_interval_min_s",
            ));
        }
        ensure_positive("npc.contact_time_s", self.contact_time_s)?;
        ensure_positive("npc.max_knockback_g", self.max_knockback_g)?;
        ensure_positive("npc.rest_duration_s", self.rest_duration_s)?;
        ensure_positive("npc.recover_duration_s", self.recover_duration_s)?;
        Ok(())
    }
}

/// On-foot controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerParams {
    pub eye_height_m: f32,
    /// Feet are considered this far below the eye for landing tests (m).
    pub foot_offset_m: f32,
    pub gravity_mps2: f32,
    pub jump_speed_mps: f32,
    pub move_speed_mps: f32,
    pub clearance_radius_m: f32,

    pub ground_sample_offset_m: f32,
    /// Ground samples start this far below the eye (m).
    pub ground_probe_drop_m: f32,
    pub ground_probe_range_m: f32,
    pub jump_probe_range_m: f32,
    /// Reach of the landing ray cast down from the feet while airborne (m).
    pub landing_probe_range_m: f32,
    /// Jumping is allowed within this distance of standing height (m).
    pub jump_tolerance_m: f32,
    /// A falling player lands once the feet are within this height of ground (m).
    pub land_tolerance_m: f32,

    /// Height easing per 60 Hz frame: `min(max, base + |gap| * gain)`.
    pub ease_base: f32,
    pub ease_gain: f32,
    pub ease_max: f32,
    pub ease_deadband_m: f32,

    pub footstep_interval_s: f32,
    pub look_sensitivity: f32,
    pub pitch_limit_rad: f32,

    pub enter_vehicle_distance_m: f32,
    pub exit_side_offset_m: f32,
    pub exit_probe_lift_m: f32,
    pub exit_probe_range_m: f32,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            eye_height_m: 1.6,
            foot_offset_m: 0.5,
            gravity_mps2: 12.6,
            jump_speed_mps: 5.5,
            move_speed_mps: 0.12 * REFERENCE_HZ,
            clearance_radius_m: 0.3,

            ground_sample_offset_m: 0.2,
            ground_probe_drop_m: 0.5,
            ground_probe_range_m: 3.0,
            jump_probe_range_m: 2.0,
            landing_probe_range_m: 5.0,
            jump_tolerance_m: 0.2,
            land_tolerance_m: 0.3,

            ease_base: 0.1,
            ease_gain: 0.1,
            ease_max: 0.3,
            ease_deadband_m: 0.01,

            footstep_interval_s: 0.4,
            look_sensitivity: 0.002,
            pitch_limit_rad: 89.0_f32.to_radians(),

            enter_vehicle_distance_m: 3.0,
            exit_side_offset_m: 2.0,
            exit_probe_lift_m: 2.0,
            exit_probe_range_m: 10.0,
        }
    }
}

impl PlayerParams {
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_positive("player.eye_height_m", self.eye_height_m)?;
        ensure_positive("player.gravity_mps2", self.gravity_mps2)?;
        ensure_positive("player.move_speed_mps", self.move_speed_mps)?;
        ensure_positive("player.footstep_interval_s", self.footstep_interval_s)?;
        ensure_fraction("player.ease_max", self.ease_max)?;
        Ok(())
    }
}

/// World-wide fallbacks and load handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Ground height used when no ground set is registered or a probe misses (m).
    pub flat_ground_height_m: f32,
    /// Placement ray for a newly driveable car starts at this height (m).
    pub vehicle_spawn_probe_y_m: f32,
    pub vehicle_spawn_probe_range_m: f32,
    pub vehicle_spawn_clearance_m: f32,
    /// Waiting vehicle colliders poll at this interval (s).
    pub collider_retry_interval_s: f32,
    pub collider_retry_attempts: u32,
    /// Initial player eye position.
    pub player_spawn_m: [f32; 3],
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            flat_ground_height_m: FLAT_GROUND_HEIGHT,
            vehicle_spawn_probe_y_m: 10.0,
            vehicle_spawn_probe_range_m: 20.0,
            vehicle_spawn_clearance_m: 0.5,
            collider_retry_interval_s: 0.5,
            collider_retry_attempts: 6,
            player_spawn_m: [0.0, FLAT_GROUND_HEIGHT + 1.6, 0.0],
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.flat_ground_height_m.is_finite() {
            return Err(SimError::param("world.flat_ground_height_m", "must be finite"));
        }
        ensure_positive("world.collider_retry_interval_s", self.collider_retry_interval_s)?;
        Ok(())
    }
}

/// Frame pacing for the host loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSettings {
    pub target_hz: f32,
    /// Executed steps never exceed this (s).
    pub max_dt_s: f32,
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            target_hz: REFERENCE_HZ,
            max_dt_s: 0.1,
        }
    }
}

impl TickSettings {
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_positive("tick.target_hz", self.target_hz)?;
        ensure_positive("tick.max_dt_s", self.max_dt_s)?;
        Ok(())
    }

    pub fn target_interval_s(&self) -> f32 {
        1.0 / self.target_hz
    }
}

/// Everything the simulation can be tuned with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub vehicle: VehicleParams,
    pub probe: ProbeSettings,
    pub prop: PropParams,
    pub npc: NpcParams,
    pub player: PlayerParams,
    pub world: WorldParams,
    pub tick: TickSettings,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        self.vehicle.validate()?;
        self.probe.validate()?;
        self.prop.validate()?;
        self.npc.validate()?;
        self.player.validate()?;
        self.world.validate()?;
        self.tick.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn per_frame_conversion_matches_sixty_frames() {
        let keep = per_second(0.97);
        let frames: f32 = (0..60).map(|_| 0.97f32).product();
        assert_relative_eq!(keep, frames, epsilon = 1.0e-5);
    }

    #[test]
    fn tau_reproduces_per_frame_blend() {
        let tau = tau_from_per_frame(0.25);
        let alpha = crate::utils::smoothing_alpha(tau, 1.0 / REFERENCE_HZ);
        assert_relative_eq!(alpha, 0.25, epsilon = 1.0e-5);
    }

    #[test]
    fn empty_gear_table_is_rejected() {
        let mut cfg = SimConfig::default();
        cfg.vehicle.gear_ratios.clear();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidParameter {
                name: "vehicle.gear_ratios",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let mut cfg = SimConfig::default();
        cfg.vehicle.mass_kg = 0.0;
        assert!(cfg.validate().is_err());
        let mut cfg = SimConfig::default();
        cfg.npc.body.mass_kg = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{ "vehicle": { "mass_kg": 900.0 } }"#).unwrap();
        assert_relative_eq!(cfg.vehicle.mass_kg, 900.0);
        assert_eq!(cfg.vehicle.gear_ratios.len(), 6);
        assert_eq!(cfg.prop, PropParams::default());
    }
}
