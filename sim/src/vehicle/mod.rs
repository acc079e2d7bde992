/*!
Bicycle-model car.

Per tick, in order:
1) input mapping (pedals, smoothed steering; neutral when nobody drives),
2) engine speed and automatic gearbox,
3) drive, brake and lateral tire forces,
4) velocity, yaw-rate and yaw integration with per-second decay,
5) planar position update along the yaw basis,
6) ground conformance from four wheel rays,
7) front/rear wall bumps,
8) wheel travel for the visuals.

Modules
- controls:   key-to-pedal mapping, steering smoothing and lock
- drivetrain: RPM, gear selection, torque curve, drive and brake force
- tires:      slip angles and saturating lateral forces
- terrain:    wheel footprints, ground conformance, wall rays
- wheels:     wheel visual poses
*/

pub mod controls;
pub mod drivetrain;
pub mod terrain;
pub mod tires;
pub mod wheels;

pub use controls::DriverInput;
pub use terrain::{Corner, WallBump, WallSide};
pub use tires::TireForces;
pub use wheels::WheelPose;

use crate::{
    collision::SurfaceProbe,
    config::{ProbeSettings, VehicleParams},
    utils::{Quat, Vec3, decay, forward_from_yaw, right_from_yaw, yaw_pitch_roll},
};
use controls::{Pedals, map_pedals, smooth_steer, steer_target};
use std::fmt;

/// Gear shown on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GearDisplay {
    Reverse,
    Forward(u8),
}

impl fmt::Display for GearDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GearDisplay::Reverse => write!(f, "R"),
            GearDisplay::Forward(n) => write!(f, "{n}"),
        }
    }
}

/// A gearbox shift made during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GearChange {
    pub from: u8,
    pub to: u8,
}

/// What happened during one [`Vehicle::step`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleStep {
    pub gear_change: Option<GearChange>,
    pub wall_bumps: Vec<WallBump>,
    /// The body conformed to the ground this tick.
    pub grounded: bool,
}

/// One drivable car.
///
/// `vx` is the body-frame forward speed; `vy` the lateral slip speed, positive toward
/// the car's left (the same side a positive steer angle and yaw rate turn toward).
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub position: Vec3,
    pub yaw: f32,
    pub vx: f32,
    pub vy: f32,
    pub yaw_rate: f32,

    pub engine_rpm: f32,
    /// Forward gear, `1..=top`. Pinned to 1 while reversing.
    pub gear: u8,
    pub throttle: f32,
    pub brake: f32,
    /// Smoothed steering position in `[-1, 1]`.
    pub steer: f32,

    pub pitch: f32,
    pub roll: f32,

    backing_up: bool,
    terrain_roll: f32,
    suspension_roll: f32,
    steer_angle: f32,
    steer_lock: f32,
    wheel_travel: f32,
    tires: TireForces,
}

impl Vehicle {
    pub fn new(position: Vec3, yaw: f32, params: &VehicleParams) -> Self {
        Self {
            position,
            yaw,
            vx: 0.0,
            vy: 0.0,
            yaw_rate: 0.0,
            engine_rpm: params.idle_rpm,
            gear: 1,
            throttle: 0.0,
            brake: 0.0,
            steer: 0.0,
            pitch: 0.0,
            roll: 0.0,
            backing_up: false,
            terrain_roll: 0.0,
            suspension_roll: 0.0,
            steer_angle: 0.0,
            steer_lock: params.steer_max_rad,
            wheel_travel: 0.0,
            tires: TireForces::default(),
        }
    }

    /// Planar speed including slip (m/s).
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    /// World-space planar velocity.
    pub fn velocity(&self) -> Vec3 {
        forward_from_yaw(self.yaw) * self.vx - right_from_yaw(self.yaw) * self.vy
    }

    pub fn rotation(&self) -> Quat {
        yaw_pitch_roll(self.yaw, self.pitch, self.roll)
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn right(&self) -> Vec3 {
        right_from_yaw(self.yaw)
    }

    pub fn gear_display(&self) -> GearDisplay {
        if self.throttle < 0.0 {
            GearDisplay::Reverse
        } else {
            GearDisplay::Forward(self.gear)
        }
    }

    /// Road-wheel angle used by the tire model this tick.
    pub fn steer_angle(&self) -> f32 {
        self.steer_angle
    }

    pub fn tire_forces(&self) -> TireForces {
        self.tires
    }

    /// Wheel poses for rendering. The displayed steer is never sign-flipped in reverse.
    pub fn wheel_poses(&self, params: &VehicleParams) -> [WheelPose; 4] {
        wheels::wheel_poses(
            self.wheel_travel,
            params.tire_radius_m,
            self.steer * self.steer_lock,
        )
    }

    /// Advance the car by `dt`. `driver` is `None` for a car nobody occupies.
    pub fn step<P: SurfaceProbe + ?Sized>(
        &mut self,
        driver: Option<&DriverInput>,
        params: &VehicleParams,
        settings: &ProbeSettings,
        probe: &P,
        flat_ground_y: f32,
        dt: f32,
    ) -> VehicleStep {
        let dt = dt.max(0.0);
        let mut report = VehicleStep::default();

        // 1) Inputs.
        let speed = self.speed();
        let pedals = match driver {
            Some(input) => {
                self.steer = smooth_steer(self.steer, steer_target(input), params.steer_tau_s, dt);
                map_pedals(input, speed, self.backing_up, params)
            }
            None => {
                self.steer = smooth_steer(self.steer, 0.0, params.driverless_steer_tau_s, dt);
                Pedals::default()
            }
        };
        self.throttle = pedals.throttle;
        self.brake = pedals.brake;
        self.backing_up = pedals.backing_up;
        let reversing = self.throttle < 0.0;

        self.steer_lock = controls::max_steer_angle(speed, params);
        self.steer_angle = controls::steer_angle(self.steer, speed, self.vx, params);

        // 2) Engine and gearbox.
        let ratio = drivetrain::gear_ratio(self.gear, reversing, params);
        let wheel_rpm = drivetrain::wheel_rpm(self.vx, params.tire_radius_m);
        self.engine_rpm = drivetrain::engine_rpm(wheel_rpm, ratio, params);

        let next_gear = drivetrain::select_gear(self.gear, self.engine_rpm, reversing, params);
        if next_gear != self.gear {
            report.gear_change = Some(GearChange {
                from: self.gear,
                to: next_gear,
            });
            self.gear = next_gear;
        }

        // 3) Forces.
        let drive = drivetrain::drive_force(self.throttle, self.engine_rpm, ratio, params);
        let brake = drivetrain::brake_force(self.brake, self.vx, speed, params);
        self.tires =
            tires::lateral_forces(self.vx, self.vy, self.yaw_rate, self.steer_angle, params);

        // 4) Integration.
        self.vx += (drive + brake) / params.mass_kg * dt;
        self.vy += self.tires.lateral(self.steer_angle) / params.mass_kg * dt;

        let longitudinal_keep = if reversing {
            params.reverse_longitudinal_keep
        } else if driver.is_none() {
            params.driverless_longitudinal_keep
        } else {
            params.longitudinal_keep
        };
        self.vx *= decay(longitudinal_keep, dt);
        self.vy *= decay(params.lateral_keep, dt);

        if reversing {
            let cap = params.reverse_speed_cap_mps;
            self.vx = self.vx.clamp(-cap, cap);
        }

        let torque = self.tires.yaw_torque(self.steer_angle, params.wheelbase_m);
        self.yaw_rate += torque / params.yaw_inertia * dt;
        self.yaw_rate *= decay(params.yaw_rate_keep, dt);
        self.yaw += self.yaw_rate * dt;

        // 5) Position.
        self.position += self.velocity() * dt;

        // 6) Terrain.
        let fit = terrain::conform(probe, &self.position, self.yaw, settings, flat_ground_y);
        if let Some(fit) = fit {
            self.position.y = fit.height;
            self.pitch = fit.pitch;
            self.terrain_roll = fit.roll;
            report.grounded = true;
        }
        self.suspension_roll =
            terrain::suspension_roll(self.suspension_roll, self.yaw_rate, settings, dt);
        self.roll = self.terrain_roll + self.suspension_roll;

        // 7) Walls.
        let bumps = terrain::wall_bumps(probe, &self.position, self.yaw, self.vx, settings);
        for bump in &bumps {
            self.vx *= settings.wall_bounce_factor;
            self.vy *= settings.wall_lateral_keep;
            self.yaw_rate *= settings.wall_yaw_rate_keep;
            let back = match bump.side {
                WallSide::Front => -self.forward(),
                WallSide::Rear => self.forward(),
            };
            self.position += back * settings.wall_push_m;
        }
        report.wall_bumps = bumps;

        // 8) Wheels.
        self.wheel_travel += self.vx * dt;

        report
    }
}
