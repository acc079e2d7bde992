//! Loose rigid bodies: props, and NPCs while they are knocked down.

use crate::{
    collision::Bounds,
    config::BodyParams,
    utils::{Quat, Vec3, decay},
};
use nalgebra::Unit;

/// Spin below this magnitude (rad/s) is not applied to the orientation.
const MIN_SPIN_RADPS: f32 = 1.0e-3;

/// Semi-implicit Euler state for a loose body.
///
/// All fields are present from construction; there is no lazily-added state.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    /// Downward acceleration magnitude (m/s²).
    pub gravity: f32,
    pub terminal_fall_speed: f32,
    /// Fraction of linear velocity kept after one second.
    pub linear_keep: f32,
    /// Fraction of angular velocity kept after one second.
    pub angular_keep: f32,
    /// Collision-mesh bounds in the body frame. Never derived from the visual.
    pub bounds: Bounds,
    pub is_grounded: bool,

    spawn_grace: f32,
    needs_placement: bool,
    impact_cooldown: f32,
    pending_velocity: Vec3,
    pending_spin: Vec3,
}

impl RigidBody {
    /// A live body at rest.
    pub fn new(position: Vec3, bounds: Bounds, params: &BodyParams) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            mass: params.mass_kg,
            gravity: params.gravity_mps2,
            terminal_fall_speed: params.terminal_fall_speed_mps,
            linear_keep: params.linear_keep,
            angular_keep: params.angular_keep,
            bounds,
            is_grounded: false,
            spawn_grace: 0.0,
            needs_placement: false,
            impact_cooldown: 0.0,
            pending_velocity: Vec3::zeros(),
            pending_spin: Vec3::zeros(),
        }
    }

    /// A freshly spawned body: ground snapping is suppressed for `grace_s`, except for
    /// one exact placement onto the ground below.
    pub fn spawning(position: Vec3, bounds: Bounds, params: &BodyParams, grace_s: f32) -> Self {
        Self {
            spawn_grace: grace_s.max(0.0),
            needs_placement: true,
            ..Self::new(position, bounds, params)
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn is_spawning(&self) -> bool {
        self.spawn_grace > 0.0
    }

    /// `true` until the one-shot initial placement has run (or the grace window ended).
    pub fn needs_placement(&self) -> bool {
        self.needs_placement
    }

    pub(crate) fn mark_placed(&mut self) {
        self.needs_placement = false;
    }

    /// Whether the resolver may snap this body to the ground this tick.
    pub fn accepts_ground_snap(&self) -> bool {
        self.needs_placement || !self.is_spawning()
    }

    /// Queue an instantaneous velocity and spin change, applied at the next integration.
    pub fn add_impulse(&mut self, delta_velocity: Vec3, delta_spin: Vec3) {
        self.pending_velocity += delta_velocity;
        self.pending_spin += delta_spin;
    }

    /// Start an impact if the per-body cooldown has elapsed.
    pub fn try_begin_impact(&mut self, cooldown_s: f32) -> bool {
        if self.impact_cooldown > 0.0 {
            return false;
        }
        self.impact_cooldown = cooldown_s.max(0.0);
        true
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Both linear and angular speed are under the given thresholds.
    pub fn is_quiet(&self, linear_mps: f32, angular_radps: f32) -> bool {
        self.velocity.norm() < linear_mps && self.angular_velocity.norm() < angular_radps
    }

    /// Stop all motion and drop any queued impulse.
    pub fn halt(&mut self) {
        self.velocity = Vec3::zeros();
        self.angular_velocity = Vec3::zeros();
        self.pending_velocity = Vec3::zeros();
        self.pending_spin = Vec3::zeros();
    }

    /// Advance the body by `dt` seconds.
    ///
    /// Steps
    /// 1) Apply impulses queued since the last step.
    /// 2) Gravity, with the vertical velocity clamped at terminal fall speed.
    /// 3) Position.
    /// 4) Orientation, rotating about the world-space spin axis.
    /// 5) Exponential decay of linear and angular velocity.
    ///
    /// Never clamps against geometry; the resolver runs afterwards.
    pub fn integrate(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.spawn_grace = (self.spawn_grace - dt).max(0.0);
        if self.spawn_grace <= 0.0 {
            // Grace is over; a body still waiting for placement just falls normally.
            self.needs_placement = false;
        }
        self.impact_cooldown = (self.impact_cooldown - dt).max(0.0);

        // 1) Impulses.
        self.velocity += std::mem::take(&mut self.pending_velocity);
        self.angular_velocity += std::mem::take(&mut self.pending_spin);

        // 2) Gravity.
        self.velocity.y -= self.gravity * dt;
        self.velocity.y = self.velocity.y.max(self.terminal_fall_speed);

        // 3) Position.
        self.position += self.velocity * dt;

        // 4) Orientation (pre-multiplied: world-space rotation).
        let spin = self.angular_velocity.norm();
        if spin > MIN_SPIN_RADPS {
            let axis = Unit::new_unchecked(self.angular_velocity / spin);
            let step = Quat::from_axis_angle(&axis, spin * dt);
            self.rotation = step * self.rotation;
        }

        // 5) Decay.
        self.velocity *= decay(self.linear_keep, dt);
        self.angular_velocity *= decay(self.angular_keep, dt);
    }
}
