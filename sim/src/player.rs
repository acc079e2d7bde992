//! On-foot player controller.
//!
//! The player is a viewpoint, not a rigid body: the only integrated quantity is the
//! vertical velocity during a jump. Horizontal motion writes the position directly and
//! is gated by the eight-way clearance probe.

use crate::{
    REFERENCE_HZ, TERMINAL_FALL_SPEED_MPS,
    collision::{
        SurfaceProbe, SurfaceSet,
        ground::{cardinal_footprint, lowest_ground},
    },
    config::PlayerParams,
    input::InputState,
    utils::{Quat, Vec3, forward_from_yaw, right_from_yaw, yaw_rotation},
};

/// Something the player did this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerEvent {
    Jumped { position: Vec3 },
    Landed { position: Vec3 },
    Footstep { position: Vec3 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Eye position.
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    footstep_timer: f32,
}

impl Player {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: 0.0,
            vertical_velocity: 0.0,
            is_jumping: false,
            footstep_timer: 0.0,
        }
    }

    /// Stand at `eye`, cancelling any jump in progress.
    pub fn place(&mut self, eye: Vec3) {
        self.position = eye;
        self.vertical_velocity = 0.0;
        self.is_jumping = false;
        self.footstep_timer = 0.0;
    }

    pub fn camera_rotation(&self) -> Quat {
        yaw_rotation(self.yaw) * Quat::from_axis_angle(&Vec3::x_axis(), self.pitch)
    }

    /// Apply a mouse-look delta. Moving right turns right; moving down looks down.
    pub fn look(&mut self, delta: [f32; 2], params: &PlayerParams) {
        self.yaw -= delta[0] * params.look_sensitivity;
        self.pitch = (self.pitch - delta[1] * params.look_sensitivity)
            .clamp(-params.pitch_limit_rad, params.pitch_limit_rad);
    }

    /// Advance one tick.
    ///
    /// Steps
    /// 1) Mouse look.
    /// 2) Jump start, only when standing within `jump_tolerance_m` of ground + eye height.
    /// 3) Airborne: gravity, terminal clamp, landing test. Grounded: ease toward the
    ///    lowest ground under the five-point footprint.
    /// 4) Camera-relative move, accepted only with clearance all around.
    /// 5) Footstep cadence while moving on the ground.
    pub fn step<P: SurfaceProbe + ?Sized>(
        &mut self,
        input: &InputState,
        probe: &P,
        params: &PlayerParams,
        flat_ground_y: f32,
        dt: f32,
    ) -> Vec<PlayerEvent> {
        let dt = dt.max(0.0);
        let mut events = Vec::new();
        let has_ground = probe.has_set(SurfaceSet::Ground);

        // 1) Look.
        self.look(input.look_delta, params);

        // 2) Jump.
        if input.jump && !self.is_jumping && self.can_jump(probe, params, flat_ground_y) {
            self.is_jumping = true;
            self.vertical_velocity = params.jump_speed_mps;
            events.push(PlayerEvent::Jumped {
                position: self.position,
            });
        }

        // 3) Vertical motion.
        if self.is_jumping {
            self.vertical_velocity =
                (self.vertical_velocity - params.gravity_mps2 * dt).max(TERMINAL_FALL_SPEED_MPS);
            self.position.y += self.vertical_velocity * dt;

            if let Some(eye_y) = self.landing_height(probe, params, flat_ground_y, has_ground) {
                self.position.y = eye_y;
                self.vertical_velocity = 0.0;
                self.is_jumping = false;
                events.push(PlayerEvent::Landed {
                    position: self.position,
                });
            }
        } else if has_ground {
            self.ease_to_ground(probe, params, dt);
        }

        // 4) Move.
        let moved = self.walk(input, probe, params, dt);

        // 5) Footsteps.
        if moved && !self.is_jumping {
            self.footstep_timer += dt;
            if self.footstep_timer >= params.footstep_interval_s {
                self.footstep_timer -= params.footstep_interval_s;
                events.push(PlayerEvent::Footstep {
                    position: self.position,
                });
            }
        } else {
            self.footstep_timer = 0.0;
        }

        events
    }

    /// Standing check for a jump: any footprint sample whose ground puts the eye within
    /// `jump_tolerance_m` of standing height counts, so a player on a ledge edge can jump.
    fn can_jump<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
        params: &PlayerParams,
        flat_ground_y: f32,
    ) -> bool {
        let standing = |ground_y: f32| {
            (self.position.y - (ground_y + params.eye_height_m)).abs() <= params.jump_tolerance_m
        };
        if !probe.has_set(SurfaceSet::Ground) {
            return standing(flat_ground_y);
        }
        let feet = self.position.y - params.foot_offset_m;
        cardinal_footprint(&self.position, params.ground_sample_offset_m)
            .iter()
            .filter_map(|s| probe.ground_below_from(s.x, s.z, feet, params.jump_probe_range_m))
            .any(|hit| standing(hit.point.y))
    }

    /// Eye height to land at this tick, if the fall ends here.
    fn landing_height<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
        params: &PlayerParams,
        flat_ground_y: f32,
        has_ground: bool,
    ) -> Option<f32> {
        let flat_eye = flat_ground_y + params.eye_height_m;
        if !has_ground {
            return (self.position.y <= flat_eye).then_some(flat_eye);
        }
        let feet = self.position.y - params.foot_offset_m;
        let hit = probe.ground_below_from(
            self.position.x,
            self.position.z,
            feet,
            params.landing_probe_range_m,
        );
        match hit {
            Some(hit) => {
                let touching = feet <= hit.point.y + params.land_tolerance_m;
                let landing_y = hit.point.y + params.eye_height_m;
                (self.vertical_velocity <= 0.0 && touching).then_some(landing_y)
            }
            None => (self.position.y <= flat_eye).then_some(flat_eye),
        }
    }

    fn ease_to_ground<P: SurfaceProbe + ?Sized>(
        &mut self,
        probe: &P,
        params: &PlayerParams,
        dt: f32,
    ) {
        let samples = cardinal_footprint(&self.position, params.ground_sample_offset_m);
        let from_y = self.position.y - params.ground_probe_drop_m;
        let range = params.ground_probe_range_m;
        let Some(ground_y) = lowest_ground(probe, &samples, from_y, range) else {
            return;
        };
        let gap = ground_y + params.eye_height_m - self.position.y;
        if gap.abs() <= params.ease_deadband_m {
            return;
        }
        // Per-frame easing fraction, rescaled so that a 60 Hz step matches it exactly.
        let per_frame = (params.ease_base + gap.abs() * params.ease_gain).min(params.ease_max);
        let alpha = 1.0 - (1.0 - per_frame).powf(dt * REFERENCE_HZ);
        self.position.y += gap * alpha;
    }

    fn walk<P: SurfaceProbe + ?Sized>(
        &mut self,
        input: &InputState,
        probe: &P,
        params: &PlayerParams,
        dt: f32,
    ) -> bool {
        let (strafe, ahead) = input.move_axes();
        let wish = forward_from_yaw(self.yaw) * ahead + right_from_yaw(self.yaw) * strafe;
        let Some(dir) = wish.try_normalize(1.0e-6) else {
            return false;
        };
        let next = self.position + dir * (params.move_speed_mps * dt);
        if !probe.is_clear_around(&next, params.clearance_radius_m) {
            return false;
        }
        self.position = next;
        true
    }
}
