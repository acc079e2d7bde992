//! Pedestrian NPCs: a rigid body plus a three-state behavior cycle.
//!
//! walking -> knocked_down -> recovering -> walking. No other edges exist and there is
//! no terminal state.

pub mod steering;

use crate::{
    body::RigidBody,
    collision::{Bounds, SurfaceProbe, SurfaceSet},
    config::NpcParams,
    resolver::{resolve_ground, resolve_walls},
    utils::{Quat, Vec3, to_planar, yaw_from_xz, yaw_rotation},
};
use rand::Rng;

/// Behavior state. Each variant carries only the fields meaningful in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NpcState {
    Walking {
        /// Unit planar walking direction.
        direction: Vec3,
        /// Seconds until the next random re-pick.
        timer: f32,
    },
    KnockedDown {
        /// How long both speeds have stayed under the rest thresholds (s).
        static_timer: f32,
    },
    Recovering {
        elapsed: f32,
        /// Orientation when recovery started.
        from: Quat,
    },
}

/// Discriminant-only view of [`NpcState`], for events and telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NpcMode {
    Walking,
    KnockedDown,
    Recovering,
}

impl NpcState {
    pub fn mode(&self) -> NpcMode {
        match self {
            NpcState::Walking { .. } => NpcMode::Walking,
            NpcState::KnockedDown { .. } => NpcMode::KnockedDown,
            NpcState::Recovering { .. } => NpcMode::Recovering,
        }
    }
}

/// A state change made during a step or a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NpcTransition {
    pub from: NpcMode,
    pub to: NpcMode,
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub body: RigidBody,
    pub state: NpcState,
    /// Heading the NPC stands up facing (radians).
    pub facing: f32,
}

impl Npc {
    /// Spawn walking in a random direction.
    pub fn new<R: Rng + ?Sized>(position: Vec3, params: &NpcParams, rng: &mut R) -> Self {
        let bounds = Bounds::from_half_extents(Vec3::from(params.half_extents));
        let direction = steering::random_heading(rng);
        let facing = yaw_from_xz(to_planar(&direction)).unwrap_or(0.0);
        Self {
            body: RigidBody::new(position, bounds, &params.body)
                .with_rotation(yaw_rotation(facing)),
            state: NpcState::Walking {
                direction,
                timer: walk_interval(params, rng),
            },
            facing,
        }
    }

    pub fn mode(&self) -> NpcMode {
        self.state.mode()
    }

    pub fn upright(&self) -> Quat {
        yaw_rotation(self.facing)
    }

    /// Apply a car impact.
    ///
    /// Walking NPCs fall over; knocked-down NPCs take the extra impulse. A recovering NPC
    /// ignores hits, since recovering has no edge back to knocked down.
    pub fn hit(&mut self, delta_velocity: Vec3, spin: Vec3) -> Option<NpcTransition> {
        match self.state {
            NpcState::Walking { .. } => {
                self.body.add_impulse(delta_velocity, spin);
                self.body.is_grounded = false;
                self.state = NpcState::KnockedDown { static_timer: 0.0 };
                Some(NpcTransition {
                    from: NpcMode::Walking,
                    to: NpcMode::KnockedDown,
                })
            }
            NpcState::KnockedDown { .. } => {
                self.body.add_impulse(delta_velocity, spin);
                self.state = NpcState::KnockedDown { static_timer: 0.0 };
                None
            }
            NpcState::Recovering { .. } => None,
        }
    }

    /// Advance one tick.
    pub fn step<P: SurfaceProbe + ?Sized, R: Rng + ?Sized>(
        &mut self,
        probe: &P,
        params: &NpcParams,
        flat_ground_y: f32,
        rng: &mut R,
        dt: f32,
    ) -> Option<NpcTransition> {
        let dt = dt.max(0.0);
        match self.state {
            NpcState::Walking { direction, timer } => {
                self.walk(direction, timer, probe, params, flat_ground_y, rng, dt);
                None
            }
            NpcState::KnockedDown { static_timer } => {
                self.tumble(static_timer, probe, params, flat_ground_y, dt)
            }
            NpcState::Recovering { elapsed, from } => {
                self.recover(elapsed, from, probe, params, flat_ground_y, rng, dt)
            }
        }
    }

    fn walk<P: SurfaceProbe + ?Sized, R: Rng + ?Sized>(
        &mut self,
        mut direction: Vec3,
        mut timer: f32,
        probe: &P,
        params: &NpcParams,
        flat_ground_y: f32,
        rng: &mut R,
        dt: f32,
    ) {
        timer -= dt;
        if timer <= 0.0 {
            direction = steering::random_heading(rng);
            timer = walk_interval(params, rng);
        }

        let eye = self.body.position + Vec3::y() * params.probe_height_m;
        if let Some(turn) = steering::detour(probe, &eye, &direction, params.forward_probe_m) {
            log::trace!("npc detour at ({:.2}, {:.2})", eye.x, eye.z);
            direction = turn;
        }

        self.body.velocity = direction * params.walk_speed_mps;
        self.body.angular_velocity = Vec3::zeros();
        self.body.position += self.body.velocity * dt;

        if let Some(yaw) = yaw_from_xz(to_planar(&direction)) {
            self.facing = yaw;
        }
        self.body.rotation = self.upright();
        self.stick_to_ground(probe, params, flat_ground_y);

        self.state = NpcState::Walking { direction, timer };
    }

    fn tumble<P: SurfaceProbe + ?Sized>(
        &mut self,
        mut static_timer: f32,
        probe: &P,
        params: &NpcParams,
        flat_ground_y: f32,
        dt: f32,
    ) -> Option<NpcTransition> {
        self.body.integrate(dt);
        resolve_walls(&mut self.body, probe, &params.body, dt);
        resolve_ground(&mut self.body, probe, &params.body, flat_ground_y, 0.0, dt);

        if self
            .body
            .is_quiet(params.rest_linear_mps, params.rest_angular_radps)
        {
            static_timer += dt;
        } else {
            static_timer = 0.0;
        }

        if static_timer >= params.rest_duration_s {
            self.body.halt();
            self.state = NpcState::Recovering {
                elapsed: 0.0,
                from: self.body.rotation,
            };
            return Some(NpcTransition {
                from: NpcMode::KnockedDown,
                to: NpcMode::Recovering,
            });
        }
        self.state = NpcState::KnockedDown { static_timer };
        None
    }

    fn recover<P: SurfaceProbe + ?Sized, R: Rng + ?Sized>(
        &mut self,
        elapsed: f32,
        from: Quat,
        probe: &P,
        params: &NpcParams,
        flat_ground_y: f32,
        rng: &mut R,
        dt: f32,
    ) -> Option<NpcTransition> {
        let elapsed = elapsed + dt;
        let t = (elapsed / params.recover_duration_s).min(1.0);
        let upright = self.upright();
        self.body.rotation = from.try_slerp(&upright, t, 1.0e-6).unwrap_or(upright);
        self.stick_to_ground(probe, params, flat_ground_y);

        if t < 1.0 {
            self.state = NpcState::Recovering { elapsed, from };
            return None;
        }

        self.body.rotation = upright;
        self.body.halt();
        self.body.is_grounded = true;
        self.state = NpcState::Walking {
            direction: steering::random_heading(rng),
            timer: walk_interval(params, rng),
        };
        Some(NpcTransition {
            from: NpcMode::Recovering,
            to: NpcMode::Walking,
        })
    }

    /// Keep an upright NPC standing on the ground below it.
    fn stick_to_ground<P: SurfaceProbe + ?Sized>(
        &mut self,
        probe: &P,
        params: &NpcParams,
        flat_ground_y: f32,
    ) {
        let ground_y = if probe.has_set(SurfaceSet::Ground) {
            match probe.ground_below(&self.body.position) {
                Some(hit) => hit.point.y,
                None => return,
            }
        } else {
            flat_ground_y
        };
        self.body.position.y =
            ground_y + params.body.ground_clearance_m + self.body.bounds.depth_below_origin();
        self.body.is_grounded = true;
    }
}

fn walk_interval<R: Rng + ?Sized>(params: &NpcParams, rng: &mut R) -> f32 {
    if params.turn_interval_max_s > params.turn_interval_min_s {
        rng.gen_range(params.turn_interval_min_s..params.turn_interval_max_s)
    } else {
        params.turn_interval_min_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::probe::stub::{StubProbe, WallBox};
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    const DT: f32 = 1.0 / 60.0;

    fn walker(direction: Vec3) -> (Npc, StdRng) {
        let mut rng = StdRng::seed_from_u64(5);
        let params = NpcParams::default();
        let mut npc = Npc::new(Vec3::new(0.0, 0.95, 0.0), &params, &mut rng);
        npc.state = NpcState::Walking {
            direction,
            timer: 100.0,
        };
        (npc, rng)
    }

    #[test]
    fn walking_follows_direction_and_ground() {
        let (mut npc, mut rng) = walker(Vec3::x());
        let probe = StubProbe::flat(1.0);
        let params = NpcParams::default();
        for _ in 0..60 {
            npc.step(&probe, &params, 0.0, &mut rng, DT);
        }
        assert_relative_eq!(npc.body.position.x, 1.4, epsilon = 1.0e-3);
        assert_relative_eq!(npc.body.position.y, 1.95, epsilon = 1.0e-5);
        assert_relative_eq!(npc.facing, -std::f32::consts::FRAC_PI_2, epsilon = 1.0e-5);
    }

    #[test]
    fn hit_while_walking_knocks_down() {
        let (mut npc, _) = walker(Vec3::x());
        let t = npc.hit(Vec3::new(5.0, 2.0, 0.0), Vec3::y()).unwrap();
        assert_eq!(t.to, NpcMode::KnockedDown);
        assert!(npc.hit(Vec3::x(), Vec3::zeros()).is_none());
        assert_eq!(npc.mode(), NpcMode::KnockedDown);
    }

    #[test]
    fn recovering_ignores_hits() {
        let (mut npc, _) = walker(Vec3::x());
        npc.state = NpcState::Recovering {
            elapsed: 0.0,
            from: Quat::identity(),
        };
        assert!(npc.hit(Vec3::x() * 5.0, Vec3::zeros()).is_none());
        assert_eq!(npc.mode(), NpcMode::Recovering);
    }

    #[test]
    fn obstruction_turns_right_first() {
        let (mut npc, mut rng) = walker(Vec3::new(0.0, 0.0, -1.0));
        let probe = StubProbe::flat(0.05).with_wall(WallBox {
            min_x: -3.0,
            max_x: 3.0,
            min_z: -3.0,
            max_z: -0.6,
        });
        npc.step(&probe, &NpcParams::default(), 0.0, &mut rng, DT);
        match npc.state {
            NpcState::Walking { direction, .. } => {
                assert_relative_eq!(direction, Vec3::new(1.0, 0.0, 0.0), epsilon = 1.0e-6)
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn recovery_returns_upright() {
        let (mut npc, mut rng) = walker(Vec3::x());
        let params = NpcParams::default();
        let tilted = Quat::from_axis_angle(&Vec3::z_axis(), 1.2);
        npc.body.rotation = tilted;
        npc.state = NpcState::Recovering {
            elapsed: 0.0,
            from: tilted,
        };
        let probe = StubProbe::flat(0.0);
        let mut transitions = Vec::new();
        for _ in 0..70 {
            if let Some(t) = npc.step(&probe, &params, 0.0, &mut rng, DT) {
                transitions.push(t);
            }
        }
        assert_eq!(
            transitions,
            vec![NpcTransition {
                from: NpcMode::Recovering,
                to: NpcMode::Walking
            }]
        );
        assert!(npc.body.rotation.angle_to(&npc.upright()) < 0.05);
    }
}
