//! Loose bodies and pedestrians against rapier-backed geometry.

mod common;

use approx::assert_relative_eq;
use rand::{SeedableRng, rngs::StdRng};
use rstest::rstest;
use sandbox_sim::{
    Bounds, Npc, NpcMode, NpcState, RigidBody, SurfaceProbe, Vec3,
    config::{BodyParams, NpcParams},
    impact::strike_npc,
    npc::steering::detour,
    resolve_ground, resolve_walls,
};

const DT: f32 = 1.0 / 60.0;

fn crate_at(position: Vec3, params: &BodyParams) -> RigidBody {
    RigidBody::new(position, Bounds::from_half_extents(Vec3::new(0.25, 0.25, 0.25)), params)
}

#[test]
fn ground_snap_is_idempotent() {
    let geometry = common::flat_ground(0.0);
    let params = BodyParams::default();
    let mut body = crate_at(Vec3::new(3.0, 0.1, -4.0), &params);
    body.velocity = Vec3::new(0.0, -2.0, 0.0);

    let first = resolve_ground(&mut body, &geometry, &params, 0.0, 0.0, DT).unwrap();
    assert!(first.snapped);
    assert_relative_eq!(body.position.y, 0.3, epsilon = 1.0e-5);
    assert_eq!(body.velocity.y, 0.0);

    let second = resolve_ground(&mut body, &geometry, &params, 0.0, 0.0, DT).unwrap();
    assert!(!second.snapped);
    assert_relative_eq!(body.position.y, 0.3, epsilon = 1.0e-5);
    assert!(body.is_grounded);
}

#[test]
fn body_above_ground_is_left_alone() {
    let geometry = common::flat_ground(0.0);
    let params = BodyParams::default();
    let mut body = crate_at(Vec3::new(0.0, 2.0, 0.0), &params);

    assert!(resolve_ground(&mut body, &geometry, &params, 0.0, 0.0, DT).is_none());
    assert_eq!(body.position.y, 2.0);
    assert!(!body.is_grounded);
}

#[test]
fn wall_bounce_leaves_clearance() {
    let wall = common::wall(20, 1.5, 0.0, 0.5, 3.0);
    let geometry = common::with_walls(common::flat_ground(0.0), vec![wall]);
    let params = BodyParams::default();
    let mut body = crate_at(Vec3::new(0.9, 0.3, 0.0), &params);
    body.velocity = Vec3::new(5.0, 0.0, 0.0);

    let contact = resolve_walls(&mut body, &geometry, &params, DT).unwrap();
    assert_relative_eq!(contact.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1.0e-5);
    assert_relative_eq!(contact.push, 0.3, epsilon = 1.0e-5);
    // Restitution 0.4 along the normal.
    assert_relative_eq!(body.velocity.x, -2.0, epsilon = 1.0e-4);

    let gap = geometry.wall_along(&body.position, &Vec3::x(), 10.0).unwrap();
    assert!(gap.distance >= params.wall_min_push_m);
}

#[rstest]
#[case::coarse(0.1, 10)]
#[case::fine(0.01, 100)]
fn free_body_decay_is_frame_rate_independent(#[case] dt: f32, #[case] steps: usize) {
    let params = BodyParams {
        gravity_mps2: 0.0,
        ..BodyParams::default()
    };
    let mut body = crate_at(Vec3::new(0.0, 5.0, 0.0), &params);
    body.velocity = Vec3::new(5.0, 0.0, 0.0);
    body.angular_velocity = Vec3::new(0.0, 3.0, 0.0);

    for _ in 0..steps {
        body.integrate(dt);
    }

    assert_relative_eq!(body.velocity.x, 5.0 * params.linear_keep, max_relative = 1.0e-3);
    assert_relative_eq!(body.angular_velocity.y, 3.0 * params.angular_keep, max_relative = 1.0e-3);
}

#[test]
fn blocked_npc_turns_right_then_left_then_back() {
    let ahead = Vec3::new(0.0, 0.0, -1.0);
    let origin = Vec3::new(0.0, 0.95, 0.0);
    let front = common::wall(20, 0.0, -1.0, 3.0, 0.25);
    let right = common::wall(21, 1.0, 0.0, 0.25, 3.0);
    let left = common::wall(22, -1.0, 0.0, 0.25, 3.0);

    let clear = common::flat_ground(0.0);
    assert!(detour(&clear, &origin, &ahead, 1.0).is_none());

    let geometry = common::with_walls(common::flat_ground(0.0), vec![front.clone()]);
    let turn = detour(&geometry, &origin, &ahead, 1.0).unwrap();
    assert_relative_eq!(turn, Vec3::new(1.0, 0.0, 0.0));

    let geometry = common::with_walls(common::flat_ground(0.0), vec![front.clone(), right.clone()]);
    let turn = detour(&geometry, &origin, &ahead, 1.0).unwrap();
    assert_relative_eq!(turn, Vec3::new(-1.0, 0.0, 0.0));

    let geometry = common::with_walls(common::flat_ground(0.0), vec![front, right, left]);
    let turn = detour(&geometry, &origin, &ahead, 1.0).unwrap();
    assert_relative_eq!(turn, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn struck_npc_gets_back_up_and_walks() {
    let geometry = common::flat_ground(0.0);
    let params = NpcParams::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut npc = Npc::new(Vec3::new(0.0, 0.95, 0.0), &params, &mut rng);
    assert_eq!(npc.mode(), NpcMode::Walking);

    let car_position = npc.body.position + Vec3::new(0.0, -0.9, 1.0);
    let car_velocity = Vec3::new(0.0, 0.0, -15.0);
    let (impact, delta_v, spin) =
        strike_npc(&mut npc.body, &car_position, &car_velocity, 1250.0, &params, &mut rng).unwrap();
    assert!(impact.speed > 10.0);
    // Capped at the configured g load over the contact time.
    let cap = params.max_knockback_g * sandbox_sim::GRAVITY_MPS2 * params.contact_time_s;
    assert_relative_eq!(Vec3::new(delta_v.x, 0.0, delta_v.z).norm(), cap, epsilon = 1.0e-3);

    let hit = npc.hit(delta_v, spin).unwrap();
    assert_eq!((hit.from, hit.to), (NpcMode::Walking, NpcMode::KnockedDown));

    let mut modes = vec![NpcMode::KnockedDown];
    for _ in 0..(20.0 / DT) as usize {
        if let Some(t) = npc.step(&geometry, &params, 0.0, &mut rng, DT) {
            assert_eq!(t.from, *modes.last().unwrap());
            modes.push(t.to);
        }
        if npc.mode() == NpcMode::Walking {
            break;
        }
    }

    assert_eq!(
        modes,
        vec![NpcMode::KnockedDown, NpcMode::Recovering, NpcMode::Walking]
    );
    let NpcState::Walking { direction, .. } = npc.state else {
        panic!("expected walking, got {:?}", npc.state);
    };
    assert_relative_eq!(direction.norm(), 1.0, epsilon = 1.0e-5);
    assert_relative_eq!(direction.y, 0.0);
    assert_relative_eq!(npc.body.rotation.angle_to(&npc.upright()), 0.0, epsilon = 1.0e-4);
    // Back on its feet on top of the slab.
    assert_relative_eq!(npc.body.position.y, 0.95, epsilon = 1.0e-3);
}

#[test]
fn parked_car_leaves_a_walking_npc_alone() {
    let geometry = common::flat_ground(0.0);
    let params = NpcParams::default();
    let mut rng = StdRng::seed_from_u64(2);
    let mut npc = Npc::new(Vec3::new(1.5, 0.95, 0.0), &params, &mut rng);
    // Walking straight at a car parked at the origin.
    npc.state = NpcState::Walking {
        direction: Vec3::new(-1.0, 0.0, 0.0),
        timer: 10.0,
    };
    let car_position = Vec3::new(0.0, 0.05, 0.0);

    for _ in 0..30 {
        npc.step(&geometry, &params, 0.0, &mut rng, DT);
        let parked = Vec3::zeros();
        let hit = strike_npc(&mut npc.body, &car_position, &parked, 1250.0, &params, &mut rng);
        assert!(hit.is_none());
    }

    assert_eq!(npc.mode(), NpcMode::Walking);
    assert!(npc.body.position.x < 1.5);
}
