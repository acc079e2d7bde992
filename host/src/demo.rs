//! Built-in scene used when no scenario file is given.
//!
//! A ground slab with a ramp, a walled yard with a bollard and a lamp post, one car whose
//! collider arrives before its visual, a collider with no car at all, some loose props and
//! pedestrians. The input track walks to the car, drives through the props, reverses and
//! steps out again.

use crate::scenario::{ColliderSpec, InputKey, LoadSpec, Scenario, ShapeSpec, TimedLoad};
use sandbox_sim::{InputState, SimConfig};

fn placed(id: u64, position: [f32; 3], shape: ShapeSpec) -> ColliderSpec {
    ColliderSpec {
        id,
        position,
        yaw_deg: 0.0,
        pitch_deg: 0.0,
        shape,
    }
}

fn cuboid(id: u64, position: [f32; 3], half_extents: [f32; 3]) -> ColliderSpec {
    placed(id, position, ShapeSpec::Cuboid { half_extents })
}

fn at(at_s: f32, load: LoadSpec) -> TimedLoad {
    TimedLoad { at_s, load }
}

fn hold(at_s: f32, state: InputState) -> InputKey {
    InputKey { at_s, state }
}

pub fn scenario() -> Scenario {
    let ramp = ColliderSpec {
        pitch_deg: 8.0,
        ..cuboid(2, [20.0, 0.0, -30.0], [4.0, 0.5, 8.0])
    };
    let ground = vec![cuboid(1, [0.0, -0.5, 0.0], [120.0, 0.5, 120.0]), ramp];
    let walls = vec![
        cuboid(10, [0.0, 2.0, -60.0], [60.0, 2.0, 0.5]),
        cuboid(11, [0.0, 2.0, 60.0], [60.0, 2.0, 0.5]),
        cuboid(12, [-60.0, 2.0, 0.0], [0.5, 2.0, 60.0]),
        cuboid(13, [60.0, 2.0, 0.0], [0.5, 2.0, 60.0]),
        cuboid(14, [8.0, 2.0, -20.0], [2.0, 2.0, 2.0]),
        placed(
            15,
            [12.0, 0.5, 6.0],
            ShapeSpec::CylinderY {
                radius: 0.3,
                half_height: 0.5,
            },
        ),
        placed(
            16,
            [-12.0, 2.0, -6.0],
            ShapeSpec::CapsuleY {
                radius: 0.15,
                half_height: 2.0,
            },
        ),
    ];

    let mut loads = vec![
        at(0.0, LoadSpec::Ground { colliders: ground }),
        at(0.1, LoadSpec::Walls { colliders: walls }),
        at(
            0.0,
            LoadSpec::VehicleCollider {
                slot: 0,
                half_extents: [0.9, 0.6, 2.2],
                fallback_position: [-2.0, 0.0, -2.0],
            },
        ),
        at(
            0.7,
            LoadSpec::VehicleVisual {
                slot: 0,
                position: [-2.0, 0.0, -2.0],
                yaw: 0.0,
            },
        ),
        at(
            0.2,
            LoadSpec::VehicleCollider {
                slot: 7,
                half_extents: [0.9, 0.6, 2.2],
                fallback_position: [15.0, 0.0, 10.0],
            },
        ),
    ];
    for (i, z) in [-12.0, -16.0, -20.0, -24.0].into_iter().enumerate() {
        let x = if i % 2 == 0 { -2.5 } else { -1.5 };
        loads.push(at(
            0.3,
            LoadSpec::Prop {
                position: [x, 1.0, z],
                half_extents: [0.25, 0.25, 0.25],
            },
        ));
    }
    for position in [[-2.0, 1.0, -30.0], [6.0, 1.0, 4.0], [-10.0, 1.0, 8.0]] {
        loads.push(at(0.4, LoadSpec::Npc { position }));
    }

    let key = |f: fn(&mut InputState)| {
        let mut s = InputState::default();
        f(&mut s);
        s
    };
    let inputs = vec![
        // Walk up to the car and get in.
        hold(0.2, key(|s| s.forward = true)),
        hold(0.3, InputState::default()),
        hold(1.2, key(|s| s.interact = true)),
        hold(1.3, InputState::default()),
        // Drive through the props, then turn.
        hold(1.5, key(|s| s.forward = true)),
        hold(5.0, key(|s| {
            s.forward = true;
            s.left = true;
        })),
        hold(6.0, key(|s| s.forward = true)),
        // Reverse key: brakes first, then backs up once stopped.
        hold(7.0, key(|s| s.back = true)),
        hold(11.0, InputState::default()),
        // Step out and look around.
        hold(12.0, key(|s| s.interact = true)),
        hold(12.1, key(|s| s.look_delta = [120.0, -20.0])),
        hold(12.5, key(|s| s.jump = true)),
        hold(12.6, key(|s| s.right = true)),
        hold(14.0, InputState::default()),
    ];

    Scenario {
        config: SimConfig::default(),
        loads,
        inputs,
    }
}
