//! Post-integration ground snap and wall bounce for loose bodies.
//!
//! The resolver only corrects position and linear velocity. The one spin change it makes
//! is the extra rest damping while a slow body settles on the ground.

use crate::{
    body::RigidBody,
    collision::{RayHit, SurfaceProbe, SurfaceSet, settings::GROUND_PROBE_RANGE},
    config::BodyParams,
    utils::{Vec3, decay, horizontal},
};

/// Ground contact found by [`resolve_ground`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    pub ground_y: f32,
    /// The body was moved up this tick.
    pub snapped: bool,
}

/// Wall contact handled by [`resolve_walls`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallContact {
    pub point: Vec3,
    /// Horizontal unit normal pointing away from the wall.
    pub normal: Vec3,
    /// Distance the body was pushed out along `normal`.
    pub push: f32,
}

/// Keep a body on top of the ground set.
///
/// Behavior
/// - Skipped while the body is in its spawn grace window, except for the one-shot
///   placement, which casts from `placement_lift` above the body and sets the height exactly.
/// - With no ground set registered, `flat_ground_y` stands in for the ground.
/// - A body whose lowest point is at or below `ground + clearance` is pushed up to it, loses
///   any downward velocity and, when slow, comes to rest.
/// - A body above the ground is never pulled down.
pub fn resolve_ground<P: SurfaceProbe + ?Sized>(
    body: &mut RigidBody,
    probe: &P,
    params: &BodyParams,
    flat_ground_y: f32,
    placement_lift: f32,
    dt: f32,
) -> Option<GroundContact> {
    if !body.accepts_ground_snap() {
        return None;
    }

    let placing = body.needs_placement();
    let ground_y = if probe.has_set(SurfaceSet::Ground) {
        let pos = body.position;
        let hit = if placing {
            probe.ground_below_from(pos.x, pos.z, pos.y + placement_lift, GROUND_PROBE_RANGE)
        } else {
            probe.ground_below(&pos)
        };
        match hit {
            Some(hit) => hit.point.y,
            None => {
                body.is_grounded = false;
                return None;
            }
        }
    } else {
        flat_ground_y
    };

    let target_y = ground_y + params.ground_clearance_m + body.bounds.depth_below_origin();

    if placing {
        body.position.y = target_y;
        body.mark_placed();
    } else if body.position.y > target_y {
        body.is_grounded = false;
        return None;
    }

    let snapped = body.position.y < target_y;
    body.position.y = target_y;
    body.is_grounded = true;
    if body.velocity.y < 0.0 {
        body.velocity.y = 0.0;
    }
    if body.velocity.norm() < params.rest_speed_mps {
        body.velocity = Vec3::zeros();
        body.angular_velocity *= decay(params.rest_spin_keep, dt);
    }

    Some(GroundContact {
        ground_y,
        snapped: snapped || placing,
    })
}

/// Bounce a body off the wall set.
///
/// Rays run along the horizontal velocity from the body center and four planar offsets.
/// The first accepted hit reflects the horizontal velocity about the wall normal (scaled
/// by restitution along the normal) and pushes the body out by at least its own half width.
pub fn resolve_walls<P: SurfaceProbe + ?Sized>(
    body: &mut RigidBody,
    probe: &P,
    params: &BodyParams,
    dt: f32,
) -> Option<WallContact> {
    if !probe.has_set(SurfaceSet::Walls) {
        return None;
    }

    let planar = horizontal(&body.velocity);
    let speed = planar.norm();
    if speed <= params.wall_min_speed_mps {
        return None;
    }
    let dir = planar / speed;
    let ray_len = (speed * dt * params.wall_lookahead).min(params.wall_ray_max_m);
    if ray_len <= 0.0 {
        return None;
    }

    let o = params.wall_sample_offset_m;
    let samples = [
        Vec3::zeros(),
        Vec3::new(o, 0.0, 0.0),
        Vec3::new(-o, 0.0, 0.0),
        Vec3::new(0.0, 0.0, o),
        Vec3::new(0.0, 0.0, -o),
    ];

    let hit = samples
        .iter()
        .find_map(|offset| probe.wall_along(&(body.position + offset), &dir, ray_len))?;
    bounce(body, params, &hit)
}

fn bounce(body: &mut RigidBody, params: &BodyParams, hit: &RayHit) -> Option<WallContact> {
    let normal = horizontal(&hit.normal).try_normalize(1.0e-6)?;

    let planar = horizontal(&body.velocity);
    let into_wall = planar.dot(&normal);
    if into_wall < 0.0 {
        let reflected = planar - normal * ((1.0 + params.wall_restitution) * into_wall);
        body.velocity.x = reflected.x;
        body.velocity.z = reflected.z;
    }

    let half_width = body.bounds.half_width_along(&normal);
    let push = params
        .wall_min_push_m
        .max(half_width + params.wall_push_margin_m);
    body.position += normal * push;

    Some(WallContact {
        point: hit.point,
        normal,
        push,
    })
}
