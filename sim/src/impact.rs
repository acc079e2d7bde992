//! Car-to-body knock-on impulses.
//!
//! Impacts are queued on the target body and applied at its next integration step.
//! A per-body cooldown keeps one contact from re-firing every frame.

use crate::{
    GRAVITY_MPS2,
    body::RigidBody,
    config::{NpcParams, PropParams},
    utils::{Vec3, horizontal},
};
use rand::Rng;

/// A knock-on that was applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub point: Vec3,
    /// Unit direction the body was pushed along.
    pub normal: Vec3,
    /// Closing speed at contact (m/s).
    pub speed: f32,
}

/// Uniformly distributed unit axis, falling back to +Y for a degenerate draw.
pub fn random_axis<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
        rng.gen_range(-0.5..0.5),
    );
    v.try_normalize(1.0e-6).unwrap_or_else(Vec3::y)
}

/// Unit direction from `from` to `to` on the ground plane, or `fallback`.
fn planar_direction(from: &Vec3, to: &Vec3, fallback: Vec3) -> Vec3 {
    horizontal(&(to - from))
        .try_normalize(1.0e-6)
        .unwrap_or(fallback)
}

/// Knock a loose prop away from a passing car.
///
/// Fires when the car is within `impact_radius_m` and faster than the minimum speed.
/// The prop gains `push * speed` away from the car, `lift * speed` upward and
/// `spin * speed` about a random axis.
pub fn knock_prop<R: Rng + ?Sized>(
    body: &mut RigidBody,
    car_position: &Vec3,
    car_forward: &Vec3,
    car_speed: f32,
    params: &PropParams,
    rng: &mut R,
) -> Option<Impact> {
    if car_speed <= params.impact_min_vehicle_speed_mps {
        return None;
    }
    if (body.position - car_position).norm() >= params.impact_radius_m {
        return None;
    }
    if !body.try_begin_impact(params.impact_cooldown_s) {
        return None;
    }

    let dir = (body.position - car_position)
        .try_normalize(1.0e-6)
        .unwrap_or(*car_forward);
    let delta_v = dir * (params.impact_push_per_speed * car_speed)
        + Vec3::y() * (params.impact_lift_per_speed * car_speed);
    let spin = random_axis(rng) * (params.impact_spin_per_speed * car_speed);
    body.add_impulse(delta_v, spin);

    Some(Impact {
        point: body.position,
        normal: dir,
        speed: car_speed,
    })
}

/// Velocity change for a pedestrian struck by a car.
///
/// Momentum transfer over an assumed contact time: `mass ratio * closing speed / contact
/// time`, capped at `max_knockback_g`, applied for the contact time. The push follows the
/// closing velocity, with a share of it added upward. `None` when the closing speed is
/// below the threshold.
pub fn knockback(
    car_velocity: &Vec3,
    npc_velocity: &Vec3,
    vehicle_mass: f32,
    npc_mass: f32,
    params: &NpcParams,
) -> Option<Vec3> {
    let closing = horizontal(&(car_velocity - npc_velocity));
    let rel_speed = closing.norm();
    if rel_speed <= params.impact_min_relative_speed_mps {
        return None;
    }
    let contact = params.contact_time_s;
    let accel = ((vehicle_mass / npc_mass) * rel_speed / contact)
        .min(params.max_knockback_g * GRAVITY_MPS2);
    let delta = accel * contact;

    Some(closing / rel_speed * delta + Vec3::y() * (delta * params.knockback_lift))
}

/// Car hitting a pedestrian body, if the car is moving, in range and off cooldown.
pub fn strike_npc<R: Rng + ?Sized>(
    body: &mut RigidBody,
    car_position: &Vec3,
    car_velocity: &Vec3,
    vehicle_mass: f32,
    params: &NpcParams,
    rng: &mut R,
) -> Option<(Impact, Vec3, Vec3)> {
    if horizontal(car_velocity).norm() <= params.impact_min_vehicle_speed_mps {
        return None;
    }
    if (body.position - car_position).norm() >= params.impact_radius_m {
        return None;
    }
    let delta_v = knockback(car_velocity, &body.velocity, vehicle_mass, body.mass, params)?;
    if !body.try_begin_impact(params.impact_cooldown_s) {
        return None;
    }
    let spin = random_axis(rng) * (horizontal(&delta_v).norm() * params.knockback_spin);
    let normal = planar_direction(car_position, &body.position, horizontal(&delta_v).normalize());

    Some((
        Impact {
            point: body.position,
            normal,
            speed: horizontal(&(car_velocity - body.velocity)).norm(),
        },
        delta_v,
        spin,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{collision::Bounds, config::BodyParams};
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn prop_at(x: f32) -> RigidBody {
        RigidBody::new(
            Vec3::new(x, 0.5, 0.0),
            Bounds::from_half_extents(Vec3::repeat(0.25)),
            &BodyParams::default(),
        )
    }

    #[test]
    fn prop_is_knocked_away_and_up() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = PropParams::default();
        let mut prop = prop_at(2.0);
        let impact = knock_prop(
            &mut prop,
            &Vec3::new(0.0, 0.5, 0.0),
            &Vec3::x(),
            10.0,
            &params,
            &mut rng,
        )
        .unwrap();
        assert_relative_eq!(impact.normal, Vec3::x(), epsilon = 1.0e-6);

        prop.gravity = 0.0;
        prop.linear_keep = 1.0;
        prop.integrate(0.0);
        assert_relative_eq!(prop.velocity.x, 8.0, epsilon = 1.0e-5);
        assert_relative_eq!(prop.velocity.y, 6.0, epsilon = 1.0e-5);
        assert_relative_eq!(prop.angular_velocity.norm(), 15.0, epsilon = 1.0e-3);
    }

    #[test]
    fn slow_or_distant_cars_do_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = PropParams::default();
        let mut prop = prop_at(2.0);
        let car = Vec3::new(0.0, 0.5, 0.0);
        assert!(knock_prop(&mut prop, &car, &Vec3::x(), 0.4, &params, &mut rng).is_none());
        let mut far = prop_at(3.0);
        assert!(knock_prop(&mut far, &car, &Vec3::x(), 10.0, &params, &mut rng).is_none());
    }

    #[test]
    fn repeated_contact_is_rate_limited() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = PropParams::default();
        let mut prop = prop_at(1.0);
        let car = Vec3::zeros();
        assert!(knock_prop(&mut prop, &car, &Vec3::x(), 5.0, &params, &mut rng).is_some());
        assert!(knock_prop(&mut prop, &car, &Vec3::x(), 5.0, &params, &mut rng).is_none());
    }

    #[test]
    fn knockback_is_capped_at_nine_g() {
        let params = NpcParams::default();
        let dv = knockback(&Vec3::new(0.0, 0.0, -20.0), &Vec3::zeros(), 1250.0, 70.0, &params)
            .unwrap();
        let planar = horizontal(&dv).norm();
        assert_relative_eq!(planar, 9.0 * GRAVITY_MPS2 * 0.1, epsilon = 1.0e-4);
        assert!(dv.z < 0.0 && dv.y > 0.0);
    }

    #[test]
    fn light_tap_scales_with_mass_ratio() {
        let params = NpcParams::default();
        // Equal masses, 0.6 m/s closing: 0.6 / 0.1 = 6 m/s² for 0.1 s.
        let still = Vec3::zeros();
        let dv = knockback(&Vec3::new(0.6, 0.0, 0.0), &still, 70.0, 70.0, &params).unwrap();
        assert_relative_eq!(dv.x, 0.6, epsilon = 1.0e-5);
        assert!(knockback(&Vec3::new(0.3, 0.0, 0.0), &still, 70.0, 70.0, &params).is_none());
    }

    #[test]
    fn parked_car_never_strikes() {
        let mut rng = StdRng::seed_from_u64(9);
        let params = NpcParams::default();
        let mut npc = RigidBody::new(
            Vec3::new(1.0, 0.95, 0.0),
            Bounds::from_half_extents(Vec3::new(0.3, 0.9, 0.3)),
            &params.body,
        );
        // Walking into the car gives a closing speed, but the car itself is still.
        npc.velocity = Vec3::new(-1.4, 0.0, 0.0);
        let hit = strike_npc(&mut npc, &Vec3::zeros(), &Vec3::zeros(), 1250.0, &params, &mut rng);
        assert!(hit.is_none());

        let moving = Vec3::new(5.0, 0.0, 0.0);
        assert!(strike_npc(&mut npc, &Vec3::zeros(), &moving, 1250.0, &params, &mut rng).is_some());
    }

    #[test]
    fn random_axis_is_unit_length() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            assert_relative_eq!(random_axis(&mut rng).norm(), 1.0, epsilon = 1.0e-5);
        }
    }
}
