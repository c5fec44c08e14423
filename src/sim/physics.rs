//! Integration and sphere-sphere collision response
//!
//! Zero gravity, constant per-tick drag. Bodies are spheres; with a handful
//! of bodies per arena the pair test is a plain O(n²) sweep.

use glam::Vec3;

use super::body::{BodyRegistry, PhysicsBody};
use crate::tuning::PhysicsTuning;

/// Outcome of a sphere-sphere overlap test
#[derive(Debug, Clone)]
pub struct Contact {
    /// Unit normal pointing from A toward B
    pub normal: Vec3,
    /// Overlap depth (sum of radii minus centre distance)
    pub penetration: f32,
}

/// Advance every body by `dt`, then resolve overlaps
pub fn step(registry: &mut BodyRegistry, tuning: &PhysicsTuning, dt: f32) {
    integrate(registry, tuning.friction, dt);
    resolve_collisions(registry, tuning.restitution);
}

/// Semi-implicit Euler with drag. Position uses the pre-drag velocity and
/// accumulated acceleration is cleared: forces only last one tick.
pub fn integrate(registry: &mut BodyRegistry, friction: f32, dt: f32) {
    for slot in registry.slots.iter_mut() {
        let Some(body) = slot.body.as_mut() else {
            continue;
        };
        if body.is_static {
            continue;
        }

        body.velocity += body.acceleration * dt;
        body.position += body.velocity * dt;
        body.velocity *= friction;
        body.acceleration = Vec3::ZERO;
    }
}

/// Test two spheres for overlap
pub fn sphere_contact(a: &PhysicsBody, b: &PhysicsBody) -> Option<Contact> {
    let delta = b.position - a.position;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return None;
    }

    // Coincident centres have no defined normal; separate along +X
    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec3::X
    };

    Some(Contact {
        normal,
        penetration: min_distance - distance,
    })
}

/// Resolve every overlapping pair (static-static pairs are skipped)
pub fn resolve_collisions(registry: &mut BodyRegistry, restitution: f32) {
    let slots = &mut registry.slots;
    let n = slots.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let (left, right) = slots.split_at_mut(j);
            let (Some(a), Some(b)) = (left[i].body.as_mut(), right[0].body.as_mut()) else {
                continue;
            };
            if a.is_immovable() && b.is_immovable() {
                continue;
            }
            if let Some(contact) = sphere_contact(a, b) {
                resolve_pair(a, b, &contact, restitution);
            }
        }
    }
}

/// Positional correction plus restitution impulse for one contact
pub fn resolve_pair(a: &mut PhysicsBody, b: &mut PhysicsBody, contact: &Contact, restitution: f32) {
    let a_moves = !a.is_immovable();
    let b_moves = !b.is_immovable();

    // Each movable body is pushed out by half the overlap
    let separation = contact.normal * (contact.penetration * 0.5);
    if a_moves {
        a.position -= separation;
    }
    if b_moves {
        b.position += separation;
    }

    let velocity_along_normal = (b.velocity - a.velocity).dot(contact.normal);

    // Already separating
    if velocity_along_normal > 0.0 {
        return;
    }

    let impulse = -(1.0 + restitution) * velocity_along_normal;
    let (share_a, share_b) = impulse_shares(a, b);

    if a_moves {
        a.velocity -= contact.normal * (impulse * share_a);
    }
    if b_moves {
        b.velocity += contact.normal * (impulse * share_b);
    }
}

/// Fraction of the impulse each body takes: `other_mass / total_mass`.
/// Against an immovable partner the movable body takes all of it.
fn impulse_shares(a: &PhysicsBody, b: &PhysicsBody) -> (f32, f32) {
    match (a.is_immovable(), b.is_immovable()) {
        (false, true) => (1.0, 0.0),
        (true, false) => (0.0, 1.0),
        (true, true) => (0.0, 0.0),
        (false, false) => {
            let total = a.mass + b.mass;
            if total <= 0.0 {
                return (0.5, 0.5);
            }
            (b.mass / total, a.mass / total)
        }
    }
}

/// True when `position` lies outside the arena sphere
#[inline]
pub fn is_out_of_bounds(position: Vec3, boundary_radius: f32) -> bool {
    position.length() > boundary_radius
}

#[inline]
pub fn distance_from_center(position: Vec3) -> f32 {
    position.length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyHandle;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn tuning(restitution: f32) -> PhysicsTuning {
        PhysicsTuning {
            restitution,
            ..Default::default()
        }
    }

    #[test]
    fn test_integration_order_without_force() {
        let mut reg = BodyRegistry::new();
        let mut body = PhysicsBody::dynamic(Vec3::new(1.0, 2.0, 3.0), 5.0, 1.0);
        body.velocity = Vec3::new(6.0, -3.0, 0.5);
        let h = reg.add(body);

        integrate(&mut reg, 0.98, DT);

        let b = reg.get(h).unwrap();
        let expected_pos = Vec3::new(1.0, 2.0, 3.0) + Vec3::new(6.0, -3.0, 0.5) * DT;
        assert!((b.position - expected_pos).length() < 1e-6);
        assert!((b.velocity - Vec3::new(6.0, -3.0, 0.5) * 0.98).length() < 1e-6);
    }

    #[test]
    fn test_acceleration_is_cleared_each_tick() {
        let mut reg = BodyRegistry::new();
        let h = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 2.0, 1.0));
        reg.apply_force(h, Vec3::new(120.0, 0.0, 0.0));

        integrate(&mut reg, 1.0, DT);
        let v1 = reg.get(h).unwrap().velocity;
        assert!((v1.x - 60.0 * DT).abs() < 1e-5);
        assert_eq!(reg.get(h).unwrap().acceleration, Vec3::ZERO);

        // No further acceleration without a new force
        integrate(&mut reg, 1.0, DT);
        assert!((reg.get(h).unwrap().velocity - v1).length() < 1e-6);
    }

    #[test]
    fn test_head_on_elastic_collision_conserves_momentum() {
        let mut reg = BodyRegistry::new();
        let mut a = PhysicsBody::dynamic(Vec3::new(-0.9, 0.0, 0.0), 5.0, 1.0);
        a.velocity = Vec3::new(4.0, 0.0, 0.0);
        let mut b = PhysicsBody::dynamic(Vec3::new(0.9, 0.0, 0.0), 5.0, 1.0);
        b.velocity = Vec3::new(-1.0, 0.5, 0.0);
        let ha = reg.add(a);
        let hb = reg.add(b);

        let before = momentum(&reg, &[ha, hb]);
        resolve_collisions(&mut reg, 1.0);
        let after = momentum(&reg, &[ha, hb]);

        assert!((before - after).length() < 1e-4);
        // Equal masses, perfectly elastic: normal velocities swap
        assert!((reg.get(ha).unwrap().velocity.x - (-1.0)).abs() < 1e-4);
        assert!((reg.get(hb).unwrap().velocity.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_overlap_is_corrected_symmetrically() {
        let mut reg = BodyRegistry::new();
        let ha = reg.add(PhysicsBody::dynamic(Vec3::new(-0.5, 0.0, 0.0), 1.0, 1.0));
        let hb = reg.add(PhysicsBody::dynamic(Vec3::new(0.5, 0.0, 0.0), 1.0, 1.0));

        resolve_collisions(&mut reg, 0.6);

        let a = reg.get(ha).unwrap().position;
        let b = reg.get(hb).unwrap().position;
        assert!((a.distance(b) - 2.0).abs() < 1e-5);
        assert!((a.x + b.x).abs() < 1e-6);
    }

    #[test]
    fn test_separating_bodies_keep_velocity() {
        let mut reg = BodyRegistry::new();
        let mut a = PhysicsBody::dynamic(Vec3::new(-0.5, 0.0, 0.0), 1.0, 1.0);
        a.velocity = Vec3::new(-2.0, 0.0, 0.0);
        let mut b = PhysicsBody::dynamic(Vec3::new(0.5, 0.0, 0.0), 1.0, 1.0);
        b.velocity = Vec3::new(2.0, 0.0, 0.0);
        let ha = reg.add(a);
        let hb = reg.add(b);

        resolve_collisions(&mut reg, 0.6);

        assert_eq!(reg.get(ha).unwrap().velocity, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(reg.get(hb).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_bounce_off_static_bumper() {
        let mut reg = BodyRegistry::new();
        let wall = reg.add(PhysicsBody::fixed(Vec3::new(15.0, 0.0, 0.0), 2.0));
        let mut ball = PhysicsBody::dynamic(Vec3::new(12.0, 0.0, 0.0), 5.0, 1.5);
        ball.velocity = Vec3::new(10.0, 0.0, 0.0);
        let h = reg.add(ball);

        resolve_collisions(&mut reg, 0.6);

        let b = reg.get(h).unwrap();
        assert!((b.velocity.x - (-6.0)).abs() < 1e-4);
        assert!(b.velocity.is_finite());
        assert_eq!(reg.get(wall).unwrap().position, Vec3::new(15.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(!is_out_of_bounds(Vec3::new(19.9, 0.0, 0.0), 20.0));
        assert!(!is_out_of_bounds(Vec3::new(20.0, 0.0, 0.0), 20.0));
        assert!(is_out_of_bounds(Vec3::new(15.0, 15.0, 0.0), 20.0));
        assert_eq!(distance_from_center(Vec3::new(3.0, 4.0, 0.0)), 5.0);
    }

    fn momentum(reg: &BodyRegistry, handles: &[BodyHandle]) -> Vec3 {
        handles
            .iter()
            .filter_map(|h| reg.get(*h))
            .map(|b| b.velocity * b.mass)
            .sum()
    }

    proptest! {
        #[test]
        fn prop_static_body_never_moves(
            px in -5.0f32..5.0, py in -5.0f32..5.0,
            vx in -20.0f32..20.0, vy in -20.0f32..20.0,
            steps in 1usize..60,
        ) {
            let mut reg = BodyRegistry::new();
            let anchor = Vec3::new(0.5, -0.25, 0.0);
            let wall = reg.add(PhysicsBody::fixed(anchor, 2.0));
            let mut mover = PhysicsBody::dynamic(Vec3::new(px, py, 0.1), 3.0, 1.5);
            mover.velocity = Vec3::new(vx, vy, 0.0);
            let h = reg.add(mover);

            for _ in 0..steps {
                reg.apply_force(h, Vec3::new(-px, -py, 0.0) * 50.0);
                reg.apply_force(wall, Vec3::splat(1000.0));
                step(&mut reg, &tuning(0.6), DT);
            }

            let w = reg.get(wall).unwrap();
            prop_assert_eq!(w.position, anchor);
            prop_assert_eq!(w.velocity, Vec3::ZERO);
        }
    }
}
