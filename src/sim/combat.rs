//! Melee combat resolution
//!
//! Force and damage are pure functions of attacker power, charge and target
//! weight. Landing an attack pushes the target through the body registry and
//! reports what happened; health bookkeeping and presentation effects are
//! left to the caller.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{BodyHandle, BodyRegistry};
use crate::consts::MAX_CHARGE;

/// Multiplier range of a charged attack
pub const MIN_CHARGE_MULTIPLIER: f32 = 1.0;
pub const MAX_CHARGE_MULTIPLIER: f32 = 4.0;

/// Slack on the reach test so fighters separated to exactly `melee_range`
/// by the collision pass still connect
pub const REACH_TOLERANCE: f32 = 1e-3;

/// `(power * charge_multiplier) / (target_weight * 0.1)`
#[inline]
pub fn calculate_force(attack_power: f32, charge_multiplier: f32, target_weight: f32) -> f32 {
    (attack_power * charge_multiplier) / (target_weight * 0.1)
}

/// Linear map of charge `0..=100` onto `1.0..=4.0`
#[inline]
pub fn charge_multiplier(charge: f32) -> f32 {
    let charge = crate::clamp_gauge(charge, MAX_CHARGE);
    MIN_CHARGE_MULTIPLIER + (charge / MAX_CHARGE) * (MAX_CHARGE_MULTIPLIER - MIN_CHARGE_MULTIPLIER)
}

/// Reach and scaling of one kind of attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Attack misses beyond this centre-to-centre distance
    pub melee_range: f32,
    /// Knockback force = force * knockback_scale
    pub knockback_scale: f32,
    /// Damage = min(damage_cap, force * damage_scale)
    pub damage_scale: f32,
    pub damage_cap: f32,
}

impl AttackProfile {
    pub fn damage(&self, force: f32) -> f32 {
        (force * self.damage_scale).min(self.damage_cap).max(0.0)
    }

    /// Same profile with the damage cap multiplied (difficulty scaling)
    pub fn with_cap_scale(mut self, scale: f32) -> Self {
        self.damage_cap *= scale;
        self
    }
}

/// A single attack attempt
#[derive(Debug, Clone, Copy)]
pub struct Strike {
    pub attacker: BodyHandle,
    pub target: BodyHandle,
    pub power: f32,
    pub charge_multiplier: f32,
    pub target_weight: f32,
}

/// What a landed attack did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub force: f32,
    pub damage: f32,
    /// Unit vector from attacker to target
    pub direction: Vec3,
    /// Target position at impact
    pub impact: Vec3,
}

/// Try to land `strike`. Returns `None` if either body is gone or the target
/// is out of reach; otherwise the knockback has already been applied.
pub fn resolve_attack(
    registry: &mut BodyRegistry,
    strike: &Strike,
    profile: &AttackProfile,
) -> Option<AttackOutcome> {
    let attacker_pos = registry.get(strike.attacker)?.position;
    let target_pos = registry.get(strike.target)?.position;

    if attacker_pos.distance(target_pos) > profile.melee_range + REACH_TOLERANCE {
        return None;
    }

    let force = calculate_force(strike.power, strike.charge_multiplier, strike.target_weight);
    let direction = crate::direction_to(attacker_pos, target_pos);
    registry.apply_force(strike.target, direction * force * profile.knockback_scale);

    let damage = profile.damage(force);
    log::debug!(
        "Attack landed: multiplier {:.2}, force {:.2}, damage {:.1}",
        strike.charge_multiplier,
        force,
        damage
    );

    Some(AttackOutcome {
        force,
        damage,
        direction,
        impact: target_pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::PhysicsBody;
    use proptest::prelude::*;

    fn profile() -> AttackProfile {
        AttackProfile {
            melee_range: 3.0,
            knockback_scale: 10.0,
            damage_scale: 2.0,
            damage_cap: 30.0,
        }
    }

    #[test]
    fn test_reference_force() {
        assert!((calculate_force(5.0, 1.0, 5.0) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_charge_multiplier_range() {
        assert_eq!(charge_multiplier(0.0), 1.0);
        assert_eq!(charge_multiplier(50.0), 2.5);
        assert_eq!(charge_multiplier(100.0), 4.0);
        assert_eq!(charge_multiplier(250.0), 4.0);
        assert_eq!(charge_multiplier(-10.0), 1.0);
    }

    #[test]
    fn test_damage_is_capped() {
        let p = profile();
        assert_eq!(p.damage(10.0), 20.0);
        assert_eq!(p.damage(40.0), 30.0);
        assert_eq!(p.with_cap_scale(2.0).damage(40.0), 60.0);
    }

    #[test]
    fn test_attack_in_range_applies_knockback() {
        let mut reg = BodyRegistry::new();
        let attacker = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        let target = reg.add(PhysicsBody::dynamic(Vec3::new(2.0, 0.0, 0.0), 5.0, 1.5));

        let strike = Strike {
            attacker,
            target,
            power: 5.0,
            charge_multiplier: 1.0,
            target_weight: 5.0,
        };
        let outcome = resolve_attack(&mut reg, &strike, &profile()).unwrap();

        assert!((outcome.force - 10.0).abs() < 1e-5);
        assert!((outcome.damage - 20.0).abs() < 1e-5);
        assert_eq!(outcome.direction, Vec3::X);
        // force 10 * knockback 10 / mass 5
        assert!((reg.get(target).unwrap().acceleration.x - 20.0).abs() < 1e-4);
        assert_eq!(reg.get(attacker).unwrap().acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_attack_out_of_range_misses() {
        let mut reg = BodyRegistry::new();
        let attacker = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        let target = reg.add(PhysicsBody::dynamic(Vec3::new(3.1, 0.0, 0.0), 5.0, 1.5));
        let strike = Strike {
            attacker,
            target,
            power: 9.0,
            charge_multiplier: 4.0,
            target_weight: 2.0,
        };

        assert!(resolve_attack(&mut reg, &strike, &profile()).is_none());
        assert_eq!(reg.get(target).unwrap().acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_attack_at_exact_reach_lands() {
        let mut reg = BodyRegistry::new();
        let attacker = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        // One ulp past the range, as left by collision separation
        let edge = f32::from_bits(3.0f32.to_bits() + 1);
        let target = reg.add(PhysicsBody::dynamic(Vec3::new(edge, 0.0, 0.0), 5.0, 1.5));
        let strike = Strike {
            attacker,
            target,
            power: 5.0,
            charge_multiplier: 1.0,
            target_weight: 5.0,
        };
        assert!(resolve_attack(&mut reg, &strike, &profile()).is_some());
    }

    #[test]
    fn test_attack_on_removed_body_is_noop() {
        let mut reg = BodyRegistry::new();
        let attacker = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        let target = reg.add(PhysicsBody::dynamic(Vec3::X, 5.0, 1.5));
        reg.remove(target);
        let strike = Strike {
            attacker,
            target,
            power: 5.0,
            charge_multiplier: 1.0,
            target_weight: 5.0,
        };
        assert!(resolve_attack(&mut reg, &strike, &profile()).is_none());
    }

    proptest! {
        #[test]
        fn prop_force_increases_with_charge(
            power in 0.1f32..20.0,
            weight in 0.5f32..20.0,
            low in 1.0f32..4.0,
            bump in 0.01f32..3.0,
        ) {
            let high = low + bump;
            prop_assert!(calculate_force(power, high, weight) > calculate_force(power, low, weight));
        }

        #[test]
        fn prop_force_decreases_with_weight(
            power in 0.1f32..20.0,
            charge in 1.0f32..4.0,
            light in 0.5f32..20.0,
            bump in 0.01f32..10.0,
        ) {
            let heavy = light + bump;
            prop_assert!(calculate_force(power, charge, heavy) < calculate_force(power, charge, light));
        }
    }
}
