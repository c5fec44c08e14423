//! Data-driven game balance
//!
//! Every number that shapes the feel of a fight lives here rather than in
//! the simulation code. `Tuning::default()` carries the shipped values; a
//! JSON override can replace any subset of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::combat::AttackProfile;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Integrator and collision constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Velocity damping applied once per tick ("space drag")
    pub friction: f32,
    /// Collision bounciness
    pub restitution: f32,
    /// Bodies farther than this from the origin are out of bounds
    pub boundary_radius: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            friction: 0.98,
            restitution: 0.6,
            boundary_radius: 20.0,
        }
    }
}

/// Player attack numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerCombatTuning {
    pub attack: AttackProfile,
    /// Charge gained per second while the slam is held
    pub charge_rate: f32,
    /// Shake per unit of charge multiplier when a player hit lands
    pub shake_per_multiplier: f32,
    pub shake_duration: f32,
}

impl Default for PlayerCombatTuning {
    fn default() -> Self {
        Self {
            attack: AttackProfile {
                melee_range: 3.0,
                knockback_scale: 10.0,
                damage_scale: 2.0,
                damage_cap: 30.0,
            },
            charge_rate: 100.0,
            shake_per_multiplier: 0.1,
            shake_duration: 0.1,
        }
    }
}

/// Enemy attack numbers (before difficulty scaling)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCombatTuning {
    pub attack: AttackProfile,
    /// The AI never charges, but hits slightly harder than a basic punch
    pub charge_multiplier: f32,
    /// Distance at which the attack state tries to strike
    pub trigger_range: f32,
    pub cooldown: f32,
    pub shake_intensity: f32,
    pub shake_duration: f32,
}

impl Default for EnemyCombatTuning {
    fn default() -> Self {
        Self {
            attack: AttackProfile {
                melee_range: 4.0,
                knockback_scale: 8.0,
                damage_scale: 1.5,
                damage_cap: 25.0,
            },
            charge_multiplier: 1.2,
            trigger_range: 3.5,
            cooldown: 1.5,
            shake_intensity: 0.4,
            shake_duration: 0.15,
        }
    }
}

/// Seconds range `[min, max)` a state lasts before it is re-evaluated
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: f32,
    pub max: f32,
}

impl DurationRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Enemy state machine constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub idle_duration: DurationRange,
    pub approach_duration: DurationRange,
    pub attack_duration: DurationRange,
    pub retreat_duration: DurationRange,
    /// Below this distance (and off cooldown) the AI attacks
    pub attack_distance: f32,
    /// Below this distance the AI approaches
    pub approach_distance: f32,
    /// Above this distance the AI idles
    pub idle_distance: f32,
    /// Attack state is abandoned beyond this distance
    pub attack_exit_distance: f32,
    /// Retreat state ends beyond this distance
    pub retreat_exit_distance: f32,
    /// Per-tick chance of an exploratory nudge while idle
    pub idle_jitter_chance: f32,
    /// Fraction of acceleration used for the idle nudge
    pub idle_jitter_scale: f32,
    /// Acceleration multiplier while approaching
    pub approach_thrust_scale: f32,
    /// Fraction of max speed assumed when estimating intercept time
    pub intercept_speed_fraction: f32,
    /// Retreat thrust = acceleration * weight * this
    pub retreat_thrust_scale: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            idle_duration: DurationRange::new(1.0, 2.0),
            approach_duration: DurationRange::new(2.0, 3.0),
            attack_duration: DurationRange::new(0.5, 0.5),
            retreat_duration: DurationRange::new(1.5, 3.0),
            attack_distance: 3.0,
            approach_distance: 6.0,
            idle_distance: 10.0,
            attack_exit_distance: 4.0,
            retreat_exit_distance: 8.0,
            idle_jitter_chance: 0.1,
            idle_jitter_scale: 0.3,
            approach_thrust_scale: 10.0,
            intercept_speed_fraction: 0.7,
            retreat_thrust_scale: 0.6,
        }
    }
}

/// Endless-mode difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Multiplier growth per wave after the first
    pub per_wave: f32,
    /// Upper bound on the multiplier; `None` leaves it unbounded
    pub cap: Option<f32>,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            per_wave: 0.1,
            cap: Some(3.0),
        }
    }
}

impl DifficultyTuning {
    /// `1 + (wave - 1) * per_wave`, limited by `cap`
    pub fn multiplier(&self, wave: u32) -> f32 {
        let raw = 1.0 + wave.saturating_sub(1) as f32 * self.per_wave;
        match self.cap {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }
}

/// Match reward numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    pub victory_base: u32,
    pub victory_per_wave: u32,
    pub defeat: u32,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            victory_base: 25,
            victory_per_wave: 5,
            defeat: 10,
        }
    }
}

impl RewardTuning {
    pub fn reward(&self, victory: bool, wave: u32) -> u32 {
        if victory {
            self.victory_base + wave * self.victory_per_wave
        } else {
            self.defeat
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerCombatTuning,
    pub enemy: EnemyCombatTuning,
    pub ai: AiTuning,
    pub difficulty: DifficultyTuning,
    pub rewards: RewardTuning,
    /// Seconds after match start (and after each respawn) before hazards bite
    pub hazard_grace: f32,
}

impl Tuning {
    /// Parse a (partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        if !(p.friction > 0.0 && p.friction <= 1.0) {
            return Err(TuningError::Invalid {
                field: "physics.friction",
                reason: "must be in (0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&p.restitution) {
            return Err(TuningError::Invalid {
                field: "physics.restitution",
                reason: "must be in [0, 1]",
            });
        }
        if p.boundary_radius <= 0.0 {
            return Err(TuningError::Invalid {
                field: "physics.boundary_radius",
                reason: "must be positive",
            });
        }
        if self.player.attack.melee_range <= 0.0 || self.enemy.attack.melee_range <= 0.0 {
            return Err(TuningError::Invalid {
                field: "attack.melee_range",
                reason: "must be positive",
            });
        }
        if let Some(cap) = self.difficulty.cap {
            if cap < 1.0 {
                return Err(TuningError::Invalid {
                    field: "difficulty.cap",
                    reason: "must be at least 1.0",
                });
            }
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            player: PlayerCombatTuning::default(),
            enemy: EnemyCombatTuning::default(),
            ai: AiTuning::default(),
            difficulty: DifficultyTuning::default(),
            rewards: RewardTuning::default(),
            hazard_grace: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_curve() {
        let d = DifficultyTuning::default();
        assert_eq!(d.multiplier(1), 1.0);
        assert!((d.multiplier(2) - 1.1).abs() < 1e-6);
        assert!((d.multiplier(11) - 2.0).abs() < 1e-5);
        // Capped late waves
        assert_eq!(d.multiplier(500), 3.0);

        let unbounded = DifficultyTuning {
            per_wave: 0.1,
            cap: None,
        };
        assert!(unbounded.multiplier(500) > 50.0);
    }

    #[test]
    fn test_rewards() {
        let r = RewardTuning::default();
        assert_eq!(r.reward(true, 1), 30);
        assert_eq!(r.reward(true, 4), 45);
        assert_eq!(r.reward(false, 9), 10);
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{ "physics": { "restitution": 1.0 } }"#).unwrap();
        assert_eq!(t.physics.restitution, 1.0);
        assert_eq!(t.physics.friction, 0.98);
        assert_eq!(t.enemy.cooldown, 1.5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "physics": { "friction": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "physics.friction", .. }));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
