//! Enemy AI controller
//!
//! Four-state machine (idle, approach, attack, retreat). Each tick the
//! controller first decides whether to switch state (state timer expired or
//! a distance threshold crossed), then acts: thrust through the body
//! registry, or strike through the combat resolver.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BodyHandle, BodyRegistry};
use super::combat::{self, AttackOutcome, Strike};
use crate::roster::MovementStats;
use crate::tuning::{AiTuning, DurationRange, EnemyCombatTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Approach,
    Attack,
    Retreat,
}

impl AiState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::Approach => "approach",
            AiState::Attack => "attack",
            AiState::Retreat => "retreat",
        }
    }
}

/// State chosen whenever the controller re-evaluates
pub fn next_state(distance: f32, attack_ready: bool, tuning: &AiTuning) -> AiState {
    if distance < tuning.attack_distance && attack_ready {
        AiState::Attack
    } else if distance < tuning.approach_distance {
        AiState::Approach
    } else if distance > tuning.idle_distance {
        AiState::Idle
    } else {
        AiState::Retreat
    }
}

/// True when `distance` pushes the machine out of `state` early
pub fn crosses_exit_threshold(state: AiState, distance: f32, tuning: &AiTuning) -> bool {
    match state {
        AiState::Idle => distance < tuning.idle_distance,
        AiState::Approach => distance < tuning.attack_distance,
        AiState::Attack => distance > tuning.attack_exit_distance,
        AiState::Retreat => distance > tuning.retreat_exit_distance,
    }
}

/// Everything the enemy needs to know about itself for one tick
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile<'a> {
    pub movement: MovementStats,
    pub weight: f32,
    pub power: f32,
    /// Endless-mode multiplier (1.0 otherwise)
    pub difficulty: f32,
    /// Weight of the fighter being attacked
    pub target_weight: f32,
    pub ai: &'a AiTuning,
    pub combat: &'a EnemyCombatTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiController {
    state: AiState,
    state_timer: f32,
    state_duration: f32,
    attack_cooldown: f32,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl AiController {
    pub fn new(seed: u64, tuning: &AiTuning) -> Self {
        let mut controller = Self {
            state: AiState::Idle,
            state_timer: 0.0,
            state_duration: 0.0,
            attack_cooldown: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        controller.state_duration = controller.roll_duration(AiState::Idle, tuning);
        controller
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    pub fn attack_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    /// Advance timers and switch state if due. Returns true on a switch.
    pub fn think(&mut self, distance: f32, dt: f32, tuning: &AiTuning) -> bool {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.state_timer += dt;

        let expired = self.state_timer > self.state_duration;
        if !expired && !crosses_exit_threshold(self.state, distance, tuning) {
            return false;
        }

        let next = next_state(distance, self.attack_ready(), tuning);
        let changed = next != self.state;
        if changed {
            log::debug!(
                "Enemy AI: {} -> {} at distance {:.2}",
                self.state.as_str(),
                next.as_str(),
                distance
            );
        }
        self.state = next;
        self.state_timer = 0.0;
        self.state_duration = self.roll_duration(next, tuning);
        changed
    }

    /// Run one tick: decide, then act on the registry. Returns the outcome
    /// of an attack if one landed. Missing bodies make this a no-op.
    pub fn update(
        &mut self,
        registry: &mut BodyRegistry,
        me: BodyHandle,
        target: BodyHandle,
        profile: &EnemyProfile<'_>,
        dt: f32,
    ) -> Option<AttackOutcome> {
        let (my_pos, target_pos, target_vel) = {
            let body = registry.get(me)?;
            let target_body = registry.get(target)?;
            (body.position, target_body.position, target_body.velocity)
        };
        let distance = my_pos.distance(target_pos);

        self.think(distance, dt, profile.ai);

        let movement = &profile.movement;
        match self.state {
            AiState::Idle => {
                if self.rng.random::<f32>() < profile.ai.idle_jitter_chance {
                    let nudge = Vec3::new(
                        self.rng.random_range(-1.0..1.0),
                        self.rng.random_range(-1.0..1.0),
                        self.rng.random_range(-1.0..1.0),
                    );
                    registry.apply_thrust(
                        me,
                        nudge,
                        movement.acceleration * profile.ai.idle_jitter_scale,
                    );
                }
                None
            }
            AiState::Approach => {
                let aim = intercept_point(
                    target_pos,
                    target_vel,
                    distance,
                    movement.max_velocity * profile.ai.intercept_speed_fraction,
                    profile.difficulty,
                );
                registry.apply_thrust(
                    me,
                    aim - my_pos,
                    movement.acceleration * profile.ai.approach_thrust_scale * profile.difficulty,
                );
                if let Some(body) = registry.get_mut(me) {
                    body.velocity = body.velocity.clamp_length_max(movement.max_velocity.max(0.0));
                }
                None
            }
            AiState::Attack => {
                if distance >= profile.combat.trigger_range || !self.attack_ready() {
                    return None;
                }
                self.attack_cooldown = profile.combat.cooldown;
                let strike = Strike {
                    attacker: me,
                    target,
                    power: profile.power * profile.difficulty,
                    charge_multiplier: profile.combat.charge_multiplier,
                    target_weight: profile.target_weight,
                };
                let attack = profile.combat.attack.with_cap_scale(profile.difficulty);
                combat::resolve_attack(registry, &strike, &attack)
            }
            AiState::Retreat => {
                registry.apply_thrust(
                    me,
                    my_pos - target_pos,
                    movement.acceleration * profile.weight * profile.ai.retreat_thrust_scale,
                );
                None
            }
        }
    }

    fn roll_duration(&mut self, state: AiState, tuning: &AiTuning) -> f32 {
        let DurationRange { min, max } = match state {
            AiState::Idle => tuning.idle_duration,
            AiState::Approach => tuning.approach_duration,
            AiState::Attack => tuning.attack_duration,
            AiState::Retreat => tuning.retreat_duration,
        };
        min + (max - min).max(0.0) * self.rng.random::<f32>()
    }
}

/// Where the target will be after the time it takes to close `distance`
/// at `closing_speed`, with the lead stretched by `lead_scale`
pub fn intercept_point(
    target_pos: Vec3,
    target_vel: Vec3,
    distance: f32,
    closing_speed: f32,
    lead_scale: f32,
) -> Vec3 {
    if closing_speed <= 0.0 {
        return target_pos;
    }
    let intercept_time = distance / closing_speed;
    target_pos + target_vel * (intercept_time * lead_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster;
    use crate::sim::body::PhysicsBody;

    const DT: f32 = 1.0 / 60.0;
    /// Longer than any state duration, so every sample re-evaluates
    const LONG: f32 = 3.5;

    fn tuning() -> AiTuning {
        AiTuning::default()
    }

    #[test]
    fn test_threshold_boundaries() {
        let t = tuning();
        assert_eq!(next_state(2.99, true, &t), AiState::Attack);
        assert_eq!(next_state(2.99, false, &t), AiState::Approach);
        assert_eq!(next_state(3.01, true, &t), AiState::Approach);
        assert_eq!(next_state(5.99, true, &t), AiState::Approach);
        assert_eq!(next_state(6.01, true, &t), AiState::Retreat);
        assert_eq!(next_state(10.0, true, &t), AiState::Retreat);
        assert_eq!(next_state(10.01, true, &t), AiState::Idle);
    }

    #[test]
    fn test_exit_thresholds() {
        let t = tuning();
        assert!(crosses_exit_threshold(AiState::Idle, 9.99, &t));
        assert!(!crosses_exit_threshold(AiState::Idle, 10.01, &t));
        assert!(crosses_exit_threshold(AiState::Approach, 2.99, &t));
        assert!(!crosses_exit_threshold(AiState::Approach, 3.01, &t));
        assert!(crosses_exit_threshold(AiState::Attack, 4.01, &t));
        assert!(!crosses_exit_threshold(AiState::Attack, 3.99, &t));
        assert!(crosses_exit_threshold(AiState::Retreat, 8.01, &t));
        assert!(!crosses_exit_threshold(AiState::Retreat, 7.99, &t));
    }

    #[test]
    fn test_distance_sequence() {
        let t = tuning();
        let mut ai = AiController::new(7, &t);
        let mut visited = vec![ai.state()];
        for d in [12.0, 8.0, 4.0, 2.0, 5.0, 9.0] {
            ai.think(d, LONG, &t);
            visited.push(ai.state());
        }
        assert_eq!(
            visited,
            vec![
                AiState::Idle,
                AiState::Idle,
                AiState::Retreat,
                AiState::Approach,
                AiState::Attack,
                AiState::Approach,
                AiState::Retreat,
            ]
        );
    }

    #[test]
    fn test_distance_trigger_beats_timer() {
        let t = tuning();
        let mut ai = AiController::new(1, &t);
        // Far away: no switch before the idle timer runs out
        assert!(!ai.think(15.0, DT, &t));
        // Player comes close: switch immediately
        assert!(ai.think(2.0, DT, &t));
        assert_eq!(ai.state(), AiState::Attack);
        assert_eq!(ai.state_timer(), 0.0);
    }

    #[test]
    fn test_cooldown_blocks_attack_state() {
        let t = tuning();
        let combat = EnemyCombatTuning::default();
        let character = roster::character("balanced").unwrap();
        let profile = EnemyProfile {
            movement: character.movement(0.98),
            weight: 5.0,
            power: 5.0,
            difficulty: 1.0,
            target_weight: 5.0,
            ai: &t,
            combat: &combat,
        };
        let mut reg = BodyRegistry::new();
        let me = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        let player = reg.add(PhysicsBody::dynamic(Vec3::new(2.0, 0.0, 0.0), 5.0, 1.5));
        let mut ai = AiController::new(3, &t);

        let hit = ai.update(&mut reg, me, player, &profile, DT);
        assert_eq!(ai.state(), AiState::Attack);
        let hit = hit.expect("first strike lands");
        assert!((hit.force - calculate_expected(5.0, 1.2, 5.0)).abs() < 1e-4);
        assert_eq!(ai.attack_cooldown(), 1.5);

        // Still in range but cooling down
        assert!(ai.update(&mut reg, me, player, &profile, DT).is_none());
    }

    fn calculate_expected(power: f32, charge: f32, weight: f32) -> f32 {
        combat::calculate_force(power, charge, weight)
    }

    #[test]
    fn test_approach_leads_moving_target() {
        let aim = intercept_point(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 7.0, 3.5, 1.0);
        assert!((aim - Vec3::new(0.0, 4.0, 0.0)).length() < 1e-5);

        let harder = intercept_point(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 7.0, 3.5, 1.5);
        assert!(harder.y > aim.y);

        assert_eq!(intercept_point(Vec3::X, Vec3::Y, 5.0, 0.0, 1.0), Vec3::X);
    }

    #[test]
    fn test_approach_clamps_speed() {
        let t = tuning();
        let combat = EnemyCombatTuning::default();
        let movement = roster::character("brute").unwrap().movement(0.98);
        let profile = EnemyProfile {
            movement,
            weight: 8.0,
            power: 7.0,
            difficulty: 1.0,
            target_weight: 5.0,
            ai: &t,
            combat: &combat,
        };
        let mut reg = BodyRegistry::new();
        let mut body = PhysicsBody::dynamic(Vec3::ZERO, 8.0, 1.5);
        body.velocity = Vec3::new(50.0, 0.0, 0.0);
        let me = reg.add(body);
        let player = reg.add(PhysicsBody::dynamic(Vec3::new(5.0, 0.0, 0.0), 5.0, 1.5));
        let mut ai = AiController::new(9, &t);

        ai.update(&mut reg, me, player, &profile, DT);
        assert_eq!(ai.state(), AiState::Approach);
        let b = reg.get(me).unwrap();
        assert!(b.velocity.length() <= movement.max_velocity + 1e-4);
        assert!(b.acceleration.x > 0.0);
    }

    #[test]
    fn test_retreat_thrusts_away() {
        let t = tuning();
        let combat = EnemyCombatTuning::default();
        let profile = EnemyProfile {
            movement: roster::character("balanced").unwrap().movement(0.98),
            weight: 5.0,
            power: 5.0,
            difficulty: 1.0,
            target_weight: 5.0,
            ai: &t,
            combat: &combat,
        };
        let mut reg = BodyRegistry::new();
        let me = reg.add(PhysicsBody::dynamic(Vec3::new(7.0, 0.0, 0.0), 5.0, 1.5));
        let player = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        let mut ai = AiController::new(11, &t);

        ai.update(&mut reg, me, player, &profile, DT);
        assert_eq!(ai.state(), AiState::Retreat);
        assert!(reg.get(me).unwrap().acceleration.x > 0.0);
    }

    #[test]
    fn test_missing_bodies_are_ignored() {
        let t = tuning();
        let combat = EnemyCombatTuning::default();
        let profile = EnemyProfile {
            movement: roster::character("balanced").unwrap().movement(0.98),
            weight: 5.0,
            power: 5.0,
            difficulty: 1.0,
            target_weight: 5.0,
            ai: &t,
            combat: &combat,
        };
        let mut reg = BodyRegistry::new();
        let me = reg.add(PhysicsBody::dynamic(Vec3::ZERO, 5.0, 1.5));
        let player = reg.add(PhysicsBody::dynamic(Vec3::X, 5.0, 1.5));
        reg.remove(player);
        let mut ai = AiController::new(2, &t);

        assert!(ai.update(&mut reg, me, player, &profile, DT).is_none());
        assert_eq!(ai.state_timer(), 0.0);
    }
}
