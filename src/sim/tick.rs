//! Fixed timestep simulation tick
//!
//! `Game` owns every piece of match state. The host calls `Game::tick` once
//! per fixed step with that step's input flags and gets back an immutable
//! `Snapshot` to render from. Within a tick:
//! 1. integrate and resolve collisions
//! 2. advance hazards and the match timer
//! 3. player control (thrust, rotation, charge, attacks)
//! 4. enemy AI
//! 5. termination checks, player first

use glam::Vec3;
use serde::Serialize;

use super::ai::{AiController, AiState, EnemyProfile};
use super::body::{BodyHandle, BodyRegistry, PhysicsBody};
use super::combat::{self, AttackOutcome, Strike};
use super::events::{ShakeRequest, Side, SimEvent};
use super::hazards::{HazardField, HazardKind};
use super::physics;
use super::state::{Elimination, GameMode, MatchPhase, MatchResult, MatchState};
use crate::consts::*;
use crate::persistence::PlayerData;
use crate::platform::rewards::RewardOutcome;
use crate::platform::storage::KeyValueStore;
use crate::roster::{Arena, Character, DailyChallenge, MovementStats, ARENAS, CHARACTERS};
use crate::tuning::Tuning;

/// Input flags for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub thrust_left: bool,
    pub thrust_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Basic attack, one-shot
    pub punch: bool,
    /// Held to charge, released to strike
    pub charged_slam: bool,
    /// Pause toggle, one-shot
    pub pause: bool,
}

impl TickInput {
    /// Unnormalized thrust direction in the arena plane
    pub fn thrust_direction(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vec3::new(
            axis(self.thrust_right, self.thrust_left),
            axis(self.thrust_up, self.thrust_down),
            0.0,
        )
    }

    /// +1 counter-clockwise, -1 clockwise, 0 when both or neither are held
    pub fn rotation(&self) -> f32 {
        (self.rotate_left as i8 - self.rotate_right as i8) as f32
    }
}

/// Who fights where
#[derive(Debug, Clone, Copy)]
pub struct GameSetup {
    pub mode: GameMode,
    pub player: &'static Character,
    pub enemy: &'static Character,
    pub arena: &'static Arena,
    /// Seeds the enemy AI; each wave derives its own stream from it
    pub seed: u64,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            mode: GameMode::Arcade,
            player: &CHARACTERS[2],
            enemy: &CHARACTERS[1],
            arena: &ARENAS[0],
            seed: 0,
        }
    }
}

impl GameSetup {
    /// Today's arena and opponent with the player's own character
    pub fn daily(challenge: &DailyChallenge, player: &'static Character) -> Self {
        Self {
            mode: GameMode::DailyChallenge,
            player,
            enemy: challenge.opponent,
            arena: challenge.arena,
            seed: challenge.seed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fighter {
    handle: BodyHandle,
    character: &'static Character,
    movement: MovementStats,
    /// Radians about +z
    facing: f32,
    /// Seconds of hazard immunity left
    grace: f32,
}

/// Per-fighter state handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FighterView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub health: f32,
    pub charge: f32,
    pub facing: f32,
}

/// Immutable view of the game after one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: MatchPhase,
    pub mode: GameMode,
    pub paused: bool,
    pub wave: u32,
    pub timer: f32,
    pub player: FighterView,
    pub enemy: FighterView,
    pub enemy_ai: AiState,
    pub hazards: Vec<(HazardKind, Vec3)>,
    pub result: Option<MatchResult>,
    /// Everything that happened during this tick, in order
    pub events: Vec<SimEvent>,
}

pub struct Game {
    setup: GameSetup,
    tuning: Tuning,
    profile: PlayerData,
    store: Box<dyn KeyValueStore>,
    state: MatchState,
    registry: BodyRegistry,
    player: Fighter,
    enemy: Fighter,
    ai: AiController,
    hazards: HazardField,
    paused: bool,
    charging: bool,
    bonus_claimed: bool,
    events: Vec<SimEvent>,
}

impl Game {
    /// Build the arena and fighters. The match stays inactive until
    /// `start_match`.
    pub fn new(
        setup: GameSetup,
        tuning: Tuning,
        profile: PlayerData,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut registry = BodyRegistry::new();
        let player = spawn_fighter(&mut registry, setup.player, -SPAWN_OFFSET, &tuning);
        let enemy = spawn_fighter(&mut registry, setup.enemy, SPAWN_OFFSET, &tuning);
        let ai = AiController::new(wave_seed(setup.seed, 1), &tuning.ai);

        let mut game = Self {
            setup,
            state: MatchState::new(setup.mode),
            hazards: HazardField::new(setup.arena.hazards),
            tuning,
            profile,
            store,
            registry,
            player,
            enemy,
            ai,
            paused: false,
            charging: false,
            bonus_claimed: false,
            events: Vec::new(),
        };
        game.spawn_bumpers();
        game
    }

    /// Reset the arena and go active at wave 1
    pub fn start_match(&mut self) {
        self.registry.clear();
        self.spawn_bumpers();
        self.player = spawn_fighter(
            &mut self.registry,
            self.setup.player,
            -SPAWN_OFFSET,
            &self.tuning,
        );
        self.enemy = spawn_fighter(
            &mut self.registry,
            self.setup.enemy,
            SPAWN_OFFSET,
            &self.tuning,
        );
        self.ai = AiController::new(wave_seed(self.setup.seed, 1), &self.tuning.ai);
        self.hazards = HazardField::new(self.setup.arena.hazards);
        self.paused = false;
        self.charging = false;
        self.bonus_claimed = false;
        self.events.clear();
        self.state.start(self.setup.mode, 1);
    }

    /// Advance one fixed step
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Snapshot {
        if input.pause && self.state.is_active() {
            self.paused = !self.paused;
            self.events.push(if self.paused {
                SimEvent::Paused
            } else {
                SimEvent::Resumed
            });
        }

        if self.state.is_active() && !self.paused {
            physics::step(&mut self.registry, &self.tuning.physics, dt);

            self.hazards.advance(dt);
            self.state.advance_timer(dt);
            self.player.grace = (self.player.grace - dt).max(0.0);
            self.enemy.grace = (self.enemy.grace - dt).max(0.0);

            self.control_player(input, dt);
            self.run_enemy(dt);
            self.check_termination();
        }

        let mut snapshot = self.snapshot();
        snapshot.events = std::mem::take(&mut self.events);
        snapshot
    }

    /// Current state without consuming pending events
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            mode: self.state.mode,
            paused: self.paused,
            wave: self.state.wave,
            timer: self.state.timer,
            player: self.view(&self.player, self.state.player_health(), self.state.player_charge()),
            enemy: self.view(&self.enemy, self.state.enemy_health(), 0.0),
            enemy_ai: self.ai.state(),
            hazards: self.hazards.contact_points(),
            result: self.state.last_result,
            events: Vec::new(),
        }
    }

    /// Apply a rewarded-ad outcome: a granted ad pays the last match's
    /// reward a second time. Returns the stardust added.
    pub fn claim_ad_bonus(&mut self, outcome: RewardOutcome) -> u32 {
        if outcome != RewardOutcome::Granted || self.bonus_claimed || self.state.is_active() {
            return 0;
        }
        let Some(result) = self.state.last_result else {
            return 0;
        };
        self.bonus_claimed = true;
        self.profile.add_stardust(result.reward);
        self.persist_profile();
        result.reward
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn profile(&self) -> &PlayerData {
        &self.profile
    }

    /// Mutable profile for store purchases; call `persist_profile` afterwards
    pub fn profile_mut(&mut self) -> &mut PlayerData {
        &mut self.profile
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn setup(&self) -> &GameSetup {
        &self.setup
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn player_handle(&self) -> BodyHandle {
        self.player.handle
    }

    pub fn enemy_handle(&self) -> BodyHandle {
        self.enemy.handle
    }

    pub fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Save the profile, logging instead of failing
    pub fn persist_profile(&mut self) {
        if let Err(e) = self.profile.save(self.store.as_mut()) {
            log::warn!("Failed to save profile: {e}");
        }
    }

    fn control_player(&mut self, input: &TickInput, dt: f32) {
        let handle = self.player.handle;
        let movement = self.player.movement;

        self.registry.apply_thrust(
            handle,
            input.thrust_direction(),
            movement.acceleration * movement.mass,
        );
        self.player.facing += input.rotation() * movement.rotation_speed * dt;

        let mut released = false;
        if input.charged_slam {
            if !self.charging {
                self.charging = true;
                self.events.push(SimEvent::ChargeStarted);
            }
            let charge = self.state.player_charge() + self.tuning.player.charge_rate * dt;
            self.state.set_player_charge(charge);
        } else if self.charging {
            let charge = self.state.player_charge();
            self.charging = false;
            released = true;
            self.state.set_player_charge(0.0);
            self.events.push(SimEvent::ChargeReleased { charge });
            self.player_attack(combat::charge_multiplier(charge));
        }

        if input.punch && !self.charging && !released {
            self.player_attack(combat::MIN_CHARGE_MULTIPLIER);
        }
    }

    fn player_attack(&mut self, multiplier: f32) {
        let strike = Strike {
            attacker: self.player.handle,
            target: self.enemy.handle,
            power: self.player.character.stats.power,
            charge_multiplier: multiplier,
            target_weight: self.enemy.character.stats.weight,
        };
        let Some(outcome) =
            combat::resolve_attack(&mut self.registry, &strike, &self.tuning.player.attack)
        else {
            return;
        };

        self.state.damage_enemy(outcome.damage);
        let shake = ShakeRequest {
            intensity: multiplier * self.tuning.player.shake_per_multiplier,
            duration: self.tuning.player.shake_duration,
        };
        self.push_hit(Side::Enemy, &outcome, self.player.character.color, multiplier, shake);
    }

    fn run_enemy(&mut self, dt: f32) {
        let profile = EnemyProfile {
            movement: self.enemy.movement,
            weight: self.enemy.character.stats.weight,
            power: self.enemy.character.stats.power,
            difficulty: self.state.difficulty(&self.tuning.difficulty),
            target_weight: self.player.character.stats.weight,
            ai: &self.tuning.ai,
            combat: &self.tuning.enemy,
        };
        let Some(outcome) = self.ai.update(
            &mut self.registry,
            self.enemy.handle,
            self.player.handle,
            &profile,
            dt,
        ) else {
            return;
        };

        self.state.damage_player(outcome.damage);
        let shake = ShakeRequest {
            intensity: self.tuning.enemy.shake_intensity,
            duration: self.tuning.enemy.shake_duration,
        };
        let intensity = self.tuning.enemy.charge_multiplier;
        self.push_hit(Side::Player, &outcome, self.enemy.character.color, intensity, shake);
    }

    fn push_hit(
        &mut self,
        target: Side,
        outcome: &AttackOutcome,
        color: u32,
        intensity: f32,
        shake: ShakeRequest,
    ) {
        self.events.push(SimEvent::Hit {
            target,
            position: outcome.impact,
            color,
            intensity,
            damage: outcome.damage,
        });
        self.events.push(SimEvent::Shake(shake));
    }

    fn check_termination(&mut self) {
        if let Some(cause) = self.elimination(&self.player, self.state.player_health()) {
            self.events.push(SimEvent::Eliminated {
                side: Side::Player,
                cause,
            });
            self.finish(false);
            return;
        }

        let Some(cause) = self.elimination(&self.enemy, self.state.enemy_health()) else {
            return;
        };
        self.events.push(SimEvent::Eliminated {
            side: Side::Enemy,
            cause,
        });
        if self.state.continues_after_knockout() {
            self.state.next_wave();
            self.respawn_enemy();
            self.events.push(SimEvent::WaveAdvanced {
                wave: self.state.wave,
            });
        } else {
            self.finish(true);
        }
    }

    fn elimination(&self, fighter: &Fighter, health: f32) -> Option<Elimination> {
        if health <= 0.0 {
            return Some(Elimination::Health);
        }
        let position = self.registry.get(fighter.handle)?.position;
        if physics::is_out_of_bounds(position, self.tuning.physics.boundary_radius) {
            return Some(Elimination::OutOfBounds);
        }
        if fighter.grace > 0.0 {
            return None;
        }
        self.hazards.touching(position).map(Elimination::Hazard)
    }

    fn finish(&mut self, victory: bool) {
        self.charging = false;
        let Some(result) = self
            .state
            .end(victory, &self.tuning.rewards, &mut self.profile)
        else {
            return;
        };
        self.persist_profile();
        self.events.push(SimEvent::MatchEnded(result));
    }

    /// Fresh enemy body and AI for the next endless wave
    fn respawn_enemy(&mut self) {
        self.registry.remove(self.enemy.handle);
        self.enemy = spawn_fighter(
            &mut self.registry,
            self.setup.enemy,
            SPAWN_OFFSET,
            &self.tuning,
        );
        self.ai = AiController::new(wave_seed(self.setup.seed, self.state.wave), &self.tuning.ai);
    }

    fn spawn_bumpers(&mut self) {
        for axis in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            self.registry
                .add(PhysicsBody::fixed(axis * BUMPER_DISTANCE, BUMPER_RADIUS));
        }
    }

    fn view(&self, fighter: &Fighter, health: f32, charge: f32) -> FighterView {
        let (position, velocity) = self
            .registry
            .get(fighter.handle)
            .map(|b| (b.position, b.velocity))
            .unwrap_or_default();
        FighterView {
            position,
            velocity,
            health,
            charge,
            facing: fighter.facing,
        }
    }
}

fn spawn_fighter(
    registry: &mut BodyRegistry,
    character: &'static Character,
    x: f32,
    tuning: &Tuning,
) -> Fighter {
    let movement = character.movement(tuning.physics.friction);
    let handle = registry.add(PhysicsBody::dynamic(
        Vec3::new(x, 0.0, 0.0),
        movement.mass,
        FIGHTER_RADIUS,
    ));
    Fighter {
        handle,
        character,
        movement,
        // Face the centre
        facing: if x > 0.0 { std::f32::consts::PI } else { 0.0 },
        grace: tuning.hazard_grace,
    }
}

fn wave_seed(seed: u64, wave: u32) -> u64 {
    seed ^ (wave as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
