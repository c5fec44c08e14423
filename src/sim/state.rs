//! Match/session state
//!
//! Health, charge, wave progression and the match timer. Gauges are clamped
//! on every write; termination is decided by `Game::tick` polling this state
//! after all of a tick's mutations have been applied.

use serde::{Deserialize, Serialize};

use crate::clamp_gauge;
use crate::consts::{MAX_CHARGE, MAX_HEALTH};
use crate::persistence::PlayerData;
use crate::tuning::RewardTuning;

use super::hazards::HazardKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Arcade,
    /// Enemies respawn stronger each wave until the player falls
    Endless,
    /// Arcade rules with a per-day arena and opponent
    DailyChallenge,
}

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No match started yet
    Inactive,
    Active,
    Victory,
    Defeat,
}

/// Why a fighter went down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Elimination {
    Health,
    OutOfBounds,
    Hazard(HazardKind),
}

/// Final outcome of a match, exposed for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub victory: bool,
    pub reward: u32,
    pub wave_reached: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: GameMode,
    pub phase: MatchPhase,
    /// Starts at 1
    pub wave: u32,
    /// Seconds of active play
    pub timer: f32,
    player_health: f32,
    enemy_health: f32,
    player_charge: f32,
    /// Result of the most recently finished match
    pub last_result: Option<MatchResult>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(GameMode::Arcade)
    }
}

impl MatchState {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            phase: MatchPhase::Inactive,
            wave: 1,
            timer: 0.0,
            player_health: MAX_HEALTH,
            enemy_health: MAX_HEALTH,
            player_charge: 0.0,
            last_result: None,
        }
    }

    /// Reset gauges and timer and go active at `wave`
    pub fn start(&mut self, mode: GameMode, wave: u32) {
        self.mode = mode;
        self.phase = MatchPhase::Active;
        self.wave = wave.max(1);
        self.timer = 0.0;
        self.player_health = MAX_HEALTH;
        self.enemy_health = MAX_HEALTH;
        self.player_charge = 0.0;
        log::info!("Match started: {:?}, wave {}", mode, self.wave);
    }

    pub fn is_active(&self) -> bool {
        self.phase == MatchPhase::Active
    }

    pub fn advance_timer(&mut self, dt: f32) {
        if self.is_active() {
            self.timer += dt.max(0.0);
        }
    }

    pub fn player_health(&self) -> f32 {
        self.player_health
    }

    pub fn enemy_health(&self) -> f32 {
        self.enemy_health
    }

    pub fn player_charge(&self) -> f32 {
        self.player_charge
    }

    pub fn set_player_health(&mut self, health: f32) {
        self.player_health = clamp_gauge(health, MAX_HEALTH);
    }

    pub fn set_enemy_health(&mut self, health: f32) {
        self.enemy_health = clamp_gauge(health, MAX_HEALTH);
    }

    pub fn set_player_charge(&mut self, charge: f32) {
        self.player_charge = clamp_gauge(charge, MAX_CHARGE);
    }

    pub fn damage_player(&mut self, amount: f32) {
        self.set_player_health(self.player_health - amount);
    }

    pub fn damage_enemy(&mut self, amount: f32) {
        self.set_enemy_health(self.enemy_health - amount);
    }

    /// True if an enemy knockout advances the wave instead of ending the match
    pub fn continues_after_knockout(&self) -> bool {
        self.mode == GameMode::Endless
    }

    /// Next endless wave: fresh enemy, player's charge drained
    pub fn next_wave(&mut self) {
        self.wave += 1;
        self.enemy_health = MAX_HEALTH;
        self.player_charge = 0.0;
        log::info!("Advancing to wave {}", self.wave);
    }

    /// Difficulty multiplier for the current wave (endless only)
    pub fn difficulty(&self, curve: &crate::tuning::DifficultyTuning) -> f32 {
        if self.mode == GameMode::Endless {
            curve.multiplier(self.wave)
        } else {
            1.0
        }
    }

    /// Finish the match: compute the reward, fold it into the profile and
    /// record the result. Ending an inactive match does nothing.
    pub fn end(
        &mut self,
        victory: bool,
        rewards: &RewardTuning,
        profile: &mut PlayerData,
    ) -> Option<MatchResult> {
        if !self.is_active() {
            return None;
        }

        let result = MatchResult {
            victory,
            reward: rewards.reward(victory, self.wave),
            wave_reached: self.wave,
        };
        profile.record_match(&result);

        self.phase = if victory {
            MatchPhase::Victory
        } else {
            MatchPhase::Defeat
        };
        self.last_result = Some(result);
        log::info!(
            "Match ended: {} at wave {}, reward {}",
            if victory { "victory" } else { "defeat" },
            result.wave_reached,
            result.reward
        );
        Some(result)
    }
}
