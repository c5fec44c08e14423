//! Orbit Brawl - A zero-gravity arena brawler
//!
//! Core modules:
//! - `sim`: Simulation core (rigid bodies, combat, enemy AI, match lifecycle)
//! - `roster`: Static character and arena tables
//! - `tuning`: Data-driven game balance
//! - `persistence`: Player profile save/load
//! - `platform`: Browser/native platform abstraction (storage, ads, time)
//! - `settings`, `camera`: Presentation-side preferences and shake consumption

pub mod camera;
pub mod persistence;
pub mod platform;
pub mod roster;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::{PlayerData, Statistics};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept before clamping
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Health and charge are both expressed on a 0..=100 scale
    pub const MAX_HEALTH: f32 = 100.0;
    pub const MAX_CHARGE: f32 = 100.0;

    /// Fighter body radius
    pub const FIGHTER_RADIUS: f32 = 1.5;
    /// Spawn distance from arena centre along x (player left, enemy right)
    pub const SPAWN_OFFSET: f32 = 8.0;

    /// Static bumpers sit on each axis at this distance
    pub const BUMPER_DISTANCE: f32 = 15.0;
    pub const BUMPER_RADIUS: f32 = 2.0;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}

/// Clamp a gauge value (health/charge) into `0..=max`
#[inline]
pub fn clamp_gauge(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}
