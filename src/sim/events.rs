//! Notifications emitted by the simulation
//!
//! The core never plays sounds, spawns particles or moves the camera. It
//! emits these values and the presentation layer decides what to do.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{Elimination, MatchResult};

/// Which fighter an event concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// Request for the camera to shake; the consumer owns decay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeRequest {
    pub intensity: f32,
    /// Seconds
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// An attack landed on `target`
    Hit {
        target: Side,
        position: Vec3,
        /// 0xRRGGBB tint for impact particles
        color: u32,
        /// Effect strength; drives particle count and hit sound
        intensity: f32,
        damage: f32,
    },
    Shake(ShakeRequest),
    /// Player started or released a charged slam
    ChargeStarted,
    ChargeReleased { charge: f32 },
    /// A fighter was knocked out (endless waves continue afterwards)
    Eliminated { side: Side, cause: Elimination },
    /// Endless mode moved on to `wave`
    WaveAdvanced { wave: u32 },
    MatchEnded(MatchResult),
    Paused,
    Resumed,
}
