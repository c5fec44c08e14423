//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One tick = integrate, decide, fight, then check termination
//! - Seeded RNG only
//! - Stable iteration order (by slot index)

pub mod ai;
pub mod body;
pub mod combat;
pub mod events;
pub mod hazards;
pub mod physics;
pub mod state;
pub mod tick;

pub use ai::{AiController, AiState};
pub use body::{BodyHandle, BodyRegistry, PhysicsBody};
pub use combat::{AttackOutcome, AttackProfile, calculate_force, charge_multiplier};
pub use events::{ShakeRequest, Side, SimEvent};
pub use hazards::{HazardField, HazardKind};
pub use physics::{is_out_of_bounds, step};
pub use state::{Elimination, GameMode, MatchPhase, MatchResult, MatchState};
pub use tick::{FighterView, Game, GameSetup, Snapshot, TickInput};
