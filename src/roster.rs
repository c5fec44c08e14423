//! Static character and arena tables
//!
//! Immutable records keyed by id. The simulation only ever reads them; the
//! movement parameters of a fighter are a pure function of its record.

use serde::{Deserialize, Serialize};

use crate::sim::hazards::HazardKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Stardust,
    Gems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockCost {
    pub currency: Currency,
    pub amount: u32,
}

/// Base stats of a gladiator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub weight: f32,
    pub power: f32,
    pub agility: f32,
    /// Listed max health; in-match health is always on the 0..=100 scale
    pub health: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Character {
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
    pub stats: CharacterStats,
    pub unlock_cost: UnlockCost,
    pub description: &'static str,
    /// 0xRRGGBB
    pub color: u32,
}

/// Movement parameters derived from a character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStats {
    pub max_velocity: f32,
    pub acceleration: f32,
    pub rotation_speed: f32,
    pub mass: f32,
    /// Per-tick velocity retention; the arena applies one drag to everyone
    pub dampening: f32,
}

impl Character {
    /// Heavier is slower, more agile accelerates and turns faster
    pub fn movement(&self, friction: f32) -> MovementStats {
        let CharacterStats {
            weight, agility, ..
        } = self.stats;
        MovementStats {
            max_velocity: 10.0 - weight * 0.5,
            acceleration: agility * 0.3,
            rotation_speed: agility * 0.1,
            mass: weight,
            dampening: friction,
        }
    }
}

pub const STARTER_CHARACTERS: [&str; 3] = ["swift", "brute", "balanced"];
pub const DEFAULT_CHARACTER: &str = "balanced";

const fn stardust(amount: u32) -> UnlockCost {
    UnlockCost {
        currency: Currency::Stardust,
        amount,
    }
}

pub static CHARACTERS: [Character; 6] = [
    Character {
        id: "swift",
        name: "Swift",
        rarity: Rarity::Common,
        stats: CharacterStats {
            weight: 3.0,
            power: 4.0,
            agility: 8.0,
            health: 100.0,
        },
        unlock_cost: stardust(0),
        description: "Lightweight and agile, perfect for hit-and-run tactics",
        color: 0x00ff88,
    },
    Character {
        id: "brute",
        name: "Brute",
        rarity: Rarity::Common,
        stats: CharacterStats {
            weight: 8.0,
            power: 7.0,
            agility: 2.0,
            health: 150.0,
        },
        unlock_cost: stardust(0),
        description: "Heavy hitter with massive knockback power",
        color: 0xff4444,
    },
    Character {
        id: "balanced",
        name: "Balanced",
        rarity: Rarity::Common,
        stats: CharacterStats {
            weight: 5.0,
            power: 5.0,
            agility: 5.0,
            health: 125.0,
        },
        unlock_cost: stardust(0),
        description: "Well-rounded fighter for all situations",
        color: 0x4488ff,
    },
    Character {
        id: "ninja",
        name: "Ninja",
        rarity: Rarity::Rare,
        stats: CharacterStats {
            weight: 2.0,
            power: 3.0,
            agility: 10.0,
            health: 100.0,
        },
        unlock_cost: stardust(500),
        description: "Ultra-fast with incredible maneuverability",
        color: 0x8844ff,
    },
    Character {
        id: "crusher",
        name: "Crusher",
        rarity: Rarity::Epic,
        stats: CharacterStats {
            weight: 7.0,
            power: 8.0,
            agility: 3.0,
            health: 175.0,
        },
        unlock_cost: stardust(800),
        description: "Devastating attacks with bone-crushing force",
        color: 0xff8844,
    },
    Character {
        id: "titan",
        name: "Titan",
        rarity: Rarity::Legendary,
        stats: CharacterStats {
            weight: 10.0,
            power: 9.0,
            agility: 1.0,
            health: 200.0,
        },
        unlock_cost: UnlockCost {
            currency: Currency::Gems,
            amount: 100,
        },
        description: "Immovable object with unstoppable force",
        color: 0xffaa00,
    },
];

pub fn character(id: &str) -> Option<&'static Character> {
    CHARACTERS.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaDifficulty {
    Tutorial,
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arena {
    pub id: u32,
    pub name: &'static str,
    pub difficulty: ArenaDifficulty,
    pub hazards: &'static [HazardKind],
    /// Stardust
    pub unlock_cost: u32,
    pub description: &'static str,
    pub background_color: u32,
}

pub const STARTER_ARENAS: [u32; 2] = [1, 2];

pub static ARENAS: [Arena; 4] = [
    Arena {
        id: 1,
        name: "Basic Box",
        difficulty: ArenaDifficulty::Tutorial,
        hazards: &[],
        unlock_cost: 0,
        description: "Simple training arena with no hazards",
        background_color: 0x001122,
    },
    Arena {
        id: 2,
        name: "Laser Grid",
        difficulty: ArenaDifficulty::Easy,
        hazards: &[HazardKind::Lasers],
        unlock_cost: 200,
        description: "Moving laser walls that eliminate on contact",
        background_color: 0x220011,
    },
    Arena {
        id: 3,
        name: "Piston Pit",
        difficulty: ArenaDifficulty::Easy,
        hazards: &[HazardKind::Pistons],
        unlock_cost: 300,
        description: "Crushing pistons that slam from the walls",
        background_color: 0x112200,
    },
    Arena {
        id: 4,
        name: "Spike Sphere",
        difficulty: ArenaDifficulty::Medium,
        hazards: &[HazardKind::Spikes],
        unlock_cost: 400,
        description: "Rotating spike balls orbit the arena",
        background_color: 0x221100,
    },
];

pub fn arena(id: u32) -> Option<&'static Arena> {
    ARENAS.iter().find(|a| a.id == id)
}

/// Rules of the day for the daily challenge mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyChallenge {
    /// Days since the Unix epoch
    pub day: u64,
    pub seed: u64,
    pub arena: &'static Arena,
    pub opponent: &'static Character,
}

impl DailyChallenge {
    /// Same day, same rules, on every machine
    pub fn for_day(day: u64) -> Self {
        let seed = day.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0x6F72_6269_7462_726C;
        let arena = &ARENAS[(seed % ARENAS.len() as u64) as usize];
        let opponent = &CHARACTERS[((seed >> 16) % CHARACTERS.len() as u64) as usize];
        Self {
            day,
            seed,
            arena,
            opponent,
        }
    }

    /// Rules for today according to the platform clock
    pub fn today() -> Self {
        Self::for_day(crate::platform::time::days_since_epoch())
    }
}
