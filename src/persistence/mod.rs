//! Player profile persistence
//!
//! The profile is a flat JSON record under a fixed storage key. Loading
//! never fails: a missing save yields the starter profile, a corrupt one is
//! logged and replaced by it, and fields absent from an older save are
//! filled from the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::storage::{KeyValueStore, StorageError};
use crate::roster::{self, Currency, STARTER_ARENAS, STARTER_CHARACTERS};
use crate::sim::state::MatchResult;

/// Storage key for the profile blob
pub const STORAGE_KEY: &str = "gravityGladiatorSave";

pub const STARTING_STARDUST: u32 = 100;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("profile JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub matches_played: u32,
    pub matches_won: u32,
    pub total_knockouts: u32,
    pub highest_wave: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerData {
    pub stardust: u32,
    pub gems: u32,
    pub unlocked_characters: Vec<String>,
    pub unlocked_arenas: Vec<u32>,
    pub statistics: Statistics,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            stardust: STARTING_STARDUST,
            gems: 0,
            unlocked_characters: STARTER_CHARACTERS.iter().map(|s| s.to_string()).collect(),
            unlocked_arenas: STARTER_ARENAS.to_vec(),
            statistics: Statistics::default(),
        }
    }
}

impl PlayerData {
    pub fn add_stardust(&mut self, amount: u32) {
        self.stardust = self.stardust.saturating_add(amount);
    }

    pub fn add_gems(&mut self, amount: u32) {
        self.gems = self.gems.saturating_add(amount);
    }

    /// Deduct `amount` if affordable; returns false and changes nothing otherwise
    pub fn spend_stardust(&mut self, amount: u32) -> bool {
        if self.stardust < amount {
            return false;
        }
        self.stardust -= amount;
        true
    }

    pub fn spend_gems(&mut self, amount: u32) -> bool {
        if self.gems < amount {
            return false;
        }
        self.gems -= amount;
        true
    }

    pub fn has_character(&self, id: &str) -> bool {
        self.unlocked_characters.iter().any(|c| c == id)
    }

    pub fn has_arena(&self, id: u32) -> bool {
        self.unlocked_arenas.contains(&id)
    }

    /// Buy a character with its listed currency. Unknown ids, characters
    /// already owned and insufficient funds all return false untouched.
    pub fn purchase_character(&mut self, id: &str) -> bool {
        let Some(character) = roster::character(id) else {
            return false;
        };
        if self.has_character(id) {
            return false;
        }
        let cost = character.unlock_cost;
        let paid = match cost.currency {
            Currency::Stardust => self.spend_stardust(cost.amount),
            Currency::Gems => self.spend_gems(cost.amount),
        };
        if paid {
            self.unlocked_characters.push(id.to_string());
            log::info!("Unlocked character {}", character.name);
        }
        paid
    }

    /// Buy an arena with stardust, same failure rules as characters
    pub fn purchase_arena(&mut self, id: u32) -> bool {
        let Some(arena) = roster::arena(id) else {
            return false;
        };
        if self.has_arena(id) || !self.spend_stardust(arena.unlock_cost) {
            return false;
        }
        self.unlocked_arenas.push(id);
        log::info!("Unlocked arena {}", arena.name);
        true
    }

    /// Fold a finished match into the profile
    pub fn record_match(&mut self, result: &MatchResult) {
        self.add_stardust(result.reward);
        let stats = &mut self.statistics;
        stats.matches_played += 1;
        if result.victory {
            stats.matches_won += 1;
            stats.total_knockouts += 1;
        }
        stats.highest_wave = stats.highest_wave.max(result.wave_reached);
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        store.set(STORAGE_KEY, &self.to_json()?)?;
        log::info!("Profile saved");
        Ok(())
    }

    /// Load the profile, falling back to defaults on any problem
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get(STORAGE_KEY) else {
            log::info!("No saved profile, starting fresh");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(data) => {
                log::info!("Loaded profile ({} stardust)", data.stardust);
                data
            }
            Err(e) => {
                log::warn!("Discarding unreadable profile: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_defaults() {
        let p = PlayerData::default();
        assert_eq!(p.stardust, 100);
        assert_eq!(p.gems, 0);
        assert!(p.has_character("swift") && p.has_character("brute") && p.has_character("balanced"));
        assert_eq!(p.unlocked_arenas, vec![1, 2]);
        assert_eq!(p.statistics, Statistics::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = MemoryStore::new();
        let mut p = PlayerData::default();
        p.add_stardust(900);
        p.add_gems(120);
        assert!(p.purchase_character("ninja"));
        assert!(p.purchase_character("titan"));
        assert!(p.purchase_arena(3));
        p.statistics.highest_wave = 7;
        p.save(&mut store).unwrap();

        assert_eq!(PlayerData::load(&store), p);
    }

    #[test]
    fn test_missing_and_corrupt_saves_fall_back() {
        let mut store = MemoryStore::new();
        assert_eq!(PlayerData::load(&store), PlayerData::default());

        store.set(STORAGE_KEY, "{ definitely not json").unwrap();
        assert_eq!(PlayerData::load(&store), PlayerData::default());
    }

    #[test]
    fn test_partial_save_merges_over_defaults() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"stardust": 42, "statistics": {"matchesWon": 3}}"#).unwrap();
        let p = PlayerData::load(&store);
        assert_eq!(p.stardust, 42);
        assert_eq!(p.statistics.matches_won, 3);
        assert_eq!(p.unlocked_arenas, vec![1, 2]);
        assert!(p.has_character("balanced"));
    }

    #[test]
    fn test_insufficient_funds_change_nothing() {
        let mut p = PlayerData::default();
        let before = p.clone();
        assert!(!p.spend_stardust(101));
        assert!(!p.purchase_character("crusher"));
        assert!(!p.purchase_character("titan"));
        assert!(!p.purchase_arena(4));
        assert!(!p.purchase_character("swift"));
        assert!(!p.purchase_character("unknown"));
        assert_eq!(p, before);
    }

    #[test]
    fn test_record_match() {
        let mut p = PlayerData::default();
        p.record_match(&MatchResult {
            victory: false,
            reward: 10,
            wave_reached: 4,
        });
        p.record_match(&MatchResult {
            victory: true,
            reward: 35,
            wave_reached: 2,
        });
        assert_eq!(p.stardust, 145);
        assert_eq!(p.statistics.matches_played, 2);
        assert_eq!(p.statistics.matches_won, 1);
        assert_eq!(p.statistics.total_knockouts, 1);
        assert_eq!(p.statistics.highest_wave, 4);
    }
}
