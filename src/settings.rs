//! Game settings and preferences
//!
//! Persisted separately from the player profile, under their own key.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{KeyValueStore, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Camera shake on impacts
    pub screen_shake: bool,
    /// Multiplier on requested shake intensity (0.0 - 1.0)
    pub shake_intensity: f32,
    /// Impact particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            shake_intensity: 1.0,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "orbit_brawl_settings";

    /// Scale applied to every shake request; zero disables shake
    pub fn effective_shake_scale(&self) -> f32 {
        if self.screen_shake && !self.reduced_motion {
            self.shake_intensity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective effects volume (master * sfx)
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Impact particles to spawn for a hit of `intensity`
    pub fn hit_particles(&self, intensity: f32) -> usize {
        if !self.particles {
            return 0;
        }
        (intensity.max(0.0) * 12.0).round() as usize
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)
            .map_err(|_| StorageError::WriteFailed(Self::STORAGE_KEY.to_string()))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
