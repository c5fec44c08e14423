//! Camera shake
//!
//! The simulation only emits `ShakeRequest`s. This tracker owns the decay:
//! the strongest active request wins and fades linearly over its duration.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::{ShakeRequest, SimEvent};

#[derive(Debug, Clone)]
pub struct ShakeTracker {
    intensity: f32,
    duration: f32,
    remaining: f32,
    rng: Pcg32,
}

impl Default for ShakeTracker {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ShakeTracker {
    pub fn new(seed: u64) -> Self {
        Self {
            intensity: 0.0,
            duration: 0.0,
            remaining: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a shake unless a stronger one is already running
    pub fn request(&mut self, request: ShakeRequest, settings: &Settings) {
        let intensity = request.intensity * settings.effective_shake_scale();
        if intensity <= 0.0 || request.duration <= 0.0 {
            return;
        }
        if intensity >= self.current_intensity() {
            self.intensity = intensity;
            self.duration = request.duration;
            self.remaining = request.duration;
        }
    }

    /// Pick the shake requests out of a tick's events
    pub fn consume(&mut self, events: &[SimEvent], settings: &Settings) {
        for event in events {
            if let SimEvent::Shake(request) = event {
                self.request(*request, settings);
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining == 0.0 {
            self.intensity = 0.0;
        }
    }

    pub fn current_intensity(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        self.intensity * (self.remaining / self.duration)
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Random camera offset for this frame
    pub fn offset(&mut self) -> Vec3 {
        let amount = self.current_intensity();
        if amount <= 0.0 {
            return Vec3::ZERO;
        }
        Vec3::new(
            self.rng.random_range(-1.0..1.0),
            self.rng.random_range(-1.0..1.0),
            0.0,
        ) * amount
    }
}
