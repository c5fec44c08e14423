//! Frame timing
//!
//! Frames arrive with whatever delta the host gives us; the simulation is
//! advanced in fixed `SIM_DT` steps with the remainder carried over.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame delta and return how many fixed steps to run.
    /// Long stalls are clamped so a hidden tab doesn't fast-forward the match.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

/// Whole days since the Unix epoch on the platform clock
#[cfg(not(target_arch = "wasm32"))]
pub fn days_since_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() / 86_400)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn days_since_epoch() -> u64 {
    (js_sys::Date::now() / 86_400_000.0).max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStep::new(0.01, 8);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FixedStep::new(0.0625, 8);
        // 5 s is clamped to 0.1 s: one step plus a remainder
        assert_eq!(clock.advance(5.0), 1);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_substeps_are_bounded() {
        let mut clock = FixedStep::new(0.001, 4);
        assert_eq!(clock.advance(0.1), 4);
        assert!(clock.alpha() <= 1.0);
    }
}
