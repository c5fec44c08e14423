//! Arena hazards
//!
//! Hazards are kinematic: their positions are a function of elapsed match
//! time only. A fighter whose centre comes within `CONTACT_RADIUS` of an
//! active hazard point is eliminated.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance from a hazard point that counts as contact
pub const CONTACT_RADIUS: f32 = 2.0;

const LASER_COUNT: usize = 3;
const PISTON_MOUNT: f32 = 14.0;
const PISTON_REACH: f32 = 6.0;
const PISTON_THRESHOLD: f32 = 0.3;
const SPIKE_ORBIT: f32 = 8.0;
const SPIKE_SPIN: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Laser emitters sweeping across the arena
    Lasers,
    /// Wall pistons that periodically slam toward the centre
    Pistons,
    /// Two spike balls orbiting the centre
    Spikes,
}

/// A wall-mounted piston
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piston {
    pub mount: Vec3,
    pub extended: bool,
}

impl Piston {
    /// The crushing head: retracted pistons are harmless
    pub fn head(&self) -> Option<Vec3> {
        self.extended
            .then(|| self.mount + crate::direction_to(self.mount, Vec3::ZERO) * PISTON_REACH)
    }
}

/// Time-driven hazard state for one arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardField {
    kinds: Vec<HazardKind>,
    time: f32,
    lasers: Vec<Vec3>,
    pistons: Vec<Piston>,
    spike_rotation: f32,
}

impl HazardField {
    pub fn new(kinds: &[HazardKind]) -> Self {
        let mut field = Self {
            kinds: kinds.to_vec(),
            time: 0.0,
            lasers: Vec::new(),
            pistons: Vec::new(),
            spike_rotation: 0.0,
        };

        if field.has(HazardKind::Lasers) {
            field.lasers = vec![Vec3::ZERO; LASER_COUNT];
        }
        if field.has(HazardKind::Pistons) {
            field.pistons = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y]
                .into_iter()
                .map(|axis| Piston {
                    mount: axis * PISTON_MOUNT,
                    extended: false,
                })
                .collect();
        }
        field.advance(0.0);
        field
    }

    pub fn has(&self, kind: HazardKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Move every hazard forward by `dt`
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
        let t = self.time;

        for (i, laser) in self.lasers.iter_mut().enumerate() {
            let i = i as f32;
            laser.x = (t + i * 2.0).sin() * 8.0;
            laser.y = (t * 0.7 + i * 1.5).cos() * 6.0;
        }

        for (i, piston) in self.pistons.iter_mut().enumerate() {
            let phase = t * 2.0 + i as f32 * FRAC_PI_2;
            piston.extended = phase.sin() > PISTON_THRESHOLD;
        }

        if self.has(HazardKind::Spikes) {
            self.spike_rotation += dt * SPIKE_SPIN;
        }
    }

    /// Every point that currently hurts, tagged with its hazard kind
    pub fn contact_points(&self) -> Vec<(HazardKind, Vec3)> {
        let mut points: Vec<(HazardKind, Vec3)> = self
            .lasers
            .iter()
            .map(|p| (HazardKind::Lasers, *p))
            .collect();
        points.extend(
            self.pistons
                .iter()
                .filter_map(Piston::head)
                .map(|p| (HazardKind::Pistons, p)),
        );
        if self.has(HazardKind::Spikes) {
            for offset in [0.0, PI] {
                let angle = self.spike_rotation + offset;
                let pos = Vec3::new(angle.cos(), angle.sin(), 0.0) * SPIKE_ORBIT;
                points.push((HazardKind::Spikes, pos));
            }
        }
        points
    }

    /// The hazard `position` is touching, if any
    pub fn touching(&self, position: Vec3) -> Option<HazardKind> {
        self.contact_points()
            .into_iter()
            .find(|(_, p)| p.distance(position) < CONTACT_RADIUS)
            .map(|(kind, _)| kind)
    }

    pub fn pistons(&self) -> &[Piston] {
        &self.pistons
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}
