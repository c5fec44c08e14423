//! Rigid body registry
//!
//! Bodies live in a generational slot map. A `BodyHandle` either resolves to
//! the body it was issued for or to nothing: once a body is removed its slot
//! generation is bumped, so stale handles never alias a body that later
//! reuses the same slot.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A sphere in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Accumulated for the current tick only; cleared by the integrator
    pub acceleration: Vec3,
    /// Positive, or `f32::INFINITY` for immovable bodies
    pub mass: f32,
    pub radius: f32,
    pub is_static: bool,
}

impl PhysicsBody {
    /// A movable body at rest
    pub fn dynamic(position: Vec3, mass: f32, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass,
            radius,
            is_static: false,
        }
    }

    /// An immovable collision partner (infinite mass)
    pub fn fixed(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass: f32::INFINITY,
            radius,
            is_static: true,
        }
    }

    /// True if this body never moves (static flag or infinite mass)
    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.is_static || !self.mass.is_finite()
    }
}

/// Stable reference to a body in a `BodyRegistry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Slot index (stable for the body's lifetime, may be reused afterwards)
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) body: Option<PhysicsBody>,
}

/// Index-addressed body storage with generation tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyRegistry {
    pub(crate) slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body, reusing the most recently freed slot if any
    pub fn add(&mut self, body: PhysicsBody) -> BodyHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyHandle {
            index,
            generation: 0,
        }
    }

    /// Remove a body. Stale or unknown handles are a no-op returning `None`.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<PhysicsBody> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(body)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Accumulate `force / mass` into the body's acceleration for this tick
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) {
        let Some(body) = self.get_mut(handle) else {
            return;
        };
        if body.is_immovable() || body.mass <= 0.0 {
            return;
        }
        body.acceleration += force / body.mass;
    }

    /// Normalize `direction`, scale by `magnitude`, apply as a force.
    /// A zero direction applies nothing.
    pub fn apply_thrust(&mut self, handle: BodyHandle, direction: Vec3, magnitude: f32) {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.apply_force(handle, dir * magnitude);
    }

    /// Live bodies in slot order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.body.as_ref().map(|body| {
                (
                    BodyHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    body,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every body; outstanding handles become stale
    pub fn clear(&mut self) {
        let handles: Vec<BodyHandle> = self.iter().map(|(h, _)| h).collect();
        for handle in handles {
            self.remove(handle);
        }
    }
}
