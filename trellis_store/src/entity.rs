// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational entity handles and their allocator.

use alloc::vec::Vec;

/// Identifier for one item's row across all component tables (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Slot index of this entity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// Allocator for [`Entity`] handles.
///
/// Freed slots are reused with a bumped generation, so stale handles never
/// alias a newer entity.
#[derive(Clone, Debug, Default)]
pub struct Entities {
    /// Current generation per slot (persists across frees).
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
}

impl Entities {
    /// Create an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity.
    pub fn alloc(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            let generation = self.generations[slot].saturating_add(1);
            self.generations[slot] = generation;
            self.alive[slot] = true;
            Entity { index, generation }
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Entity indices are 32-bit."
            )]
            let index = self.generations.len() as u32;
            self.generations.push(1);
            self.alive.push(true);
            Entity {
                index,
                generation: 1,
            }
        }
    }

    /// Release an entity; returns `false` if it was already stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[entity.index as usize] = false;
        self.free_list.push(entity.index);
        true
    }

    /// Returns true if `entity` refers to a live slot of the same generation.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index as usize;
        self.alive.get(slot).copied().unwrap_or(false) && self.generations[slot] == entity.generation
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len() - self.free_list.len()
    }

    /// Returns true if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
