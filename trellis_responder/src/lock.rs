// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-category pointer lock.

use trellis_store::Entity;

use crate::event::EventCategory;

/// Routing state of one event category.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LockState {
    /// Events are hit-tested against every handler.
    #[default]
    Unlocked,
    /// Events go to this item only.
    LockedTo(Entity),
}

/// Lock state of every [`EventCategory`]; categories are independent.
#[derive(Clone, Debug, Default)]
pub struct Locks {
    states: [LockState; 4],
}

impl Locks {
    /// All categories unlocked.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `category`.
    #[must_use]
    pub fn get(&self, category: EventCategory) -> LockState {
        self.states[category.slot()]
    }

    /// Route `category` to `entity` only.
    pub fn lock(&mut self, category: EventCategory, entity: Entity) {
        log::trace!("{} events locked to {entity:?}", category.name());
        self.states[category.slot()] = LockState::LockedTo(entity);
    }

    /// Return `category` to hit-tested routing.
    pub fn unlock(&mut self, category: EventCategory) {
        if self.states[category.slot()] != LockState::Unlocked {
            log::trace!("{} events unlocked", category.name());
        }
        self.states[category.slot()] = LockState::Unlocked;
    }

    /// Release every lock held by `entity`.
    pub fn release(&mut self, entity: Entity) {
        for category in EventCategory::ALL {
            if self.get(category) == LockState::LockedTo(entity) {
                self.unlock(category);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_store::Entities;

    #[test]
    fn categories_lock_independently() {
        let mut entities = Entities::new();
        let a = entities.alloc();
        let b = entities.alloc();
        let mut locks = Locks::new();
        locks.lock(EventCategory::Mouse, a);
        locks.lock(EventCategory::Motion, b);
        assert_eq!(locks.get(EventCategory::Mouse), LockState::LockedTo(a));
        assert_eq!(locks.get(EventCategory::Motion), LockState::LockedTo(b));
        assert_eq!(locks.get(EventCategory::Key), LockState::Unlocked);

        locks.release(a);
        assert_eq!(locks.get(EventCategory::Mouse), LockState::Unlocked);
        assert_eq!(locks.get(EventCategory::Motion), LockState::LockedTo(b));
    }
}
