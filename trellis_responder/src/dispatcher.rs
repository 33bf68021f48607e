// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route input events to item handlers.
//!
//! ## Semantics
//!
//! Each [`EventCategory`] has a handler table sorted by descending depth (see
//! [`Handlers::sort_by_depth`]), so the topmost item is tried first.
//!
//! - Unlocked: handlers whose item is hit at the event position (area and
//!   active clip) run in table order until one returns flags without
//!   [`EventFlags::PROPAGATE`]. Key events have no position and skip the hit
//!   test.
//! - A handler returning [`EventFlags::LOCK`] locks its category to its item.
//! - Locked: only the locked item's handler runs, wherever the pointer is. If
//!   it does not return [`EventFlags::LOCK`] again the category is unlocked,
//!   and the event ends there.
//!
//! Motion events additionally deliver [`MotionType::Enter`] and
//! [`MotionType::Leave`] copies to items whose hit state changed since the
//! previous motion event. Only [`EventFlags::INVALIDATE`] is honored on those.

use alloc::boxed::Box;

use kurbo::Point;
use smallvec::SmallVec;
use trellis_layout::{Area, ClipMap, Depth, LayoutTree};
use trellis_store::{Entity, Table};

use crate::event::{
    EventCategory, InputEvent, KeyEvent, MotionEvent, MotionType, MouseEvent, WheelEvent,
};
use crate::flags::EventFlags;
use crate::lock::{LockState, Locks};

/// A handler for events of type `E`; receives the item's resolved area.
pub type Handler<E> = Box<dyn FnMut(&E, &Area) -> EventFlags>;

/// The four handler tables.
#[derive(Debug, Default)]
pub struct Handlers {
    /// Mouse button handlers.
    pub mouse: Table<Handler<MouseEvent>>,
    /// Pointer motion handlers.
    pub motion: Table<Handler<MotionEvent>>,
    /// Wheel handlers.
    pub wheel: Table<Handler<WheelEvent>>,
    /// Key handlers.
    pub key: Table<Handler<KeyEvent>>,
}

impl Handlers {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a mouse handler to `entity`, replacing any previous one.
    pub fn set_mouse(
        &mut self,
        entity: Entity,
        handler: impl FnMut(&MouseEvent, &Area) -> EventFlags + 'static,
    ) {
        self.mouse.insert(entity, Box::new(handler));
    }

    /// Attach a motion handler to `entity`, replacing any previous one.
    pub fn set_motion(
        &mut self,
        entity: Entity,
        handler: impl FnMut(&MotionEvent, &Area) -> EventFlags + 'static,
    ) {
        self.motion.insert(entity, Box::new(handler));
    }

    /// Attach a wheel handler to `entity`, replacing any previous one.
    pub fn set_wheel(
        &mut self,
        entity: Entity,
        handler: impl FnMut(&WheelEvent, &Area) -> EventFlags + 'static,
    ) {
        self.wheel.insert(entity, Box::new(handler));
    }

    /// Attach a key handler to `entity`, replacing any previous one.
    pub fn set_key(
        &mut self,
        entity: Entity,
        handler: impl FnMut(&KeyEvent, &Area) -> EventFlags + 'static,
    ) {
        self.key.insert(entity, Box::new(handler));
    }

    /// Detach every handler of `entity`.
    pub fn remove(&mut self, entity: Entity) {
        self.mouse.remove(entity);
        self.motion.remove(entity);
        self.wheel.remove(entity);
        self.key.remove(entity);
    }

    /// Returns true if `entity` has a handler for `category`.
    #[must_use]
    pub fn contains(&self, category: EventCategory, entity: Entity) -> bool {
        match category {
            EventCategory::Mouse => self.mouse.contains(entity),
            EventCategory::Motion => self.motion.contains(entity),
            EventCategory::Wheel => self.wheel.contains(entity),
            EventCategory::Key => self.key.contains(entity),
        }
    }

    /// Stable re-sort of every table, topmost (deepest) item first.
    pub fn sort_by_depth(&mut self, depths: &Table<Depth>) {
        let key = |e: Entity| core::cmp::Reverse(depths.get(e).map_or(0, |d| d.depth));
        self.mouse.sort_by_key(|e, _| key(e));
        self.motion.sort_by_key(|e, _| key(e));
        self.wheel.sort_by_key(|e, _| key(e));
        self.key.sort_by_key(|e, _| key(e));
    }
}

/// Result of dispatching one input event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Some handler asked for a redraw.
    pub invalidate: bool,
    /// Item whose handler ended the event, `None` if it ran out of handlers.
    pub stopped_at: Option<Entity>,
}

/// Routes events and owns the lock and hover state between them.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    locks: Locks,
    hovered: SmallVec<[Entity; 8]>,
}

impl Dispatcher {
    /// A dispatcher with every category unlocked and nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock state of every category.
    #[must_use]
    pub fn locks(&self) -> &Locks {
        &self.locks
    }

    /// Lock state of one category.
    #[must_use]
    pub fn lock_state(&self, category: EventCategory) -> LockState {
        self.locks.get(category)
    }

    /// Items with a motion handler currently under the pointer.
    #[must_use]
    pub fn hovered(&self) -> &[Entity] {
        &self.hovered
    }

    /// Drop every reference to a removed item.
    pub fn forget(&mut self, entity: Entity) {
        self.locks.release(entity);
        self.hovered.retain(|e| *e != entity);
    }

    /// Route one event.
    ///
    /// `tree` and `clips` must come from the same layout pass that `handlers`
    /// were last sorted against.
    pub fn dispatch(
        &mut self,
        handlers: &mut Handlers,
        tree: &LayoutTree,
        clips: &ClipMap,
        event: &InputEvent,
    ) -> DispatchOutcome {
        let category = event.category();
        let pos = event.pos();
        match event {
            InputEvent::Mouse(e) => route(
                &mut self.locks,
                category,
                &mut handlers.mouse,
                tree,
                clips,
                e,
                pos,
            ),
            InputEvent::Motion(e) => {
                let mut outcome = DispatchOutcome::default();
                if self.locks.get(category) == LockState::Unlocked {
                    self.update_hover(&mut handlers.motion, tree, clips, e, &mut outcome);
                }
                let routed = route(
                    &mut self.locks,
                    category,
                    &mut handlers.motion,
                    tree,
                    clips,
                    e,
                    pos,
                );
                DispatchOutcome {
                    invalidate: outcome.invalidate || routed.invalidate,
                    stopped_at: routed.stopped_at,
                }
            }
            InputEvent::Wheel(e) => route(
                &mut self.locks,
                category,
                &mut handlers.wheel,
                tree,
                clips,
                e,
                pos,
            ),
            InputEvent::Key(e) => route(
                &mut self.locks,
                category,
                &mut handlers.key,
                tree,
                clips,
                e,
                pos,
            ),
        }
    }

    fn update_hover(
        &mut self,
        table: &mut Table<Handler<MotionEvent>>,
        tree: &LayoutTree,
        clips: &ClipMap,
        event: &MotionEvent,
        outcome: &mut DispatchOutcome,
    ) {
        let now: SmallVec<[Entity; 8]> = table
            .entities()
            .iter()
            .copied()
            .filter(|e| tree.hit(*e, event.pos, clips))
            .collect();

        let leave = MotionEvent {
            kind: MotionType::Leave,
            ..*event
        };
        for &gone in self.hovered.iter().filter(|e| !now.contains(e)) {
            outcome.invalidate |= notify(table, tree, gone, &leave).invalidates();
        }
        let enter = MotionEvent {
            kind: MotionType::Enter,
            ..*event
        };
        for &new in now.iter().filter(|e| !self.hovered.contains(e)) {
            outcome.invalidate |= notify(table, tree, new, &enter).invalidates();
        }
        self.hovered = now;
    }
}

/// Run `entity`'s handler if it still has one.
fn notify<E>(
    table: &mut Table<Handler<E>>,
    tree: &LayoutTree,
    entity: Entity,
    event: &E,
) -> EventFlags {
    let area = tree.area(entity).unwrap_or_default();
    match table.get_mut(entity) {
        Some(handler) => handler(event, &area),
        None => EventFlags::PROPAGATE,
    }
}

fn route<E>(
    locks: &mut Locks,
    category: EventCategory,
    table: &mut Table<Handler<E>>,
    tree: &LayoutTree,
    clips: &ClipMap,
    event: &E,
    pos: Option<Point>,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();

    if let LockState::LockedTo(target) = locks.get(category) {
        if table.contains(target) {
            let flags = notify(table, tree, target, event);
            outcome.invalidate = flags.invalidates();
            outcome.stopped_at = Some(target);
            if !flags.locks() {
                locks.unlock(category);
            }
            return outcome;
        }
        log::warn!(
            "{} lock target {target:?} has no handler; unlocking",
            category.name()
        );
        locks.unlock(category);
    }

    for i in 0..table.len() {
        let Some(entity) = table.entity_at(i) else {
            break;
        };
        if let Some(p) = pos
            && !tree.hit(entity, p, clips)
        {
            continue;
        }
        let area = tree.area(entity).unwrap_or_default();
        let Some(handler) = table.get_by_index_mut(i) else {
            break;
        };
        let flags = handler(event, &area);
        log::trace!("{} event handled by {entity:?}: {flags:?}", category.name());
        outcome.invalidate |= flags.invalidates();
        if flags.locks() {
            locks.lock(category, entity);
        }
        if !flags.propagates() {
            outcome.stopped_at = Some(entity);
            break;
        }
    }
    outcome
}
