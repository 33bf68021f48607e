// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The UI system: item tree, components, and the per-frame tick.

use alloc::boxed::Box;
use core::any::Any;

use kurbo::Size;
use trellis_anim::{Animation, AnimationStatus, Timer};
use trellis_layout::{
    Area, Clip, ClipMap, ClipRegion, ComponentFlags, Constraints, Depth, Layout, LayoutBuilder,
    LayoutTree, Transform,
};
use trellis_responder::{
    Dispatcher, EventFlags, Handlers, InputEvent, KeyEvent, MotionEvent, MouseEvent, WheelEvent,
};
use trellis_store::{Entity, Table};

use crate::config::UiConfig;
use crate::frame::{FrameTracker, FrameWork};
use crate::item::Item;
use crate::painter::{PaintCallback, Painter};

/// Animation callback; receives the tick's status and the current ratio.
pub type AnimationCallback = Box<dyn FnMut(AnimationStatus, f64)>;

/// Timer callback; receives how often the timer fired and returns true to
/// request a redraw.
pub type TimerCallback = Box<dyn FnMut(u32) -> bool>;

struct Animated {
    animation: Animation,
    on_tick: AnimationCallback,
}

struct Timed {
    timer: Timer,
    on_fire: TimerCallback,
}

/// A retained-mode UI: one item tree, its components, and frame bookkeeping.
///
/// Every change that affects layout or paint marks the frame dirty. Each call
/// to [`Ui::tick`] then runs, in order:
///
/// 1. animations and timers, with the elapsed time;
/// 2. the batched input events, against the previous layout;
/// 3. if the tree is dirty, layout, a depth re-sort of the paint and handler
///    tables, and painting back to front.
///
/// `P` is the renderer-side [`Painter`] handed to paint callbacks.
pub struct Ui<P> {
    config: UiConfig,
    tree: LayoutTree,
    builder: LayoutBuilder,
    handlers: Handlers,
    dispatcher: Dispatcher,
    painters: Table<PaintCallback<P>>,
    animations: Table<Animated>,
    timers: Table<Timed>,
    states: Table<Box<dyn Any>>,
    frames: FrameTracker,
}

impl<P> core::fmt::Debug for Ui<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ui")
            .field("config", &self.config)
            .field("items", &self.tree.len())
            .field("root", &self.tree.root())
            .field("painters", &self.painters.len())
            .field("animations", &self.animations.len())
            .field("timers", &self.timers.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl<P: Painter> Ui<P> {
    /// Create an empty UI.
    ///
    /// # Panics
    ///
    /// Panics if `config.frames_in_flight` is not between 1 and 32.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            tree: LayoutTree::new(),
            builder: LayoutBuilder::new(),
            handlers: Handlers::new(),
            dispatcher: Dispatcher::new(),
            painters: Table::new(),
            animations: Table::new(),
            timers: Table::new(),
            states: Table::new(),
            frames: FrameTracker::new(config.frames_in_flight),
        }
    }

    /// Current configuration, including window size and DPI.
    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The item tree with its layout components.
    #[must_use]
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Clip regions of the last layout pass.
    #[must_use]
    pub fn clips(&self) -> &ClipMap {
        self.builder.clips()
    }

    /// Lock and hover state.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Invalidation state.
    #[must_use]
    pub fn frames(&self) -> &FrameTracker {
        &self.frames
    }

    // --- Tree ---

    /// Create the root item, which always spans the window.
    ///
    /// # Panics
    ///
    /// Panics if a root already exists.
    pub fn create_root(&mut self) -> Entity {
        assert!(self.tree.root().is_none(), "the Ui already has a root item");
        let root = self.tree.spawn(None);
        self.tree.set_root(root);
        self.invalidate();
        root
    }

    /// The root item.
    #[must_use]
    pub fn root(&self) -> Option<Entity> {
        self.tree.root()
    }

    /// Create an item as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn add_child(&mut self, parent: impl Item) -> Entity {
        let parent = self.live(parent);
        let child = self.tree.spawn(Some(parent));
        self.invalidate();
        child
    }

    /// Create an item at position `index` among `parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or `index` is past the end.
    pub fn insert_child(&mut self, parent: impl Item, index: usize) -> Entity {
        let parent = self.live(parent);
        let len = self.tree.children_of(parent).len();
        assert!(index <= len, "child index {index} out of range");
        let child = self.tree.spawn(None);
        self.tree.insert_child(parent, index, child);
        self.invalidate();
        child
    }

    /// Remove an item with its subtree and every component attached to them.
    ///
    /// Stale items are ignored.
    pub fn remove(&mut self, item: impl Item) {
        let removed = self.tree.destroy(item.entity());
        if removed.is_empty() {
            return;
        }
        log::debug!("removed {} items", removed.len());
        for entity in removed {
            self.painters.remove(entity);
            self.handlers.remove(entity);
            self.animations.remove(entity);
            self.timers.remove(entity);
            self.states.remove(entity);
            self.dispatcher.forget(entity);
        }
        self.invalidate();
    }

    /// Move the child at position `from` to position `to` among its siblings.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or either position is out of range.
    pub fn move_child(&mut self, parent: impl Item, from: usize, to: usize) {
        let parent = self.live(parent);
        self.tree.move_child(parent, from, to);
        self.invalidate();
    }

    /// Children of an item, in paint order.
    #[must_use]
    pub fn children(&self, item: impl Item) -> &[Entity] {
        self.tree.children_of(item.entity())
    }

    /// Parent of an item.
    #[must_use]
    pub fn parent(&self, item: impl Item) -> Option<Entity> {
        self.tree.parent_of(item.entity())
    }

    /// Resolved area as of the last layout.
    #[must_use]
    pub fn area(&self, item: impl Item) -> Option<Area> {
        self.tree.area(item.entity())
    }

    /// Resolved depth as of the last layout.
    #[must_use]
    pub fn depth(&self, item: impl Item) -> Option<Depth> {
        self.tree.depth(item.entity())
    }

    // --- Layout components ---

    /// Attach or replace size constraints.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_constraints(&mut self, item: impl Item, constraints: Constraints) {
        let entity = self.live(item);
        self.tree.set_constraints(entity, constraints);
        self.invalidate();
    }

    /// Attach or replace the layout policy for the item's children.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_layout(&mut self, item: impl Item, layout: Layout) {
        let entity = self.live(item);
        self.tree.set_layout(entity, layout);
        self.invalidate();
    }

    /// Attach or replace a post-layout transform.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_transform(&mut self, item: impl Item, transform: Transform) {
        let entity = self.live(item);
        self.tree.set_transform(entity, transform);
        self.invalidate();
    }

    /// Mutable access to a transform; invalidates the frame if there is one.
    pub fn transform_mut(&mut self, item: impl Item) -> Option<&mut Transform> {
        let transform = self.tree.transform_mut(item.entity());
        if transform.is_some() {
            self.frames.invalidate();
        }
        transform
    }

    /// Clip every descendant of the item.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_clip(&mut self, item: impl Item, clip: Clip) {
        let entity = self.live(item);
        self.tree.set_clip(entity, clip);
        self.invalidate();
    }

    /// Stop clipping the item's descendants.
    pub fn clear_clip(&mut self, item: impl Item) {
        let entity = item.entity();
        if self.tree.clip(entity).is_some() {
            self.tree.clear_clip(entity);
            self.invalidate();
        }
    }

    // --- Paint and input ---

    /// Attach or replace the item's paint callback.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_painter(&mut self, item: impl Item, paint: impl FnMut(&mut P, &Area) + 'static) {
        let entity = self.live(item);
        self.painters.insert(entity, Box::new(paint));
        self.tree.set_component_flag(entity, ComponentFlags::PAINTER, true);
        self.invalidate();
    }

    /// Attach or replace the item's mouse button handler.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_mouse_handler(
        &mut self,
        item: impl Item,
        handler: impl FnMut(&MouseEvent, &Area) -> EventFlags + 'static,
    ) {
        let entity = self.live(item);
        self.handlers.set_mouse(entity, handler);
        self.handler_added(entity, ComponentFlags::MOUSE);
    }

    /// Attach or replace the item's motion handler.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_motion_handler(
        &mut self,
        item: impl Item,
        handler: impl FnMut(&MotionEvent, &Area) -> EventFlags + 'static,
    ) {
        let entity = self.live(item);
        self.handlers.set_motion(entity, handler);
        self.handler_added(entity, ComponentFlags::MOTION);
    }

    /// Attach or replace the item's wheel handler.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_wheel_handler(
        &mut self,
        item: impl Item,
        handler: impl FnMut(&WheelEvent, &Area) -> EventFlags + 'static,
    ) {
        let entity = self.live(item);
        self.handlers.set_wheel(entity, handler);
        self.handler_added(entity, ComponentFlags::WHEEL);
    }

    /// Attach or replace the item's key handler.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_key_handler(
        &mut self,
        item: impl Item,
        handler: impl FnMut(&KeyEvent, &Area) -> EventFlags + 'static,
    ) {
        let entity = self.live(item);
        self.handlers.set_key(entity, handler);
        self.handler_added(entity, ComponentFlags::KEY);
    }

    // --- Time ---

    /// Attach an animation, called back on every tick it is active.
    ///
    /// The animation is not started.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_animation(
        &mut self,
        item: impl Item,
        animation: Animation,
        on_tick: impl FnMut(AnimationStatus, f64) + 'static,
    ) {
        let entity = self.live(item);
        self.animations.insert(
            entity,
            Animated {
                animation,
                on_tick: Box::new(on_tick),
            },
        );
        self.tree
            .set_component_flag(entity, ComponentFlags::ANIMATION, true);
    }

    /// The item's animation, for starting and stopping it.
    pub fn animation_mut(&mut self, item: impl Item) -> Option<&mut Animation> {
        self.animations
            .get_mut(item.entity())
            .map(|slot| &mut slot.animation)
    }

    /// Attach a timer, called back whenever it fires.
    ///
    /// The timer is not started.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_timer(
        &mut self,
        item: impl Item,
        timer: Timer,
        on_fire: impl FnMut(u32) -> bool + 'static,
    ) {
        let entity = self.live(item);
        self.timers.insert(
            entity,
            Timed {
                timer,
                on_fire: Box::new(on_fire),
            },
        );
        self.tree.set_component_flag(entity, ComponentFlags::TIMER, true);
    }

    /// The item's timer, for starting and stopping it.
    pub fn timer_mut(&mut self, item: impl Item) -> Option<&mut Timer> {
        self.timers.get_mut(item.entity()).map(|slot| &mut slot.timer)
    }

    // --- Typed state ---

    /// Attach widget state of any type, replacing previous state.
    ///
    /// # Panics
    ///
    /// Panics if `item` is stale.
    pub fn set_state<T: Any>(&mut self, item: impl Item, state: T) {
        let entity = self.live(item);
        self.states.insert(entity, Box::new(state));
        self.tree.set_component_flag(entity, ComponentFlags::STATE, true);
    }

    /// The item's state, if it has state of type `T`.
    #[must_use]
    pub fn state<T: Any>(&self, item: impl Item) -> Option<&T> {
        self.states
            .get(item.entity())
            .and_then(|s| s.downcast_ref::<T>())
    }

    /// Mutable access to the item's state, if it has state of type `T`.
    pub fn state_mut<T: Any>(&mut self, item: impl Item) -> Option<&mut T> {
        self.states
            .get_mut(item.entity())
            .and_then(|s| s.downcast_mut::<T>())
    }

    /// State of the child at position `index`, if it has state of type `T`.
    #[must_use]
    pub fn child_of_type<T: Any>(&self, parent: impl Item, index: usize) -> Option<&T> {
        let child = *self.tree.children_of(parent.entity()).get(index)?;
        self.state::<T>(child)
    }

    // --- Window and frames ---

    /// Resize the window; invalidates if the size changed.
    pub fn set_window_size(&mut self, size: Size) {
        if self.config.window_size != size {
            log::debug!("window resized to {}x{}", size.width, size.height);
            self.config.window_size = size;
            self.invalidate();
        }
    }

    /// Change the DPI; invalidates if it changed.
    pub fn set_dpi(&mut self, dpi: f64) {
        if self.config.dpi != dpi {
            self.config.dpi = dpi;
            self.invalidate();
        }
    }

    /// Force layout and paint on the next tick.
    pub fn invalidate(&mut self) {
        self.frames.invalidate();
    }

    /// Run one frame; returns what the renderer has to do with it.
    ///
    /// `elapsed` is the time since the previous tick in seconds. Events are
    /// dispatched in order against the areas of the previous layout. Paint
    /// callbacks only run when the returned work is [`FrameWork::Relayout`].
    pub fn tick(&mut self, elapsed: f64, events: &[InputEvent], painter: &mut P) -> FrameWork {
        self.advance_time(elapsed);

        for event in events {
            let outcome = self.dispatcher.dispatch(
                &mut self.handlers,
                &self.tree,
                self.builder.clips(),
                event,
            );
            if outcome.invalidate {
                self.invalidate();
            }
        }

        let work = self.frames.begin_frame();
        log::debug!("frame {}: {work:?}", self.frames.current_frame());
        if work == FrameWork::Relayout {
            self.layout();
            self.paint(painter);
        }
        self.frames.finish_frame();
        work
    }

    fn advance_time(&mut self, elapsed: f64) {
        let mut redraw = false;
        for (_, slot) in self.animations.iter_mut() {
            let status = slot.animation.tick(elapsed);
            if status != AnimationStatus::Idle {
                (slot.on_tick)(status, slot.animation.ratio());
                redraw = true;
            }
        }
        for (_, slot) in self.timers.iter_mut() {
            let fired = slot.timer.tick(elapsed);
            if fired > 0 && (slot.on_fire)(fired) {
                redraw = true;
            }
        }
        if redraw {
            self.invalidate();
        }
    }

    fn layout(&mut self) {
        self.builder.build(&mut self.tree, self.config.window_size);
        let depths = self.tree.depths();
        self.handlers.sort_by_depth(depths);
        self.painters
            .sort_by_key(|e, _| depths.get(e).map_or(0, |d| d.depth));
    }

    fn paint(&mut self, painter: &mut P) {
        let clips = self.builder.clips();
        // `None` until the first clip has been sent to the painter.
        let mut active: Option<Option<ClipRegion>> = None;
        for i in 0..self.painters.len() {
            let Some(entity) = self.painters.entity_at(i) else {
                break;
            };
            let (Some(area), Some(depth)) = (self.tree.area(entity), self.tree.depth(entity))
            else {
                continue;
            };
            let clip = clips.clip_at(depth.depth).copied();
            if active != Some(clip) {
                painter.set_clip(clip.as_ref());
                active = Some(clip);
            }
            if let Some(paint) = self.painters.get_by_index_mut(i) {
                paint(painter, &area);
            }
        }
        if matches!(active, Some(Some(_))) {
            painter.set_clip(None);
        }
    }

    /// Events may arrive before the next layout, so the tables are re-sorted
    /// against the depths of the last one right away.
    fn handler_added(&mut self, entity: Entity, flag: ComponentFlags) {
        self.tree.set_component_flag(entity, flag, true);
        self.handlers.sort_by_depth(self.tree.depths());
        self.invalidate();
    }

    fn live(&self, item: impl Item) -> Entity {
        let entity = item.entity();
        assert!(self.tree.is_alive(entity), "stale item handle {entity:?}");
        entity
    }
}
