// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis: a retained-mode UI core.
//!
//! A [`Ui`] owns a tree of items. Items are bare [`Entity`] handles; what an
//! item is and does comes from the components attached to it: constraints,
//! layout, transform, clip, paint callback, input handlers, animations,
//! timers, and typed state. Widgets are ordinary structs that implement
//! [`Item`] and set up components on construction.
//!
//! The host drives the UI with [`Ui::tick`] once per frame. Any change that
//! can affect layout or paint invalidates the frame; clean frames skip layout
//! and painting entirely, and the returned [`FrameWork`] tells the renderer
//! whether its buffers for this frame are still current.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis::{
//!     Area, ClipRegion, Constraints, Dim, EventFlags, FlowType, FrameWork, InputEvent, Layout,
//!     MouseButton, MouseEvent, Painter, Ui, UiConfig,
//! };
//!
//! #[derive(Default)]
//! struct Recorder(Vec<Area>);
//!
//! impl Painter for Recorder {
//!     fn set_clip(&mut self, _: Option<&ClipRegion>) {}
//! }
//!
//! let mut ui = Ui::new(UiConfig {
//!     window_size: Size::new(320.0, 240.0),
//!     ..UiConfig::default()
//! });
//! let root = ui.create_root();
//! ui.set_layout(root, Layout::flow(FlowType::Column));
//!
//! let button = ui.add_child(root);
//! ui.set_constraints(button, Constraints::new(Dim::fill(), Dim::fixed(40.0)));
//! ui.set_painter(button, |r: &mut Recorder, area| r.0.push(*area));
//! ui.set_mouse_handler(button, |_, _| EventFlags::INVALIDATE);
//!
//! let mut recorder = Recorder::default();
//! assert_eq!(ui.tick(0.016, &[], &mut recorder), FrameWork::Relayout);
//! assert_eq!(recorder.0[0].size, Size::new(320.0, 40.0));
//!
//! let click: InputEvent = MouseEvent::press(Point::new(10.0, 10.0), MouseButton::Left).into();
//! ui.tick(0.016, &[], &mut recorder);
//! assert_eq!(ui.tick(0.016, &[click], &mut recorder), FrameWork::Relayout);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod frame;
mod item;
mod painter;
mod ui;

pub use config::{BASE_DPI, UiConfig};
pub use frame::{FrameTracker, FrameWork};
pub use item::Item;
pub use painter::{PaintCallback, Painter};
pub use ui::{AnimationCallback, TimerCallback, Ui};

pub use trellis_anim::{Animation, AnimationMode, AnimationStatus, Timer};
pub use trellis_layout::{
    Anchor, Area, Axis, Clip, ClipMap, ClipRegion, Constraints, Depth, Dim, FlowType, Layout,
    Padding, Radius, SpacingType, Transform, TransformParams,
};
pub use trellis_responder::{
    ButtonState, Dispatcher, EventCategory, EventFlags, InputEvent, KeyCode, KeyEvent, LockState,
    Modifiers, MotionEvent, MotionType, MouseButton, MouseButtons, MouseEvent, WheelEvent,
};
pub use trellis_store::Entity;
