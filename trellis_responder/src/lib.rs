// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Responder: depth-ordered input dispatch with pointer lock.
//!
//! ## Overview
//!
//! Items register handlers per event category: mouse buttons, pointer motion,
//! wheel, and keys. After a layout pass the handler tables are sorted by
//! descending [`Depth`](trellis_layout::Depth), and the [`Dispatcher`] offers
//! each event to the items under the pointer, topmost first, until a handler
//! stops it. Handlers answer with [`EventFlags`]:
//!
//! - [`EventFlags::PROPAGATE`]: keep offering the event to items below.
//! - [`EventFlags::INVALIDATE`]: the frame must be redrawn.
//! - [`EventFlags::LOCK`]: capture the category. Until the locked item answers
//!   without `LOCK`, every event of that category goes to it alone, wherever
//!   the pointer is.
//!
//! Hit-testing respects the clip regions recorded by the layout pass, so an
//! item scrolled out of its clipping ancestor does not receive events.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_layout::{LayoutBuilder, LayoutTree};
//! use trellis_responder::{
//!     Dispatcher, EventCategory, EventFlags, Handlers, LockState, MouseButton, MouseEvent,
//! };
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.spawn(None);
//! tree.set_root(root);
//! let button = tree.spawn(Some(root));
//! let mut builder = LayoutBuilder::new();
//! builder.build(&mut tree, Size::new(100.0, 100.0));
//!
//! let mut handlers = Handlers::new();
//! handlers.set_mouse(button, |_, _| EventFlags::INVALIDATE_AND_LOCK);
//! handlers.sort_by_depth(tree.depths());
//!
//! let mut dispatcher = Dispatcher::new();
//! let press = MouseEvent::press(Point::new(50.0, 50.0), MouseButton::Left);
//! let outcome = dispatcher.dispatch(&mut handlers, &tree, builder.clips(), &press.into());
//! assert!(outcome.invalidate);
//! assert_eq!(
//!     dispatcher.lock_state(EventCategory::Mouse),
//!     LockState::LockedTo(button)
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod event;
mod flags;
mod lock;

pub use dispatcher::{DispatchOutcome, Dispatcher, Handler, Handlers};
pub use event::{
    ButtonState, EventCategory, InputEvent, KeyCode, KeyEvent, Modifiers, MotionEvent,
    MotionType, MouseButton, MouseButtons, MouseEvent, WheelEvent,
};
pub use flags::EventFlags;
pub use lock::{LockState, Locks};
