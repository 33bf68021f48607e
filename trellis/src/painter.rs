// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary to the renderer.

use alloc::boxed::Box;

use trellis_layout::{Area, ClipRegion};

/// Receives draw commands from item paint callbacks.
///
/// The [`Ui`](crate::Ui) calls paint callbacks back to front and switches the
/// active clip between them; the painter applies it, typically as a scissor
/// rectangle.
pub trait Painter {
    /// Clip subsequent drawing to `clip`, or stop clipping for `None`.
    fn set_clip(&mut self, clip: Option<&ClipRegion>);
}

/// Paint callback of an item; receives the item's resolved area.
pub type PaintCallback<P> = Box<dyn FnMut(&mut P, &Area)>;
