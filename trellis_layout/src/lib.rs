// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: two-pass constraint layout over an item tree.
//!
//! Items live in a [`LayoutTree`]. Each carries a [`TreeNode`] (parent, ordered
//! children), a resolved [`Area`] and [`Depth`], and optionally:
//!
//! - [`Constraints`]: minimum and maximum size per axis. A maximum may be a
//!   pixel bound or one of the sentinels [`FILL`] (grow to the parent),
//!   [`HUG`] (size to content), or [`MIRROR`] (copy the other axis).
//! - [`Layout`]: how a container arranges its children ([`FlowType`]),
//!   anchoring, spacing, and padding.
//! - [`Transform`]: a post-layout scale and offset, optionally driven by a
//!   callback.
//! - [`Clip`]: a rectangle, optionally rounded, clipping every descendant.
//!
//! [`LayoutBuilder::build`] resolves the tree in two passes:
//!
//! 1. Constraint discovery, bottom-up: Hug bounds become the aggregated size of
//!    the children, Mirror bounds copy the opposite axis.
//! 2. Area resolution, top-down from the root (which always spans the window):
//!    children are sized and placed inside their parent, depths are assigned in
//!    pre-order, and clip regions are recorded into a [`ClipMap`].
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_layout::{Constraints, Dim, FlowType, Layout, LayoutBuilder, LayoutTree};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.spawn(None);
//! tree.set_root(root);
//! tree.set_layout(root, Layout::flow(FlowType::Column));
//!
//! let header = tree.spawn(Some(root));
//! tree.set_constraints(header, Constraints::new(Dim::fill(), Dim::fixed(24.0)));
//! let body = tree.spawn(Some(root));
//!
//! let mut builder = LayoutBuilder::new();
//! builder.build(&mut tree, Size::new(300.0, 200.0));
//!
//! let body_area = tree.area(body).unwrap();
//! assert_eq!(body_area.pos, Point::new(0.0, 24.0));
//! assert_eq!(body_area.size, Size::new(300.0, 176.0));
//! assert!(tree.depth(header).unwrap().depth < tree.depth(body).unwrap().depth);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod builder;
mod components;
mod constraints;
mod context;
mod flow;
mod geometry;
mod tree;

pub use builder::LayoutBuilder;
pub use components::{
    Anchor, Clip, ComponentFlags, Depth, FlowType, Layout, SpacingType, Transform,
    TransformCallback, TransformParams, TreeNode,
};
pub use constraints::{Constraints, Dim, FILL, HUG, MIRROR, compute_size, is_sentinel};
pub use context::{ClipMap, ClipRegion, TraverseContext};
pub use flow::{Line, Lines, apply_anchor, break_lines, flow_extent};
pub use geometry::{Area, Axis, Padding, Radius};
pub use tree::LayoutTree;

pub use kurbo::{Point, Size, Vec2};
