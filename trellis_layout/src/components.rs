// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item components read and written by the layout builder.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Vec2;
use trellis_store::Entity;

use crate::geometry::{Area, Axis, Padding, Radius};

bitflags::bitflags! {
    /// Optional components attached to an item.
    ///
    /// Mirrored onto [`TreeNode::flags`] so traversal code knows what an item
    /// carries without probing every table.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ComponentFlags: u16 {
        /// Explicit [`Constraints`](crate::Constraints).
        const CONSTRAINTS = 1 << 0;
        /// A [`Layout`] policy.
        const LAYOUT      = 1 << 1;
        /// A [`Transform`].
        const TRANSFORM   = 1 << 2;
        /// A [`Clip`].
        const CLIP        = 1 << 3;
        /// A painter callback.
        const PAINTER     = 1 << 4;
        /// A mouse button handler.
        const MOUSE       = 1 << 5;
        /// A pointer motion handler.
        const MOTION      = 1 << 6;
        /// A wheel handler.
        const WHEEL       = 1 << 7;
        /// A key handler.
        const KEY         = 1 << 8;
        /// An animation.
        const ANIMATION   = 1 << 9;
        /// A timer.
        const TIMER       = 1 << 10;
        /// Typed item state.
        const STATE       = 1 << 11;
    }
}

/// Structural component: parent link, ordered children, and attached components.
#[derive(Clone, Debug, Default)]
pub struct TreeNode {
    /// Children in paint and traversal order.
    pub children: Vec<Entity>,
    /// Parent item, `None` for roots and detached items.
    pub parent: Option<Entity>,
    /// Components attached to this item.
    pub flags: ComponentFlags,
}

/// Paint-order index assigned by the layout builder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Depth {
    /// Pre-order index; parents are always below their descendants.
    pub depth: u32,
    /// Deepest descendant's depth; equal to `depth` for leaves.
    pub max_child_depth: u32,
}

impl Depth {
    /// Returns true if `other` lies in this item's subtree (inclusive).
    #[must_use]
    pub fn encloses(self, other: u32) -> bool {
        (self.depth..=self.max_child_depth).contains(&other)
    }
}

/// How a container arranges its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlowType {
    /// Children overlap, each sized and anchored independently.
    #[default]
    Stack,
    /// Children follow each other top to bottom.
    Column,
    /// Children follow each other left to right.
    Row,
    /// Children run top to bottom and wrap into further columns.
    FlexColumn,
    /// Children run left to right and wrap into further rows.
    FlexRow,
}

impl FlowType {
    /// Axis along which children follow each other, `None` for [`FlowType::Stack`].
    #[must_use]
    pub const fn main_axis(self) -> Option<Axis> {
        match self {
            Self::Stack => None,
            Self::Column | Self::FlexColumn => Some(Axis::Vertical),
            Self::Row | Self::FlexRow => Some(Axis::Horizontal),
        }
    }

    /// Returns true for the wrapping flows.
    #[must_use]
    pub const fn wraps(self) -> bool {
        matches!(self, Self::FlexColumn | Self::FlexRow)
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stack => "Stack",
            Self::Column => "Column",
            Self::Row => "Row",
            Self::FlexColumn => "FlexColumn",
            Self::FlexRow => "FlexRow",
        }
    }
}

/// Where a child sits inside the space it is given.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Top-left corner.
    TopLeft,
    /// Top edge, horizontally centered.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge, vertically centered.
    Left,
    /// Centered on both axes.
    #[default]
    Center,
    /// Right edge, vertically centered.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge, horizontally centered.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// All nine anchors in reading order.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    /// Fraction of the leftover space placed before the child along `axis`.
    #[must_use]
    pub fn factor(self, axis: Axis) -> f64 {
        let (h, v) = match self {
            Self::TopLeft => (0.0, 0.0),
            Self::Top => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::Left => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::Right => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::Bottom => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        };
        match axis {
            Axis::Horizontal => h,
            Axis::Vertical => v,
        }
    }
}

/// Spacing policy between children of a row or column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpacingType {
    /// Children are separated by exactly `spacing`.
    #[default]
    Packed,
    /// Leftover space widens the gaps when no child fills.
    SpaceBetween,
}

/// Flow policy of a container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// Arrangement of the children.
    pub flow: FlowType,
    /// Alignment of each child inside its slot.
    pub anchor: Anchor,
    /// Alignment of the block of lines in a wrapping flow.
    pub flex_anchor: Anchor,
    /// Spacing policy along the main axis.
    pub spacing_type: SpacingType,
    /// Gap between consecutive children.
    pub spacing: f64,
    /// Gap between consecutive lines of a wrapping flow.
    pub flex_spacing: f64,
    /// Inner padding applied before children are placed.
    pub padding: Padding,
}

impl Layout {
    /// A layout with the given flow and default everything else.
    #[must_use]
    pub fn flow(flow: FlowType) -> Self {
        Self {
            flow,
            ..Self::default()
        }
    }
}

/// Scale, offset, and origin applied to an item after layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformParams {
    /// Scale of the part of the size above the minimum size.
    pub scale: Vec2,
    /// Translation applied after scaling.
    pub offset: Vec2,
    /// Fixed point of the scaling, as a fraction of the size.
    pub origin: Vec2,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            offset: Vec2::ZERO,
            origin: Vec2::new(0.5, 0.5),
        }
    }
}

/// Callback run on a transformed item's area before the transform is applied.
pub type TransformCallback = Box<dyn FnMut(&mut Area, &mut TransformParams)>;

/// Post-layout transform of a single item. Never affects siblings.
#[derive(Default)]
pub struct Transform {
    /// Current parameters.
    pub params: TransformParams,
    /// Optional hook that may adjust the area and the parameters each pass.
    pub on_layout: Option<TransformCallback>,
}

impl core::fmt::Debug for Transform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Transform")
            .field("params", &self.params)
            .field("on_layout", &self.on_layout.is_some())
            .finish()
    }
}

impl Transform {
    /// A transform with fixed parameters.
    #[must_use]
    pub fn new(params: TransformParams) -> Self {
        Self {
            params,
            on_layout: None,
        }
    }

    /// A transform driven by a callback.
    #[must_use]
    pub fn with_callback(
        params: TransformParams,
        callback: impl FnMut(&mut Area, &mut TransformParams) + 'static,
    ) -> Self {
        Self {
            params,
            on_layout: Some(Box::new(callback)),
        }
    }
}

/// Clip region applied to all descendants of an item.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Clip {
    /// Inset of the clip rectangle from the item's area.
    pub padding: Padding,
    /// Corner radii of the clip rectangle.
    pub radius: Radius,
}
