// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arithmetic shared by constraint discovery and area resolution.

use core::ops::Range;

use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::components::Anchor;
use crate::constraints::{Dim, compute_size};
use crate::geometry::{Area, Axis};

/// Position of a child of size `size` anchored inside `parent`.
#[must_use]
pub fn apply_anchor(parent: Area, size: Size, anchor: Anchor) -> Point {
    Point::new(
        parent.pos.x + (parent.size.width - size.width) * anchor.factor(Axis::Horizontal),
        parent.pos.y + (parent.size.height - size.height) * anchor.factor(Axis::Vertical),
    )
}

/// One line of a wrapping flow.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Children of the line, as positions in the parent's child list.
    pub children: Range<usize>,
    /// Main-axis length consumed by extents and spacing.
    pub used: f64,
}

/// Lines of a wrapping flow; most containers have few.
pub type Lines = SmallVec<[Line; 4]>;

/// Main-axis extent used to break a child into lines.
///
/// Flex children (Fill on the main axis) count with their minimum; every other
/// child with the size it will actually receive on a line of length `line`.
#[must_use]
pub fn flow_extent(dim: Dim, line: f64) -> f64 {
    if dim.max.is_infinite() {
        dim.min
    } else {
        compute_size(line, dim.min, dim.max)
    }
}

/// Split child extents into lines no longer than `line`.
///
/// A child is appended to the current line while the line, including
/// `spacing` between children, stays within `line`. A child that does not fit
/// starts a new line. A child longer than a whole line sits alone on its own
/// line and overflows it.
#[must_use]
pub fn break_lines(extents: impl IntoIterator<Item = f64>, line: f64, spacing: f64) -> Lines {
    let mut lines = Lines::new();
    let mut start = 0;
    let mut used = 0.0;
    let mut count = 0;
    for extent in extents {
        let needed = if count == 0 {
            extent
        } else {
            used + spacing + extent
        };
        if count > 0 && needed > line {
            lines.push(Line {
                children: start..start + count,
                used,
            });
            start += count;
            used = extent;
            count = 1;
        } else {
            used = needed;
            count += 1;
        }
    }
    if count > 0 {
        lines.push(Line {
            children: start..start + count,
            used,
        });
    }
    lines
}
