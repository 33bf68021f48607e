// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry value types: areas, padding, corner radii, and axes.

use kurbo::{Point, Rect, RoundedRectRadii, Size, Vec2};

/// A resolved rectangle in window coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Area {
    /// Top-left corner.
    pub pos: Point,
    /// Width and height.
    pub size: Size,
}

impl Area {
    /// The empty area at the origin.
    pub const ZERO: Self = Self {
        pos: Point::ZERO,
        size: Size::ZERO,
    };

    /// Create an area from a position and a size.
    #[must_use]
    pub const fn new(pos: Point, size: Size) -> Self {
        Self { pos, size }
    }

    /// Create an area from a [`Rect`].
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            pos: rect.origin(),
            size: rect.size(),
        }
    }

    /// The area as a [`Rect`].
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn end(self) -> Point {
        self.pos + self.size.to_vec2()
    }

    /// Returns true if the area has no extent on either axis.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    /// Returns true if `point` lies inside the area.
    ///
    /// The left and top edges are inclusive, the right and bottom edges are
    /// exclusive, so adjacent areas never both contain a point.
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        self.to_rect().contains(point)
    }

    /// Intersection of two areas; zero-sized when they do not overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        Self::from_rect(self.to_rect().intersect(other.to_rect()))
    }

    /// Shrink the area by `padding`, never below zero size.
    #[must_use]
    pub fn apply_padding(self, padding: Padding) -> Self {
        Self {
            pos: self.pos + Vec2::new(padding.left, padding.top),
            size: Size::new(
                (self.size.width - padding.horizontal()).max(0.0),
                (self.size.height - padding.vertical()).max(0.0),
            ),
        }
    }
}

/// Per-edge padding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Padding {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Padding given in left, right, top, bottom order.
    #[must_use]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same padding on every edge.
    #[must_use]
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Sum of left and right.
    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    /// Sum of the two edges along `axis`.
    #[must_use]
    pub fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }
}

/// Corner radii, clockwise from the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Radius {
    /// Top-left corner.
    pub top_left: f64,
    /// Top-right corner.
    pub top_right: f64,
    /// Bottom-right corner.
    pub bottom_right: f64,
    /// Bottom-left corner.
    pub bottom_left: f64,
}

impl Radius {
    /// Square corners.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same radius on every corner.
    #[must_use]
    pub const fn uniform(r: f64) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// Returns true if every corner is square.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl From<Radius> for RoundedRectRadii {
    fn from(r: Radius) -> Self {
        Self::new(r.top_left, r.top_right, r.bottom_right, r.bottom_left)
    }
}

/// One of the two layout axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis (width).
    Horizontal,
    /// The y axis (height).
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const BOTH: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// The perpendicular axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Lower-case name, used in diagnostics.
    #[must_use]
    pub const fn dimension_name(self) -> &'static str {
        match self {
            Self::Horizontal => "width",
            Self::Vertical => "height",
        }
    }

    /// Component of `size` along this axis.
    #[must_use]
    pub fn of_size(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Component of `point` along this axis.
    #[must_use]
    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Overwrite the component of `size` along this axis.
    pub fn set_size(self, size: &mut Size, v: f64) {
        match self {
            Self::Horizontal => size.width = v,
            Self::Vertical => size.height = v,
        }
    }

    /// Build a size from main (this axis) and cross components.
    #[must_use]
    pub fn pack_size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Build a point from main (this axis) and cross components.
    #[must_use]
    pub fn pack_point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }
}
