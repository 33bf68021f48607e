// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing constraints and the sentinel encoding of Fill, Hug, and Mirror.
//!
//! A [`Constraints`] value holds a minimum and a maximum [`Size`]. Each axis of
//! `max_size` may carry a sentinel instead of a pixel bound:
//!
//! - [`FILL`] (`f64::INFINITY`): grow to the space the parent offers.
//! - [`HUG`]: size to content; replaced by the aggregated size of the children
//!   during constraint discovery.
//! - [`MIRROR`]: copy whatever the opposite axis resolves to.
//!
//! Use [`Dim`] to build one axis and [`Constraints::new`] to combine two:
//!
//! ```rust
//! use trellis_layout::{Constraints, Dim};
//!
//! let c = Constraints::new(Dim::fill(), Dim::fixed(24.0));
//! assert!(c.max_size.width.is_infinite());
//! assert_eq!(c.min_size.height, 24.0);
//! assert_eq!(c.max_size.height, 24.0);
//! ```

use kurbo::Size;

use crate::geometry::Axis;

/// Sentinel: fill the parent (no upper bound).
pub const FILL: f64 = f64::INFINITY;

/// Sentinel: hug the content.
pub const HUG: f64 = -1.0e30;

/// Sentinel: mirror the opposite axis.
pub const MIRROR: f64 = -2.0e30;

/// Constraint for a single axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dim {
    /// Lower bound in pixels.
    pub min: f64,
    /// Upper bound in pixels, or one of the [`FILL`], [`HUG`], [`MIRROR`] sentinels.
    pub max: f64,
}

impl Dim {
    /// Grow to fill the parent.
    #[must_use]
    pub const fn fill() -> Self {
        Self { min: 0.0, max: FILL }
    }

    /// Size to content.
    #[must_use]
    pub const fn hug() -> Self {
        Self { min: 0.0, max: HUG }
    }

    /// Exactly `v` pixels.
    #[must_use]
    pub const fn fixed(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// Anywhere between `min` and `max` pixels.
    #[must_use]
    pub const fn range(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// At least `min` pixels, otherwise fill.
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self { min, max: FILL }
    }

    /// Copy the opposite axis.
    #[must_use]
    pub const fn mirror() -> Self {
        Self {
            min: 0.0,
            max: MIRROR,
        }
    }
}

/// Minimum and maximum size of an item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Constraints {
    /// Lower bounds.
    pub min_size: Size,
    /// Upper bounds or sentinels.
    pub max_size: Size,
}

impl Default for Constraints {
    fn default() -> Self {
        Self::FILL
    }
}

impl Constraints {
    /// Fill on both axes; the implicit constraints of an item without any.
    pub const FILL: Self = Self {
        min_size: Size::ZERO,
        max_size: Size::new(FILL, FILL),
    };

    /// Combine a width and a height constraint.
    #[must_use]
    pub const fn new(width: Dim, height: Dim) -> Self {
        Self {
            min_size: Size::new(width.min, height.min),
            max_size: Size::new(width.max, height.max),
        }
    }

    /// Constraint along `axis`.
    #[must_use]
    pub fn dim(&self, axis: Axis) -> Dim {
        Dim {
            min: axis.of_size(self.min_size),
            max: axis.of_size(self.max_size),
        }
    }

    /// Overwrite the constraint along `axis`.
    pub fn set_dim(&mut self, axis: Axis, dim: Dim) {
        axis.set_size(&mut self.min_size, dim.min);
        axis.set_size(&mut self.max_size, dim.max);
    }

    /// Returns true if `axis` hugs its content.
    #[must_use]
    pub fn is_hug(&self, axis: Axis) -> bool {
        axis.of_size(self.max_size) == HUG
    }

    /// Returns true if `axis` mirrors the opposite axis.
    #[must_use]
    pub fn is_mirror(&self, axis: Axis) -> bool {
        axis.of_size(self.max_size) == MIRROR
    }

    /// Returns true if `axis` has no upper bound.
    #[must_use]
    pub fn is_fill(&self, axis: Axis) -> bool {
        axis.of_size(self.max_size).is_infinite()
    }

    /// Raise `max` to `min` on every axis that is a pixel bound.
    ///
    /// Conflicting bounds are clamped rather than rejected.
    pub fn clamp_conflicts(&mut self) {
        for axis in Axis::BOTH {
            let Dim { min, max } = self.dim(axis);
            if !is_sentinel(max) && max < min {
                axis.set_size(&mut self.max_size, min);
            }
        }
    }
}

/// Returns true if `v` is one of the Hug or Mirror sentinels.
#[must_use]
pub fn is_sentinel(v: f64) -> bool {
    v == HUG || v == MIRROR
}

/// Size an item along one axis given the space its parent offers.
///
/// A Fill bound grows to the parent but never below `min`; any other bound
/// clamps the parent space into `[min, max]`.
#[must_use]
pub fn compute_size(parent: f64, min: f64, max: f64) -> f64 {
    if max.is_infinite() {
        parent.max(min)
    } else {
        parent.min(max).max(min)
    }
}
