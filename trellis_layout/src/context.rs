// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Working memory of one layout pass and the clip map it produces.

use alloc::vec::Vec;

use kurbo::{Point, RoundedRect, Shape};
use smallvec::SmallVec;
use trellis_store::{Entity, Table};

use crate::components::TreeNode;
use crate::constraints::Constraints;
use crate::geometry::{Area, Axis, Radius};

/// An active clip: the intersection of every enclosing clip plus the shape of
/// the innermost one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipRegion {
    /// Intersection of all enclosing clip rectangles.
    pub area: Area,
    /// Rectangle of the innermost clip before intersection.
    pub shape: Area,
    /// Corner radii of the innermost clip.
    pub radius: Radius,
}

impl ClipRegion {
    /// Returns true if `point` is visible through this clip.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if !self.area.contains(point) {
            return false;
        }
        self.radius.is_zero()
            || RoundedRect::from_rect(self.shape.to_rect(), self.radius).contains(point)
    }
}

/// Depth-indexed record of the clip regions of the last layout pass.
///
/// Depths are assigned in pre-order, so the items under a clip occupy one
/// contiguous depth range. The map stores the clip timeline as segments
/// `(first depth, clip)`; the clip for a depth is the last segment starting at
/// or before it.
#[derive(Clone, Debug, Default)]
pub struct ClipMap {
    segments: Vec<(u32, Option<ClipRegion>)>,
}

impl ClipMap {
    /// Clip active for an item at `depth`, `None` when unclipped.
    #[must_use]
    pub fn clip_at(&self, depth: u32) -> Option<&ClipRegion> {
        let after = self.segments.partition_point(|(start, _)| *start <= depth);
        after
            .checked_sub(1)
            .and_then(|i| self.segments[i].1.as_ref())
    }

    /// Returns true if `point` is visible at `depth`.
    #[must_use]
    pub fn visible_at(&self, depth: u32, point: Point) -> bool {
        self.clip_at(depth).is_none_or(|clip| clip.contains(point))
    }

    /// Number of recorded segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if no clip was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    fn record(&mut self, start: u32, clip: Option<ClipRegion>) {
        debug_assert!(
            self.segments.last().is_none_or(|(s, _)| *s <= start),
            "clip segments must be recorded in depth order"
        );
        self.segments.push((start, clip));
    }
}

/// Working memory for one layout pass.
///
/// Arrays are indexed by the dense index of an item's [`TreeNode`] row and
/// are rebuilt by [`TraverseContext::setup`] at the start of every pass; only
/// their capacity survives between passes. The [`ClipMap`] is the pass's
/// output and stays valid until the next pass.
#[derive(Debug, Default)]
pub struct TraverseContext {
    constraints: Vec<Constraints>,
    mirror: Vec<Option<Axis>>,
    pending: Vec<u32>,
    pub(crate) ready: Vec<usize>,
    clip_stack: SmallVec<[Option<ClipRegion>; 8]>,
    clips: ClipMap,
}

impl TraverseContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a pass over `len` tree nodes.
    pub fn setup(&mut self, len: usize) {
        self.constraints.clear();
        self.constraints.resize(len, Constraints::FILL);
        self.mirror.clear();
        self.mirror.resize(len, None);
        self.pending.clear();
        self.pending.resize(len, 0);
        self.ready.clear();
        self.clip_stack.clear();
        self.clips.clear();
    }

    /// Dense index of `entity` in this pass.
    #[must_use]
    pub fn entity_index_of(&self, nodes: &Table<TreeNode>, entity: Entity) -> Option<usize> {
        nodes.index_of(entity)
    }

    /// Resolved constraints at a dense index.
    #[must_use]
    pub fn constraints(&self, index: usize) -> &Constraints {
        &self.constraints[index]
    }

    pub(crate) fn constraints_mut(&mut self, index: usize) -> &mut Constraints {
        &mut self.constraints[index]
    }

    /// Axis that copies the opposite one at a dense index, if any.
    #[must_use]
    pub fn mirror(&self, index: usize) -> Option<Axis> {
        self.mirror[index]
    }

    pub(crate) fn set_mirror(&mut self, index: usize, axis: Option<Axis>) {
        self.mirror[index] = axis;
    }

    /// Set the number of children that still have to report to `index`.
    pub(crate) fn set_pending(&mut self, index: usize, count: u32) {
        self.pending[index] = count;
    }

    /// Record that one child of `index` has been resolved.
    ///
    /// Returns true once every child has reported, at which point the node is
    /// ready to be resolved itself.
    pub(crate) fn report_child(&mut self, index: usize) -> bool {
        debug_assert!(self.pending[index] > 0, "child reported twice");
        self.pending[index] = self.pending[index].saturating_sub(1);
        self.pending[index] == 0
    }

    /// Innermost clip currently active during the area pass.
    #[must_use]
    pub fn current_clip(&self) -> Option<ClipRegion> {
        self.clip_stack.last().copied().flatten()
    }

    /// Activate a clip for the subtree whose first descendant has depth `start`.
    pub fn set_clip(&mut self, start: u32, own: Area, radius: Radius) {
        let area = match self.current_clip() {
            Some(parent) => own.intersect(parent.area),
            None => own,
        };
        let region = Some(ClipRegion {
            area,
            shape: own,
            radius,
        });
        self.clip_stack.push(region);
        self.clips.record(start, region);
    }

    /// Deactivate the innermost clip; `end` is the first depth after its subtree.
    pub fn restore_clip(&mut self, end: u32) {
        self.clip_stack.pop();
        let restored = self.current_clip();
        self.clips.record(end, restored);
    }

    /// Clip map produced by the last pass.
    #[must_use]
    pub fn clips(&self) -> &ClipMap {
        &self.clips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn area(x: f64, y: f64, w: f64, h: f64) -> Area {
        Area::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn nested_clips_intersect_and_restore() {
        let mut ctx = TraverseContext::new();
        ctx.setup(0);
        // Item at depth 0 clips depths 1..=4, item at depth 2 clips depths 3..=3.
        ctx.set_clip(1, area(0.0, 0.0, 100.0, 100.0), Radius::ZERO);
        ctx.set_clip(3, area(50.0, 50.0, 100.0, 100.0), Radius::ZERO);
        ctx.restore_clip(4);
        ctx.restore_clip(5);

        let clips = ctx.clips();
        assert!(clips.clip_at(0).is_none());
        assert_eq!(clips.clip_at(1).unwrap().area, area(0.0, 0.0, 100.0, 100.0));
        assert_eq!(clips.clip_at(2).unwrap().area, area(0.0, 0.0, 100.0, 100.0));
        assert_eq!(clips.clip_at(3).unwrap().area, area(50.0, 50.0, 50.0, 50.0));
        assert_eq!(clips.clip_at(4).unwrap().area, area(0.0, 0.0, 100.0, 100.0));
        assert!(clips.clip_at(5).is_none());
        assert!(clips.clip_at(100).is_none());
    }

    #[test]
    fn rounded_clip_rejects_corners() {
        let mut ctx = TraverseContext::new();
        ctx.setup(0);
        ctx.set_clip(1, area(0.0, 0.0, 100.0, 100.0), Radius::uniform(20.0));
        let clips = ctx.clips();
        assert!(!clips.visible_at(1, Point::new(1.0, 1.0)));
        assert!(clips.visible_at(1, Point::new(50.0, 50.0)));
        assert!(clips.visible_at(0, Point::new(1.0, 1.0)), "the clipping item itself is unclipped");
    }

    #[test]
    fn join_counter_releases_parent_after_last_child() {
        let mut ctx = TraverseContext::new();
        ctx.setup(3);
        ctx.set_pending(0, 2);
        assert!(!ctx.report_child(0));
        assert!(ctx.report_child(0));
    }
}
