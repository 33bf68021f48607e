// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two-pass layout builder.
//!
//! ## Constraint discovery
//!
//! Bottom-up, as an explicit worklist: every node waits for as many reports as
//! it has children, leaves start out ready, and a node is resolved once its
//! last child has reported. Resolving a node replaces Hug bounds with the
//! aggregated size of its children (plus padding) and Mirror bounds with a copy
//! of the opposite axis.
//!
//! ## Area resolution
//!
//! Top-down and pre-order from the root, whose area is the window. Each node
//! receives a depth before its children, lays its children out inside its own
//! area according to its [`Layout`], applies their transforms, and opens a
//! clip for its subtree when it has a [`Clip`](crate::Clip).

use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};
use trellis_store::{Entity, Table};

use crate::components::{Depth, FlowType, Layout, SpacingType, Transform, TreeNode};
use crate::constraints::{Constraints, Dim, FILL, compute_size, is_sentinel};
use crate::context::{ClipMap, TraverseContext};
use crate::flow::{Lines, apply_anchor, break_lines, flow_extent};
use crate::geometry::{Area, Axis};
use crate::tree::LayoutTree;

/// Computes every item's [`Area`] and [`Depth`].
///
/// The builder keeps its [`TraverseContext`] between passes so allocations are
/// reused; the [`ClipMap`] of the last pass stays readable until the next one.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    ctx: TraverseContext,
    infos: Vec<ChildInfo>,
    main_sizes: Vec<f64>,
    stack: Vec<Visit>,
}

#[derive(Copy, Clone, Debug)]
struct ChildInfo {
    entity: Entity,
    main: Dim,
    cross: Dim,
    min_size: Size,
    mirror: Option<Axis>,
}

#[derive(Copy, Clone, Debug)]
enum Visit {
    Enter(Entity),
    Exit(Entity),
}


impl LayoutBuilder {
    /// Create a builder with empty working memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Working memory of the last pass.
    #[must_use]
    pub fn context(&self) -> &TraverseContext {
        &self.ctx
    }

    /// Clip regions recorded by the last pass.
    #[must_use]
    pub fn clips(&self) -> &ClipMap {
        self.ctx.clips()
    }

    /// Run both passes over `tree`, sizing the root to `window`.
    ///
    /// Does nothing if the tree has no root.
    ///
    /// # Panics
    ///
    /// In debug builds, panics on invalid constraint and flow combinations:
    /// hugging the wrap axis of a flex flow, hugging the cross axis of a flex
    /// flow whose wrap axis is Fill, or mirroring both axes. Release builds log
    /// an error and treat the offending axis as Fill.
    pub fn build(&mut self, tree: &mut LayoutTree, window: Size) {
        let Some(root) = tree.root() else {
            log::debug!("layout skipped: tree has no root");
            return;
        };
        log::debug!(
            "layout pass over {} items, window {}x{}",
            tree.len(),
            window.width,
            window.height
        );
        self.discover_constraints(tree);
        self.resolve_areas(tree, root, window);
    }

    fn discover_constraints(&mut self, tree: &LayoutTree) {
        let ctx = &mut self.ctx;
        ctx.setup(tree.nodes.len());
        for (i, (entity, node)) in tree.nodes.iter().enumerate() {
            if let Some(c) = tree.constraints.get(entity) {
                *ctx.constraints_mut(i) = *c;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "child counts fit in 32 bits like entity indices."
            )]
            ctx.set_pending(i, node.children.len() as u32);
            if node.children.is_empty() {
                ctx.ready.push(i);
            }
        }

        while let Some(i) = ctx.ready.pop() {
            resolve_constraints(ctx, tree, i);
            let parent = tree.nodes.get_by_index(i).and_then(|n| n.parent);
            if let Some(p) = parent.and_then(|p| tree.nodes.index_of(p))
                && ctx.report_child(p)
            {
                ctx.ready.push(p);
            }
        }
    }

    fn resolve_areas(&mut self, tree: &mut LayoutTree, root: Entity, window: Size) {
        if let Some(area) = tree.areas.get_mut(root) {
            *area = Area::new(Point::ZERO, window);
        }

        let mut counter: u32 = 0;
        self.stack.clear();
        self.stack.push(Visit::Enter(root));
        while let Some(visit) = self.stack.pop() {
            match visit {
                Visit::Enter(entity) => {
                    let depth = counter;
                    counter += 1;
                    if let Some(d) = tree.depths.get_mut(entity) {
                        *d = Depth {
                            depth,
                            max_child_depth: depth,
                        };
                    }
                    if let Some(clip) = tree.clips.get(entity).copied() {
                        let area = tree.areas.get(entity).copied().unwrap_or_default();
                        self.ctx
                            .set_clip(counter, area.apply_padding(clip.padding), clip.radius);
                    }
                    self.place_children(tree, entity);
                    self.stack.push(Visit::Exit(entity));
                    if let Some(node) = tree.nodes.get(entity) {
                        // Reversed so children are entered in their stored order.
                        self.stack
                            .extend(node.children.iter().rev().map(|c| Visit::Enter(*c)));
                    }
                }
                Visit::Exit(entity) => {
                    if let Some(d) = tree.depths.get_mut(entity) {
                        d.max_child_depth = counter - 1;
                    }
                    if tree.clips.contains(entity) {
                        self.ctx.restore_clip(counter);
                    }
                }
            }
        }
    }

    fn place_children(&mut self, tree: &mut LayoutTree, parent: Entity) {
        let Some(node) = tree.nodes.get(parent) else {
            return;
        };
        if node.children.is_empty() {
            return;
        }
        let area = tree.areas.get(parent).copied().unwrap_or_default();
        let layout = tree.layouts.get(parent).copied().unwrap_or_default();
        let content = area.apply_padding(layout.padding);
        let main = layout.flow.main_axis().unwrap_or(Axis::Vertical);

        self.infos.clear();
        for &child in &node.children {
            let Some(i) = tree.nodes.index_of(child) else {
                continue;
            };
            let c = self.ctx.constraints(i);
            self.infos.push(ChildInfo {
                entity: child,
                main: c.dim(main),
                cross: c.dim(main.cross()),
                min_size: c.min_size,
                mirror: self.ctx.mirror(i),
            });
        }

        log::trace!(
            "placing {} children of {parent:?} as {}",
            self.infos.len(),
            layout.flow.name()
        );
        match layout.flow {
            FlowType::Stack => place_stack(&self.infos, content, &layout, &mut tree.areas),
            FlowType::Column | FlowType::Row => place_linear(
                &self.infos,
                main,
                content,
                &layout,
                &mut self.main_sizes,
                &mut tree.areas,
            ),
            FlowType::FlexColumn | FlowType::FlexRow => place_wrapped(
                &self.infos,
                main,
                content,
                &layout,
                &mut self.main_sizes,
                &mut tree.areas,
            ),
        }

        for info in &self.infos {
            if let (Some(transform), Some(area)) = (
                tree.transforms.get_mut(info.entity),
                tree.areas.get_mut(info.entity),
            ) {
                apply_transform(transform, area, info.min_size);
            }
        }
    }
}

/// Resolve Hug and Mirror bounds of the node at dense index `i`.
fn resolve_constraints(ctx: &mut TraverseContext, tree: &LayoutTree, i: usize) {
    let (Some(entity), Some(node)) = (tree.nodes.entity_at(i), tree.nodes.get_by_index(i)) else {
        return;
    };
    let layout = tree.layouts.get(entity).copied().unwrap_or_default();
    let mut c = *ctx.constraints(i);

    let mirror_w = c.is_mirror(Axis::Horizontal);
    let mirror_h = c.is_mirror(Axis::Vertical);
    debug_assert!(
        !(mirror_w && mirror_h),
        "Constraints cannot Mirror both width and height"
    );
    let mirror = match (mirror_w, mirror_h) {
        (true, true) => {
            log::error!("{entity:?} mirrors both axes; treating both as Fill");
            c.set_dim(Axis::Horizontal, Dim::fill());
            c.set_dim(Axis::Vertical, Dim::fill());
            None
        }
        (true, false) => Some(Axis::Horizontal),
        (false, true) => Some(Axis::Vertical),
        (false, false) => None,
    };

    let wrap_axis = layout.flow.main_axis().filter(|_| layout.flow.wraps());
    let hugs_lines = wrap_axis.is_some_and(|main| c.is_hug(main.cross()));

    for axis in Axis::BOTH {
        if !c.is_hug(axis) {
            continue;
        }
        let content = hug_extent(ctx, tree, node, &layout, &c, axis);
        let hugged = content + layout.padding.along(axis);
        let min = c.dim(axis).min;
        if hugged.is_infinite() {
            c.set_dim(axis, Dim { min, max: FILL });
        } else {
            let min = min.max(hugged);
            c.set_dim(axis, Dim::range(min, hugged.max(min)));
        }
    }

    // Lines were measured against the full wrap bound; pin the wrap axis to it
    // so area resolution breaks them the same way.
    if hugs_lines && let Some(main) = wrap_axis {
        let line = c.dim(main);
        if line.max.is_finite() && !is_sentinel(line.max) {
            c.set_dim(main, Dim::fixed(line.max.max(line.min)));
        }
    }

    if let Some(axis) = mirror {
        c.set_dim(axis, c.dim(axis.cross()));
    }
    c.clamp_conflicts();
    *ctx.constraints_mut(i) = c;
    ctx.set_mirror(i, mirror);
}

/// Content size of a hugging node along `axis`, before padding.
///
/// Returns [`FILL`] when the content is unbounded or the combination is
/// invalid.
fn hug_extent(
    ctx: &TraverseContext,
    tree: &LayoutTree,
    node: &TreeNode,
    layout: &Layout,
    own: &Constraints,
    axis: Axis,
) -> f64 {
    let max_of = |axis: Axis| {
        child_dims(ctx, tree, node, axis).fold(0.0, |acc: f64, d| acc.max(d.max))
    };
    let count = node.children.len();
    let gaps = count.saturating_sub(1) as f64;

    let flow = layout.flow;
    let Some(main) = flow.main_axis() else {
        return max_of(axis);
    };
    if !flow.wraps() {
        return if axis == main {
            child_dims(ctx, tree, node, axis).map(|d| d.max).sum::<f64>() + layout.spacing * gaps
        } else {
            max_of(axis)
        };
    }

    let hugs_wrap_axis = axis == main;
    debug_assert!(
        !hugs_wrap_axis,
        "{} cannot Hug {}: the wrap axis must be bounded",
        flow.name(),
        axis.dimension_name()
    );
    if hugs_wrap_axis {
        log::error!(
            "{} cannot Hug {}; treating it as Fill",
            flow.name(),
            axis.dimension_name()
        );
        return FILL;
    }
    let line = own.dim(main).max;
    let bounded = line.is_finite() && !is_sentinel(line);
    debug_assert!(
        bounded,
        "{} cannot Hug {} while {} is Fill: line length is unknown",
        flow.name(),
        axis.dimension_name(),
        main.dimension_name()
    );
    if !bounded {
        log::error!(
            "{} cannot Hug {} without a bounded {}; treating it as Fill",
            flow.name(),
            axis.dimension_name(),
            main.dimension_name()
        );
        return FILL;
    }
    let line = (line - layout.padding.along(main)).max(0.0);
    let extents: Vec<f64> = child_dims(ctx, tree, node, main)
        .map(|d| flow_extent(d, line))
        .collect();
    let crosses: Vec<f64> = child_dims(ctx, tree, node, axis).map(|d| d.max).collect();
    let lines = break_lines(extents, line, layout.spacing);
    let line_gaps = lines.len().saturating_sub(1) as f64;
    lines
        .iter()
        .map(|l| crosses[l.children.clone()].iter().fold(0.0, |acc: f64, c| acc.max(*c)))
        .sum::<f64>()
        + layout.flex_spacing * line_gaps
}

/// Resolved constraints of `node`'s children along `axis`.
fn child_dims<'a>(
    ctx: &'a TraverseContext,
    tree: &'a LayoutTree,
    node: &'a TreeNode,
    axis: Axis,
) -> impl Iterator<Item = Dim> + 'a {
    node.children
        .iter()
        .filter_map(move |c| tree.nodes.index_of(*c))
        .map(move |i| ctx.constraints(i).dim(axis))
}

/// Size of a child given the space offered on each axis, honoring Mirror.
fn size_in(info: &ChildInfo, main: Axis, space_main: f64, space_cross: f64) -> Size {
    let mut size = main.pack_size(
        compute_size(space_main, info.main.min, info.main.max),
        compute_size(space_cross, info.cross.min, info.cross.max),
    );
    if let Some(axis) = info.mirror {
        let mirrored = axis.cross().of_size(size);
        axis.set_size(&mut size, mirrored);
    }
    size
}

fn place_stack(infos: &[ChildInfo], content: Area, layout: &Layout, areas: &mut Table<Area>) {
    // Stack children are stored with main = vertical, see `place_children`.
    let main = Axis::Vertical;
    for info in infos {
        let size = size_in(
            info,
            main,
            main.of_size(content.size),
            main.cross().of_size(content.size),
        );
        let pos = apply_anchor(content, size, layout.anchor);
        areas.insert(info.entity, Area::new(pos, size));
    }
}

fn is_flex(info: &ChildInfo, main: Axis) -> bool {
    info.mirror != Some(main) && info.main.max.is_infinite()
}

/// Main-axis sizes for one run of children; returns the gap between them.
///
/// Fixed children take their clamped size first; flex children split the
/// remaining space evenly. Sizes are written to `out`. Children are placed
/// from the start of the run, so leftover space trails the last child.
fn distribute_main(
    infos: &[ChildInfo],
    main: Axis,
    main_len: f64,
    cross_len: f64,
    layout: &Layout,
    out: &mut Vec<f64>,
) -> f64 {
    out.clear();
    let gaps = infos.len().saturating_sub(1) as f64;
    let mut free = main_len - layout.spacing * gaps;
    let mut flex = 0_usize;
    for info in infos {
        let size = if info.mirror == Some(main) {
            compute_size(cross_len, info.cross.min, info.cross.max)
        } else if is_flex(info, main) {
            flex += 1;
            0.0
        } else {
            compute_size(main_len, info.main.min, info.main.max)
        };
        free -= size;
        out.push(size);
    }
    if flex > 0 {
        let share = free.max(0.0) / flex as f64;
        for (size, info) in out.iter_mut().zip(infos) {
            if is_flex(info, main) {
                *size = share.max(info.main.min);
            }
        }
    }

    let spread = layout.spacing_type == SpacingType::SpaceBetween && flex == 0 && infos.len() >= 2;
    if spread && free > 0.0 {
        layout.spacing + free / gaps
    } else {
        layout.spacing
    }
}

fn place_linear(
    infos: &[ChildInfo],
    main: Axis,
    content: Area,
    layout: &Layout,
    main_sizes: &mut Vec<f64>,
    areas: &mut Table<Area>,
) {
    let cross = main.cross();
    let main_len = main.of_size(content.size);
    let cross_len = cross.of_size(content.size);
    let gap = distribute_main(infos, main, main_len, cross_len, layout, main_sizes);

    let mut cursor = main.of_point(content.pos);
    for (info, &main_size) in infos.iter().zip(main_sizes.iter()) {
        let cross_size = if info.mirror == Some(cross) {
            main_size
        } else {
            compute_size(cross_len, info.cross.min, info.cross.max)
        };
        let cross_pos =
            cross.of_point(content.pos) + (cross_len - cross_size) * layout.anchor.factor(cross);
        areas.insert(
            info.entity,
            Area::new(
                main.pack_point(cursor, cross_pos),
                main.pack_size(main_size, cross_size),
            ),
        );
        cursor += main_size + gap;
    }
}

fn place_wrapped(
    infos: &[ChildInfo],
    main: Axis,
    content: Area,
    layout: &Layout,
    main_sizes: &mut Vec<f64>,
    areas: &mut Table<Area>,
) {
    let cross = main.cross();
    let line_len = main.of_size(content.size);
    let cross_len = cross.of_size(content.size);
    let lines: Lines = break_lines(
        infos.iter().map(|i| flow_extent(i.main, line_len)),
        line_len,
        layout.spacing,
    );

    // Main sizes per line, and the cross size each line needs for its
    // children that do not fill the cross axis.
    let mut gaps: Vec<f64> = Vec::with_capacity(lines.len());
    let mut line_crosses: Vec<Option<f64>> = Vec::with_capacity(lines.len());
    let mut sizes: Vec<f64> = Vec::with_capacity(infos.len());
    for line in &lines {
        let members = &infos[line.children.clone()];
        gaps.push(distribute_main(
            members, main, line_len, cross_len, layout, main_sizes,
        ));
        let mut needed: Option<f64> = None;
        for (info, &main_size) in members.iter().zip(main_sizes.iter()) {
            let fixed = if info.mirror == Some(cross) {
                Some(main_size)
            } else if info.cross.max.is_infinite() {
                None
            } else {
                Some(compute_size(cross_len, info.cross.min, info.cross.max))
            };
            if let Some(f) = fixed {
                needed = Some(needed.map_or(f, |n| n.max(f)));
            }
        }
        line_crosses.push(needed);
        sizes.extend_from_slice(main_sizes);
    }

    let line_gaps = lines.len().saturating_sub(1) as f64;
    let fixed_total: f64 = line_crosses.iter().flatten().sum();
    let fill_lines = line_crosses.iter().filter(|c| c.is_none()).count();
    let fill_share = if fill_lines > 0 {
        ((cross_len - fixed_total - layout.flex_spacing * line_gaps) / fill_lines as f64).max(0.0)
    } else {
        0.0
    };
    let line_sizes: Vec<f64> = line_crosses
        .iter()
        .map(|c| c.unwrap_or(fill_share))
        .collect();
    let block = line_sizes.iter().sum::<f64>() + layout.flex_spacing * line_gaps;

    let mut cross_cursor = cross.of_point(content.pos)
        + (cross_len - block).max(0.0) * layout.flex_anchor.factor(cross);
    for ((line, &gap), &line_cross) in lines.iter().zip(&gaps).zip(&line_sizes) {
        let mut cursor = main.of_point(content.pos);
        for idx in line.children.clone() {
            let info = &infos[idx];
            let main_size = sizes[idx];
            let cross_size = if info.mirror == Some(cross) {
                main_size
            } else if info.cross.max.is_infinite() {
                line_cross.max(info.cross.min)
            } else {
                compute_size(cross_len, info.cross.min, info.cross.max)
            };
            let cross_pos = cross_cursor + (line_cross - cross_size) * layout.anchor.factor(cross);
            areas.insert(
                info.entity,
                Area::new(
                    main.pack_point(cursor, cross_pos),
                    main.pack_size(main_size, cross_size),
                ),
            );
            cursor += main_size + gap;
        }
        cross_cursor += line_cross + layout.flex_spacing;
    }
}

/// Run the transform callback, then scale about the origin and offset.
fn apply_transform(transform: &mut Transform, area: &mut Area, min: Size) {
    if let Some(callback) = transform.on_layout.as_mut() {
        callback(area, &mut transform.params);
    }
    let params = transform.params;
    let size = area.size;
    let scaled = Size::new(
        min.width + (size.width - min.width) * params.scale.x,
        min.height + (size.height - min.height) * params.scale.y,
    );
    area.pos += Vec2::new(
        (size.width - scaled.width) * params.origin.x,
        (size.height - scaled.height) * params.origin.y,
    ) + params.offset;
    area.size = scaled;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Anchor, Clip, TransformParams};
    use crate::geometry::Padding;
    use alloc::vec;

    const WINDOW: Size = Size::new(200.0, 200.0);

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Area {
        Area::new(Point::new(x, y), Size::new(w, h))
    }

    fn tree_with_root() -> (LayoutTree, Entity) {
        let mut tree = LayoutTree::new();
        let root = tree.spawn(None);
        tree.set_root(root);
        (tree, root)
    }

    fn build(tree: &mut LayoutTree) -> LayoutBuilder {
        let mut builder = LayoutBuilder::new();
        builder.build(tree, WINDOW);
        builder
    }

    /// Container of fixed size `w`x`h` at the top-left of the root.
    fn container(tree: &mut LayoutTree, root: Entity, w: Dim, h: Dim, layout: Layout) -> Entity {
        tree.set_layout(
            root,
            Layout {
                anchor: Anchor::TopLeft,
                ..Layout::default()
            },
        );
        let c = tree.spawn(Some(root));
        tree.set_constraints(c, Constraints::new(w, h));
        tree.set_layout(c, layout);
        c
    }

    #[test]
    fn root_spans_window() {
        let (mut tree, root) = tree_with_root();
        tree.set_constraints(root, Constraints::new(Dim::fixed(10.0), Dim::hug()));
        for window in [Size::new(640.0, 480.0), Size::new(1.0, 3.0)] {
            LayoutBuilder::new().build(&mut tree, window);
            assert_eq!(tree.area(root), Some(Area::new(Point::ZERO, window)));
        }
    }

    #[test]
    fn stack_children_fill_root() {
        let (mut tree, root) = tree_with_root();
        let kids: Vec<Entity> = (0..3).map(|_| tree.spawn(Some(root))).collect();
        build(&mut tree);
        assert_eq!(tree.area(root), Some(rect(0.0, 0.0, 200.0, 200.0)));
        for k in kids {
            assert_eq!(tree.area(k), Some(rect(0.0, 0.0, 200.0, 200.0)));
        }
    }

    #[test]
    fn stack_padding_shrinks_children() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                padding: Padding::new(2.0, 4.0, 6.0, 8.0),
                ..Layout::default()
            },
        );
        let kids: Vec<Entity> = (0..3).map(|_| tree.spawn(Some(root))).collect();
        build(&mut tree);
        for k in kids {
            assert_eq!(tree.area(k), Some(rect(2.0, 6.0, 194.0, 186.0)));
        }
    }

    #[test]
    fn stack_anchors_half_sized_child() {
        let expected = [
            (0.0, 0.0),
            (50.0, 0.0),
            (100.0, 0.0),
            (0.0, 50.0),
            (50.0, 50.0),
            (100.0, 50.0),
            (0.0, 100.0),
            (50.0, 100.0),
            (100.0, 100.0),
        ];
        for (anchor, (x, y)) in Anchor::ALL.into_iter().zip(expected) {
            let (mut tree, root) = tree_with_root();
            tree.set_layout(
                root,
                Layout {
                    anchor,
                    ..Layout::default()
                },
            );
            let child = tree.spawn(Some(root));
            tree.set_constraints(child, Constraints::new(Dim::fixed(100.0), Dim::fixed(100.0)));
            build(&mut tree);
            assert_eq!(tree.area(child), Some(rect(x, y, 100.0, 100.0)), "{anchor:?}");
        }
    }

    #[test]
    fn row_centers_fixed_height_child() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(root, Layout::flow(FlowType::Row));
        let child = tree.spawn(Some(root));
        tree.set_constraints(child, Constraints::new(Dim::fill(), Dim::fixed(30.0)));
        build(&mut tree);
        let area = tree.area(child).unwrap();
        assert_eq!(area.pos.y, WINDOW.height / 2.0 - 30.0 / 2.0);
        assert_eq!(area.size, Size::new(200.0, 30.0));
    }

    #[test]
    fn column_splits_free_space_among_flex_children() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                spacing: 10.0,
                ..Layout::flow(FlowType::Column)
            },
        );
        let header = tree.spawn(Some(root));
        tree.set_constraints(header, Constraints::new(Dim::fill(), Dim::fixed(40.0)));
        let a = tree.spawn(Some(root));
        let b = tree.spawn(Some(root));
        build(&mut tree);
        // 200 - 40 - 2 * 10 = 140 shared by two flex children.
        assert_eq!(tree.area(header), Some(rect(0.0, 0.0, 200.0, 40.0)));
        assert_eq!(tree.area(a), Some(rect(0.0, 50.0, 200.0, 70.0)));
        assert_eq!(tree.area(b), Some(rect(0.0, 130.0, 200.0, 70.0)));
    }

    #[test]
    fn flex_child_never_shrinks_below_min() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(root, Layout::flow(FlowType::Row));
        let fixed = tree.spawn(Some(root));
        tree.set_constraints(fixed, Constraints::new(Dim::fixed(180.0), Dim::fill()));
        let flex = tree.spawn(Some(root));
        tree.set_constraints(flex, Constraints::new(Dim::at_least(50.0), Dim::fill()));
        build(&mut tree);
        assert_eq!(tree.area(flex).unwrap().size.width, 50.0);
        assert_eq!(tree.area(flex).unwrap().pos.x, 180.0);
    }

    #[test]
    fn space_between_spreads_fixed_children() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                spacing_type: SpacingType::SpaceBetween,
                ..Layout::flow(FlowType::Row)
            },
        );
        let kids: Vec<Entity> = (0..3)
            .map(|_| {
                let k = tree.spawn(Some(root));
                tree.set_constraints(k, Constraints::new(Dim::fixed(20.0), Dim::fixed(20.0)));
                k
            })
            .collect();
        build(&mut tree);
        let xs: Vec<f64> = kids.iter().map(|k| tree.area(*k).unwrap().pos.x).collect();
        assert_eq!(xs, vec![0.0, 90.0, 180.0]);
    }

    #[test]
    fn packed_row_places_children_from_the_start() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                anchor: Anchor::Right,
                ..Layout::flow(FlowType::Row)
            },
        );
        let a = tree.spawn(Some(root));
        let b = tree.spawn(Some(root));
        for k in [a, b] {
            tree.set_constraints(k, Constraints::new(Dim::fixed(50.0), Dim::fixed(10.0)));
        }
        build(&mut tree);
        // Anchor only acts across the row.
        assert_eq!(tree.area(a), Some(rect(0.0, 190.0 / 2.0, 50.0, 10.0)));
        assert_eq!(tree.area(b), Some(rect(50.0, 190.0 / 2.0, 50.0, 10.0)));
    }

    #[test]
    fn column_header_starts_at_top_under_center_anchor() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(root, Layout::flow(FlowType::Column));
        let header = tree.spawn(Some(root));
        tree.set_constraints(header, Constraints::new(Dim::fill(), Dim::fixed(40.0)));
        build(&mut tree);
        assert_eq!(tree.area(header), Some(rect(0.0, 0.0, 200.0, 40.0)));
    }

    #[test]
    fn space_between_yields_to_flex_children() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                spacing_type: SpacingType::SpaceBetween,
                ..Layout::flow(FlowType::Row)
            },
        );
        let left = tree.spawn(Some(root));
        let middle = tree.spawn(Some(root));
        let right = tree.spawn(Some(root));
        for k in [left, right] {
            tree.set_constraints(k, Constraints::new(Dim::fixed(20.0), Dim::fixed(20.0)));
        }
        build(&mut tree);
        assert_eq!(tree.area(middle).unwrap().size.width, 160.0);
        let xs: Vec<f64> = [left, middle, right]
            .iter()
            .map(|k| tree.area(*k).unwrap().pos.x)
            .collect();
        assert_eq!(xs, vec![0.0, 20.0, 180.0]);
    }

    #[test]
    fn column_hugs_sum_of_children_plus_padding() {
        let (mut tree, root) = tree_with_root();
        let col = container(
            &mut tree,
            root,
            Dim::hug(),
            Dim::hug(),
            Layout {
                spacing: 5.0,
                padding: Padding::uniform(3.0),
                ..Layout::flow(FlowType::Column)
            },
        );
        for (w, h) in [(40.0, 10.0), (60.0, 20.0)] {
            let k = tree.spawn(Some(col));
            tree.set_constraints(k, Constraints::new(Dim::fixed(w), Dim::fixed(h)));
        }
        let builder = build(&mut tree);
        let i = tree.nodes.index_of(col).unwrap();
        let c = builder.context().constraints(i);
        assert_eq!(c.min_size, Size::new(66.0, 41.0));
        assert_eq!(c.max_size, Size::new(66.0, 41.0));
        assert_eq!(tree.area(col), Some(rect(0.0, 0.0, 66.0, 41.0)));
    }

    #[test]
    fn row_hugs_along_main_and_maxes_across() {
        let (mut tree, root) = tree_with_root();
        let row = container(
            &mut tree,
            root,
            Dim::hug(),
            Dim::hug(),
            Layout {
                spacing: 4.0,
                ..Layout::flow(FlowType::Row)
            },
        );
        for (w, h) in [(10.0, 30.0), (20.0, 15.0), (30.0, 5.0)] {
            let k = tree.spawn(Some(row));
            tree.set_constraints(k, Constraints::new(Dim::fixed(w), Dim::fixed(h)));
        }
        build(&mut tree);
        assert_eq!(tree.area(row).unwrap().size, Size::new(68.0, 30.0));
    }

    #[test]
    fn hugging_a_filling_child_becomes_fill() {
        let (mut tree, root) = tree_with_root();
        let stack = container(&mut tree, root, Dim::hug(), Dim::fixed(20.0), Layout::default());
        tree.spawn(Some(stack));
        build(&mut tree);
        assert_eq!(tree.area(stack).unwrap().size, Size::new(200.0, 20.0));
    }

    #[test]
    fn empty_hug_is_its_padding() {
        let (mut tree, root) = tree_with_root();
        let leaf = container(
            &mut tree,
            root,
            Dim::hug(),
            Dim::hug(),
            Layout {
                padding: Padding::new(1.0, 2.0, 3.0, 4.0),
                ..Layout::default()
            },
        );
        build(&mut tree);
        assert_eq!(tree.area(leaf).unwrap().size, Size::new(3.0, 7.0));
    }

    #[test]
    fn nested_hugs_resolve_bottom_up() {
        let (mut tree, root) = tree_with_root();
        let outer = container(&mut tree, root, Dim::hug(), Dim::hug(), Layout::flow(FlowType::Row));
        let inner = tree.spawn(Some(outer));
        tree.set_constraints(inner, Constraints::new(Dim::hug(), Dim::hug()));
        tree.set_layout(inner, Layout::flow(FlowType::Column));
        for _ in 0..3 {
            let k = tree.spawn(Some(inner));
            tree.set_constraints(k, Constraints::new(Dim::fixed(8.0), Dim::fixed(8.0)));
        }
        let sibling = tree.spawn(Some(outer));
        tree.set_constraints(sibling, Constraints::new(Dim::fixed(12.0), Dim::fixed(4.0)));
        build(&mut tree);
        assert_eq!(tree.area(inner).unwrap().size, Size::new(8.0, 24.0));
        assert_eq!(tree.area(outer).unwrap().size, Size::new(20.0, 24.0));
    }

    #[test]
    fn flex_row_wraps_and_hug_matches_areas() {
        let (mut tree, root) = tree_with_root();
        let flex = container(
            &mut tree,
            root,
            Dim::fixed(100.0),
            Dim::hug(),
            Layout {
                anchor: Anchor::TopLeft,
                flex_anchor: Anchor::TopLeft,
                spacing: 10.0,
                flex_spacing: 5.0,
                ..Layout::flow(FlowType::FlexRow)
            },
        );
        let sizes = [(40.0, 10.0), (40.0, 20.0), (40.0, 15.0), (120.0, 8.0)];
        let kids: Vec<Entity> = sizes
            .iter()
            .map(|&(w, h)| {
                let k = tree.spawn(Some(flex));
                tree.set_constraints(k, Constraints::new(Dim::fixed(w), Dim::fixed(h)));
                k
            })
            .collect();
        build(&mut tree);

        // Lines: [40, 40] (90 used), [40], [120 overflowing alone].
        // Heights: 20 + 15 + 8 plus two gaps of 5.
        assert_eq!(tree.area(flex), Some(rect(0.0, 0.0, 100.0, 53.0)));
        assert_eq!(tree.area(kids[0]), Some(rect(0.0, 0.0, 40.0, 10.0)));
        assert_eq!(tree.area(kids[1]), Some(rect(50.0, 0.0, 40.0, 20.0)));
        assert_eq!(tree.area(kids[2]), Some(rect(0.0, 25.0, 40.0, 15.0)));
        assert_eq!(tree.area(kids[3]), Some(rect(0.0, 45.0, 120.0, 8.0)));
    }

    #[test]
    fn flex_column_lines_advance_horizontally() {
        let (mut tree, root) = tree_with_root();
        let flex = container(
            &mut tree,
            root,
            Dim::hug(),
            Dim::fixed(50.0),
            Layout {
                anchor: Anchor::TopLeft,
                ..Layout::flow(FlowType::FlexColumn)
            },
        );
        let kids: Vec<Entity> = [(10.0, 30.0), (20.0, 30.0), (15.0, 20.0)]
            .iter()
            .map(|&(w, h)| {
                let k = tree.spawn(Some(flex));
                tree.set_constraints(k, Constraints::new(Dim::fixed(w), Dim::fixed(h)));
                k
            })
            .collect();
        build(&mut tree);
        assert_eq!(tree.area(flex).unwrap().size, Size::new(30.0, 50.0));
        assert_eq!(tree.area(kids[0]), Some(rect(0.0, 0.0, 10.0, 30.0)));
        assert_eq!(tree.area(kids[1]), Some(rect(10.0, 0.0, 20.0, 30.0)));
        assert_eq!(tree.area(kids[2]), Some(rect(10.0, 30.0, 15.0, 20.0)));
    }

    #[test]
    fn flex_lines_share_space_for_filling_children() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                anchor: Anchor::TopLeft,
                ..Layout::flow(FlowType::FlexRow)
            },
        );
        let kids: Vec<Entity> = (0..2)
            .map(|_| {
                let k = tree.spawn(Some(root));
                tree.set_constraints(k, Constraints::new(Dim::fixed(150.0), Dim::fill()));
                k
            })
            .collect();
        build(&mut tree);
        assert_eq!(tree.area(kids[0]), Some(rect(0.0, 0.0, 150.0, 100.0)));
        assert_eq!(tree.area(kids[1]), Some(rect(0.0, 100.0, 150.0, 100.0)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "FlexColumn cannot Hug width while height is Fill")]
    fn flex_column_hugging_width_without_height_is_fatal() {
        let (mut tree, root) = tree_with_root();
        let flex = tree.spawn(Some(root));
        tree.set_constraints(flex, Constraints::new(Dim::hug(), Dim::fill()));
        tree.set_layout(flex, Layout::flow(FlowType::FlexColumn));
        tree.spawn(Some(flex));
        build(&mut tree);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "FlexRow cannot Hug width: the wrap axis must be bounded")]
    fn flex_row_hugging_wrap_axis_is_fatal() {
        let (mut tree, root) = tree_with_root();
        let flex = tree.spawn(Some(root));
        tree.set_constraints(flex, Constraints::new(Dim::hug(), Dim::fixed(10.0)));
        tree.set_layout(flex, Layout::flow(FlowType::FlexRow));
        build(&mut tree);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "FlexColumn cannot Hug height: the wrap axis must be bounded")]
    fn flex_column_hugging_wrap_axis_is_fatal() {
        let (mut tree, root) = tree_with_root();
        let flex = tree.spawn(Some(root));
        tree.set_constraints(flex, Constraints::new(Dim::fixed(50.0), Dim::hug()));
        tree.set_layout(flex, Layout::flow(FlowType::FlexColumn));
        tree.spawn(Some(flex));
        build(&mut tree);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Constraints cannot Mirror both width and height")]
    fn mirroring_both_axes_is_fatal() {
        let (mut tree, root) = tree_with_root();
        let item = tree.spawn(Some(root));
        tree.set_constraints(item, Constraints::new(Dim::mirror(), Dim::mirror()));
        build(&mut tree);
    }

    #[test]
    fn hugging_flex_row_keeps_the_line_length_it_was_measured_with() {
        let (mut tree, root) = tree_with_root();
        let flex = container(
            &mut tree,
            root,
            Dim::range(0.0, 100.0),
            Dim::hug(),
            Layout {
                anchor: Anchor::TopLeft,
                ..Layout::flow(FlowType::FlexRow)
            },
        );
        let kids: Vec<Entity> = (0..2)
            .map(|_| {
                let k = tree.spawn(Some(flex));
                tree.set_constraints(k, Constraints::new(Dim::fixed(40.0), Dim::fixed(10.0)));
                k
            })
            .collect();
        // The window is narrower than the wrap bound.
        LayoutBuilder::new().build(&mut tree, Size::new(60.0, 200.0));

        let outer = tree.area(flex).unwrap();
        assert_eq!(outer, rect(0.0, 0.0, 100.0, 10.0));
        assert_eq!(tree.area(kids[0]), Some(rect(0.0, 0.0, 40.0, 10.0)));
        assert_eq!(tree.area(kids[1]), Some(rect(40.0, 0.0, 40.0, 10.0)));
        for k in kids {
            let inner = tree.area(k).unwrap();
            assert_eq!(inner.intersect(outer), inner, "{k:?} escapes its hugging parent");
        }
    }

    #[test]
    fn mirror_copies_resolved_opposite_axis() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(
            root,
            Layout {
                anchor: Anchor::TopLeft,
                ..Layout::flow(FlowType::Row)
            },
        );
        let square = tree.spawn(Some(root));
        tree.set_constraints(square, Constraints::new(Dim::mirror(), Dim::fixed(30.0)));
        let rest = tree.spawn(Some(root));
        build(&mut tree);
        assert_eq!(tree.area(square), Some(rect(0.0, 0.0, 30.0, 30.0)));
        assert_eq!(tree.area(rest), Some(rect(30.0, 0.0, 170.0, 200.0)));

        let (mut tree, root) = tree_with_root();
        let tall = tree.spawn(Some(root));
        tree.set_constraints(tall, Constraints::new(Dim::range(0.0, 80.0), Dim::mirror()));
        build(&mut tree);
        assert_eq!(tree.area(tall).unwrap().size, Size::new(80.0, 80.0));
    }

    fn deep_tree() -> (LayoutTree, Vec<Entity>) {
        let (mut tree, root) = tree_with_root();
        let a = tree.spawn(Some(root));
        let a1 = tree.spawn(Some(a));
        let a2 = tree.spawn(Some(a));
        let a1x = tree.spawn(Some(a1));
        let b = tree.spawn(Some(root));
        tree.set_layout(root, Layout::flow(FlowType::Column));
        tree.set_layout(a, Layout::flow(FlowType::Row));
        (tree, vec![root, a, a1, a2, a1x, b])
    }

    #[test]
    fn depths_are_preorder_and_enclose_subtrees() {
        let (mut tree, ids) = deep_tree();
        build(&mut tree);
        let depths: Vec<u32> = ids.iter().map(|e| tree.depth(*e).unwrap().depth).collect();
        // root, a, a1, a2, a1x, b in pre-order: root=0, a=1, a1=2, a1x=3, a2=4, b=5.
        assert_eq!(depths, vec![0, 1, 2, 4, 3, 5]);
        for &e in &ids {
            let d = tree.depth(e).unwrap();
            let leaf = tree.children_of(e).is_empty();
            assert!(d.depth <= d.max_child_depth);
            assert_eq!(d.depth == d.max_child_depth, leaf);
            for &c in tree.children_of(e) {
                let cd = tree.depth(c).unwrap();
                assert!(d.depth < cd.depth);
                assert!(d.encloses(cd.max_child_depth));
            }
        }
        assert_eq!(tree.depth(ids[0]).unwrap().max_child_depth, 5);
    }

    #[test]
    fn layout_is_idempotent() {
        let (mut tree, ids) = deep_tree();
        let mut builder = LayoutBuilder::new();
        builder.build(&mut tree, WINDOW);
        let first: Vec<_> = ids.iter().map(|e| (tree.area(*e), tree.depth(*e))).collect();
        builder.build(&mut tree, WINDOW);
        let second: Vec<_> = ids.iter().map(|e| (tree.area(*e), tree.depth(*e))).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn sizes_respect_constraints() {
        let (mut tree, root) = tree_with_root();
        tree.set_layout(root, Layout::flow(FlowType::Column));
        let bounds = [(10.0, 30.0), (0.0, 500.0), (5.0, 5.0)];
        let kids: Vec<Entity> = bounds
            .iter()
            .map(|&(min, max)| {
                let k = tree.spawn(Some(root));
                tree.set_constraints(k, Constraints::new(Dim::range(min, max), Dim::range(min, max)));
                k
            })
            .collect();
        build(&mut tree);
        for (k, (min, max)) in kids.iter().zip(bounds) {
            let size = tree.area(*k).unwrap().size;
            assert!((min..=max).contains(&size.width));
            assert!((min..=max).contains(&size.height));
        }
    }

    #[test]
    fn clip_map_follows_subtree_depths() {
        let (mut tree, root) = tree_with_root();
        let panel = tree.spawn(Some(root));
        tree.set_clip(
            panel,
            Clip {
                padding: Padding::uniform(10.0),
                ..Clip::default()
            },
        );
        let inner = tree.spawn(Some(panel));
        let after = tree.spawn(Some(root));
        let builder = build(&mut tree);
        let clips = builder.clips();
        let clip_of = |e: Entity| clips.clip_at(tree.depth(e).unwrap().depth);
        assert!(clip_of(panel).is_none());
        assert_eq!(clip_of(inner).unwrap().area, rect(10.0, 10.0, 180.0, 180.0));
        assert!(clip_of(after).is_none());
        assert!(tree.hit(inner, Point::new(100.0, 100.0), clips));
        assert!(!tree.hit(inner, Point::new(5.0, 5.0), clips));
        assert!(tree.hit(panel, Point::new(5.0, 5.0), clips));
    }

    #[test]
    fn transform_scales_about_origin_and_offsets() {
        let (mut tree, root) = tree_with_root();
        let child = tree.spawn(Some(root));
        tree.set_constraints(child, Constraints::new(Dim::range(20.0, 100.0), Dim::range(0.0, 100.0)));
        tree.set_transform(
            child,
            Transform::new(TransformParams {
                scale: Vec2::new(0.5, 0.5),
                offset: Vec2::new(3.0, -2.0),
                origin: Vec2::new(0.0, 1.0),
            }),
        );
        let sibling = tree.spawn(Some(root));
        build(&mut tree);
        // 100x100 centered at (50, 50); width 20 + 80 * 0.5, height 100 * 0.5,
        // pinned to the bottom-left corner, then offset.
        assert_eq!(tree.area(child), Some(rect(53.0, 98.0, 60.0, 50.0)));
        assert_eq!(tree.area(sibling), Some(rect(0.0, 0.0, 200.0, 200.0)));
    }

    #[test]
    fn transform_callback_runs_before_scaling() {
        let (mut tree, root) = tree_with_root();
        let child = tree.spawn(Some(root));
        tree.set_transform(
            child,
            Transform::with_callback(TransformParams::default(), |area, params| {
                area.pos.x += 10.0;
                params.scale = Vec2::new(0.5, 1.0);
            }),
        );
        let grandchild = tree.spawn(Some(child));
        build(&mut tree);
        assert_eq!(tree.area(child), Some(rect(60.0, 0.0, 100.0, 200.0)));
        assert_eq!(
            tree.area(grandchild),
            Some(rect(60.0, 0.0, 100.0, 200.0)),
            "descendants lay out inside the transformed area"
        );
    }

    #[test]
    fn detached_items_are_left_alone() {
        let (mut tree, root) = tree_with_root();
        let orphan = tree.spawn(None);
        tree.spawn(Some(orphan));
        tree.spawn(Some(root));
        build(&mut tree);
        assert_eq!(tree.area(orphan), Some(Area::ZERO));
    }

    #[test]
    fn no_root_is_a_no_op() {
        let mut tree = LayoutTree::new();
        let a = tree.spawn(None);
        LayoutBuilder::new().build(&mut tree, WINDOW);
        assert_eq!(tree.area(a), Some(Area::ZERO));
    }
}
