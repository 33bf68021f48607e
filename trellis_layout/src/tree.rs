// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item tree: structure, components, and queries.

use alloc::vec::Vec;

use kurbo::Point;
use trellis_store::{Entities, Entity, Table};

use crate::components::{Clip, ComponentFlags, Depth, Layout, Transform, TreeNode};
use crate::constraints::Constraints;
use crate::context::ClipMap;
use crate::geometry::Area;

/// The item tree and its layout components.
///
/// Every live item has a [`TreeNode`], an [`Area`], and a [`Depth`].
/// [`Constraints`], [`Layout`], [`Transform`], and [`Clip`] are optional and
/// mirrored onto [`TreeNode::flags`]. Areas and depths are only written by the
/// [`LayoutBuilder`](crate::LayoutBuilder).
///
/// ## Example
///
/// ```rust
/// use kurbo::Size;
/// use trellis_layout::{LayoutBuilder, LayoutTree};
///
/// let mut tree = LayoutTree::new();
/// let root = tree.spawn(None);
/// tree.set_root(root);
/// let child = tree.spawn(Some(root));
///
/// LayoutBuilder::new().build(&mut tree, Size::new(320.0, 200.0));
/// assert_eq!(tree.area(child).unwrap().size, Size::new(320.0, 200.0));
/// ```
#[derive(Debug, Default)]
pub struct LayoutTree {
    entities: Entities,
    root: Option<Entity>,
    pub(crate) nodes: Table<TreeNode>,
    pub(crate) areas: Table<Area>,
    pub(crate) depths: Table<Depth>,
    pub(crate) constraints: Table<Constraints>,
    pub(crate) layouts: Table<Layout>,
    pub(crate) transforms: Table<Transform>,
    pub(crate) clips: Table<Clip>,
}

impl LayoutTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an item, appended to `parent`'s children when given.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn spawn(&mut self, parent: Option<Entity>) -> Entity {
        let entity = self.entities.alloc();
        self.nodes.insert(entity, TreeNode::default());
        self.areas.insert(entity, Area::ZERO);
        self.depths.insert(entity, Depth::default());
        if let Some(parent) = parent {
            self.add_child(parent, entity);
        }
        entity
    }

    /// Designate the item that is sized to the window.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale or has a parent.
    pub fn set_root(&mut self, root: Entity) {
        assert!(
            self.node(root).parent.is_none(),
            "the root item cannot have a parent"
        );
        self.root = Some(root);
    }

    /// The root item, if one was set and is still alive.
    #[must_use]
    pub fn root(&self) -> Option<Entity> {
        self.root.filter(|r| self.is_alive(*r))
    }

    /// Returns true if `entity` is a live item.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a detached `child` to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either id is stale or `child` already has a parent.
    pub fn add_child(&mut self, parent: Entity, child: Entity) {
        let at = self.node(parent).children.len();
        self.insert_child(parent, at, child);
    }

    /// Insert a detached `child` at position `index` among `parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics if either id is stale, `child` already has a parent or is the
    /// root, `child` is `parent` or one of its ancestors, or `index` is past
    /// the end.
    pub fn insert_child(&mut self, parent: Entity, index: usize, child: Entity) {
        assert!(
            self.node(child).parent.is_none(),
            "child is already attached; remove it first"
        );
        assert!(self.root != Some(child), "the root item cannot become a child");
        assert!(
            !self.ancestors_inclusive(parent).any(|a| a == child),
            "attaching an item below itself would create a cycle"
        );
        let children = &mut self.node_mut(parent).children;
        assert!(index <= children.len(), "child index {index} out of range");
        children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Detach `child` from `parent`, keeping it alive.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not one of `parent`'s children.
    pub fn remove_child(&mut self, parent: Entity, child: Entity) {
        let children = &mut self.node_mut(parent).children;
        let Some(pos) = children.iter().position(|c| *c == child) else {
            panic!("remove_child: item is not a child of this parent");
        };
        children.remove(pos);
        self.node_mut(child).parent = None;
    }

    /// Move the child at position `from` to position `to` among its siblings.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of range.
    pub fn move_child(&mut self, parent: Entity, from: usize, to: usize) {
        let children = &mut self.node_mut(parent).children;
        let len = children.len();
        assert!(
            from < len && to < len,
            "move_child: range {from} -> {to} is invalid for {len} children"
        );
        let child = children.remove(from);
        children.insert(to, child);
    }

    /// Remove an item and its whole subtree.
    ///
    /// Returns the removed entities, parents before children, so callers can
    /// drop rows they keep in their own tables. Stale ids remove nothing.
    pub fn destroy(&mut self, entity: Entity) -> Vec<Entity> {
        if !self.is_alive(entity) {
            return Vec::new();
        }
        if let Some(parent) = self.node(entity).parent {
            self.remove_child(parent, entity);
        }
        if self.root == Some(entity) {
            self.root = None;
        }
        let mut removed = Vec::new();
        let mut stack = alloc::vec![entity];
        while let Some(e) = stack.pop() {
            let Some(node) = self.nodes.remove(e) else {
                continue;
            };
            stack.extend(node.children.iter().rev().copied());
            self.areas.remove(e);
            self.depths.remove(e);
            self.constraints.remove(e);
            self.layouts.remove(e);
            self.transforms.remove(e);
            self.clips.remove(e);
            self.entities.free(e);
            removed.push(e);
        }
        removed
    }

    /// Parent of a live item.
    #[must_use]
    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(entity).and_then(|n| n.parent)
    }

    /// Children of a live item, or an empty slice.
    #[must_use]
    pub fn children_of(&self, entity: Entity) -> &[Entity] {
        self.nodes.get(entity).map_or(&[], |n| &n.children)
    }

    /// Structural component of a live item.
    #[must_use]
    pub fn tree_node(&self, entity: Entity) -> Option<&TreeNode> {
        self.nodes.get(entity)
    }

    /// Components attached to a live item.
    #[must_use]
    pub fn component_flags(&self, entity: Entity) -> ComponentFlags {
        self.nodes
            .get(entity)
            .map_or(ComponentFlags::empty(), |n| n.flags)
    }

    /// Mark components that live outside this tree as attached or detached.
    pub fn set_component_flag(&mut self, entity: Entity, flag: ComponentFlags, attached: bool) {
        if let Some(node) = self.nodes.get_mut(entity) {
            node.flags.set(flag, attached);
        }
    }

    /// Resolved area as of the last layout pass.
    #[must_use]
    pub fn area(&self, entity: Entity) -> Option<Area> {
        self.areas.get(entity).copied()
    }

    /// Resolved depth as of the last layout pass.
    #[must_use]
    pub fn depth(&self, entity: Entity) -> Option<Depth> {
        self.depths.get(entity).copied()
    }

    /// Depth table, for sorting other tables into paint order.
    #[must_use]
    pub fn depths(&self) -> &Table<Depth> {
        &self.depths
    }

    /// Returns true if `point` hits the item's area and is not clipped away.
    #[must_use]
    pub fn hit(&self, entity: Entity, point: Point, clips: &ClipMap) -> bool {
        let (Some(area), Some(depth)) = (self.areas.get(entity), self.depths.get(entity)) else {
            return false;
        };
        area.contains(point) && clips.visible_at(depth.depth, point)
    }

    /// Explicit constraints of an item.
    #[must_use]
    pub fn constraints(&self, entity: Entity) -> Option<&Constraints> {
        self.constraints.get(entity)
    }

    /// Attach or replace explicit constraints.
    pub fn set_constraints(&mut self, entity: Entity, constraints: Constraints) {
        if self.is_alive(entity) {
            self.constraints.insert(entity, constraints);
            self.set_component_flag(entity, ComponentFlags::CONSTRAINTS, true);
        }
    }

    /// Drop explicit constraints, reverting to Fill on both axes.
    pub fn clear_constraints(&mut self, entity: Entity) {
        self.constraints.remove(entity);
        self.set_component_flag(entity, ComponentFlags::CONSTRAINTS, false);
    }

    /// Layout policy of an item.
    #[must_use]
    pub fn layout(&self, entity: Entity) -> Option<&Layout> {
        self.layouts.get(entity)
    }

    /// Attach or replace a layout policy.
    pub fn set_layout(&mut self, entity: Entity, layout: Layout) {
        if self.is_alive(entity) {
            self.layouts.insert(entity, layout);
            self.set_component_flag(entity, ComponentFlags::LAYOUT, true);
        }
    }

    /// Drop the layout policy, reverting to a centered stack.
    pub fn clear_layout(&mut self, entity: Entity) {
        self.layouts.remove(entity);
        self.set_component_flag(entity, ComponentFlags::LAYOUT, false);
    }

    /// Transform of an item.
    #[must_use]
    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    /// Mutable transform of an item.
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.transforms.get_mut(entity)
    }

    /// Attach or replace a transform.
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) {
        if self.is_alive(entity) {
            self.transforms.insert(entity, transform);
            self.set_component_flag(entity, ComponentFlags::TRANSFORM, true);
        }
    }

    /// Drop the transform.
    pub fn clear_transform(&mut self, entity: Entity) {
        self.transforms.remove(entity);
        self.set_component_flag(entity, ComponentFlags::TRANSFORM, false);
    }

    /// Clip of an item.
    #[must_use]
    pub fn clip(&self, entity: Entity) -> Option<&Clip> {
        self.clips.get(entity)
    }

    /// Attach or replace a clip.
    pub fn set_clip(&mut self, entity: Entity, clip: Clip) {
        if self.is_alive(entity) {
            self.clips.insert(entity, clip);
            self.set_component_flag(entity, ComponentFlags::CLIP, true);
        }
    }

    /// Drop the clip.
    pub fn clear_clip(&mut self, entity: Entity) {
        self.clips.remove(entity);
        self.set_component_flag(entity, ComponentFlags::CLIP, false);
    }

    /// Iterate `entity` and its ancestors, innermost first.
    pub fn ancestors_inclusive(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        core::iter::successors(Some(entity), |e| self.parent_of(*e))
    }

    /// Access a node; panics if `entity` is stale.
    fn node(&self, entity: Entity) -> &TreeNode {
        self.nodes.get(entity).expect("stale Entity")
    }

    /// Access a node mutably; panics if `entity` is stale.
    fn node_mut(&mut self, entity: Entity) -> &mut TreeNode {
        self.nodes.get_mut(entity).expect("stale Entity")
    }
}
