// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse-set component table.

use alloc::vec::Vec;
use core::cmp::Ordering;

use hashbrown::HashMap;

use crate::Entity;

/// Dense storage of one component type keyed by [`Entity`].
///
/// Rows are kept in a dense array in a caller-controlled order. Insertion
/// appends, removal preserves the order of the remaining rows, and
/// [`Table::sort_by`] re-orders rows stably. The dense index of a row is only
/// meaningful until the next structural change or sort.
pub struct Table<T> {
    values: Vec<T>,
    entities: Vec<Entity>,
    index: HashMap<Entity, usize>,
}

impl<T> core::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("len", &self.values.len())
            .field("entities", &self.entities)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Insert or replace the row for `entity`, returning the previous value.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&i) = self.index.get(&entity) {
            return Some(core::mem::replace(&mut self.values[i], value));
        }
        self.index.insert(entity, self.values.len());
        self.values.push(value);
        self.entities.push(entity);
        None
    }

    /// Remove the row for `entity`, keeping the relative order of the rest.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let i = self.index.remove(&entity)?;
        let value = self.values.remove(i);
        self.entities.remove(i);
        for (offset, e) in self.entities[i..].iter().enumerate() {
            self.index.insert(*e, i + offset);
        }
        Some(value)
    }

    /// Returns true if `entity` has a row.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Dense index of the row for `entity`.
    #[must_use]
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.index.get(&entity).copied()
    }

    /// Row for `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index.get(&entity).map(|&i| &self.values[i])
    }

    /// Mutable row for `entity`.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let i = *self.index.get(&entity)?;
        Some(&mut self.values[i])
    }

    /// Row at a dense index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// Mutable row at a dense index.
    pub fn get_by_index_mut(&mut self, index: usize) -> Option<&mut T> {
        self.values.get_mut(index)
    }

    /// Entity owning the row at a dense index.
    #[must_use]
    pub fn entity_at(&self, index: usize) -> Option<Entity> {
        self.entities.get(index).copied()
    }

    /// The dense index → entity map.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate rows in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterate rows mutably in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    /// Values in dense order.
    pub fn values_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.values.clear();
        self.entities.clear();
        self.index.clear();
    }

    /// Stable re-sort of the rows with a caller comparator.
    pub fn sort_by(&mut self, mut compare: impl FnMut((Entity, &T), (Entity, &T)) -> Ordering) {
        let mut rows: Vec<(Entity, T)> = self
            .entities
            .drain(..)
            .zip(self.values.drain(..))
            .collect();
        rows.sort_by(|a, b| compare((a.0, &a.1), (b.0, &b.1)));
        for (i, (entity, value)) in rows.into_iter().enumerate() {
            self.index.insert(entity, i);
            self.entities.push(entity);
            self.values.push(value);
        }
    }

    /// Stable re-sort of the rows by a key.
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(Entity, &T) -> K) {
        self.sort_by(|a, b| key(a.0, a.1).cmp(&key(b.0, b.1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entities;
    use alloc::vec;

    #[test]
    fn insert_replaces_existing_row() {
        let mut entities = Entities::new();
        let a = entities.alloc();
        let mut table = Table::new();
        assert_eq!(table.insert(a, 1), None);
        assert_eq!(table.insert(a, 2), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(a), Some(&2));
    }

    #[test]
    fn remove_keeps_order_and_index() {
        let mut entities = Entities::new();
        let ids: Vec<Entity> = (0..4).map(|_| entities.alloc()).collect();
        let mut table = Table::new();
        for (i, e) in ids.iter().enumerate() {
            table.insert(*e, i);
        }
        assert_eq!(table.remove(ids[1]), Some(1));
        assert_eq!(table.entities(), &[ids[0], ids[2], ids[3]]);
        assert_eq!(table.index_of(ids[3]), Some(2));
        assert_eq!(table.get(ids[3]), Some(&3));
        assert_eq!(table.get_by_index(1), Some(&2));
        assert!(table.remove(ids[1]).is_none());
    }

    #[test]
    fn sort_is_stable_and_reindexes() {
        let mut entities = Entities::new();
        let ids: Vec<Entity> = (0..5).map(|_| entities.alloc()).collect();
        let mut table = Table::new();
        for (e, key) in ids.iter().zip([2, 1, 2, 0, 1]) {
            table.insert(*e, key);
        }
        table.sort_by_key(|_, k| *k);
        assert_eq!(table.entities(), &[ids[3], ids[1], ids[4], ids[0], ids[2]]);
        for (i, e) in table.entities().iter().enumerate() {
            assert_eq!(table.index_of(*e), Some(i));
        }

        table.sort_by(|a, b| b.1.cmp(a.1));
        let keys: Vec<i32> = table.iter().map(|(_, k)| *k).collect();
        assert_eq!(keys, vec![2, 2, 1, 1, 0]);
        assert_eq!(table.entity_at(0), Some(ids[0]), "ties keep prior order");
    }
}
