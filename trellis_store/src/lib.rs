// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Store: generational entities and per-component tables.
//!
//! Every item of a Trellis UI tree is an [`Entity`]. Components are kept in one
//! [`Table`] per component type: a dense array of values plus an
//! entity→index map, the classic sparse-set layout. Layout and event code
//! walk tables densely and look up individual rows by entity.
//!
//! - [`Entities`]: allocator handing out generational [`Entity`] handles and
//!   recycling freed slots.
//! - [`Table`]: dense storage with `O(1)` lookup by entity, lookup by dense
//!   index, a reverse index→entity map ([`Table::entities`]), and stable
//!   re-sorting with a caller comparator ([`Table::sort_by`]).
//!
//! ```rust
//! use trellis_store::{Entities, Table};
//!
//! let mut entities = Entities::new();
//! let a = entities.alloc();
//! let b = entities.alloc();
//!
//! let mut depth: Table<u32> = Table::new();
//! depth.insert(a, 3);
//! depth.insert(b, 1);
//! depth.sort_by_key(|_, d| *d);
//! assert_eq!(depth.entities(), &[b, a]);
//! assert_eq!(depth.get(a), Some(&3));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod entity;
mod table;

pub use entity::{Entities, Entity};
pub use table::Table;
