// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles to items.

use trellis_store::Entity;

/// Anything that stands for one item of a [`Ui`](crate::Ui).
///
/// Widgets are plain structs holding their item's [`Entity`]; layout, paint,
/// and input are driven through components, so this is the only capability a
/// widget type has to expose.
pub trait Item {
    /// The item's entity.
    fn entity(&self) -> Entity;
}

impl Item for Entity {
    fn entity(&self) -> Entity {
        *self
    }
}

impl<T: Item + ?Sized> Item for &T {
    fn entity(&self) -> Entity {
        (**self).entity()
    }
}
