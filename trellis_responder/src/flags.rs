// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler results.

bitflags::bitflags! {
    /// What a handler wants done after it ran.
    ///
    /// The empty set stops the event without redrawing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// Offer the event to the next handler in depth order.
        const PROPAGATE = 1 << 0;
        /// Mark the frame dirty.
        const INVALIDATE = 1 << 1;
        /// Route further events of this category to this item only.
        const LOCK = 1 << 2;
    }
}

impl EventFlags {
    /// Stop the event here.
    pub const STOP: Self = Self::empty();
    /// Redraw, and keep offering the event.
    pub const INVALIDATE_AND_PROPAGATE: Self = Self::INVALIDATE.union(Self::PROPAGATE);
    /// Redraw, stop, and capture the category.
    pub const INVALIDATE_AND_LOCK: Self = Self::INVALIDATE.union(Self::LOCK);

    /// Returns true if the event continues to the next handler.
    #[must_use]
    pub const fn propagates(self) -> bool {
        self.contains(Self::PROPAGATE)
    }

    /// Returns true if the frame must be redrawn.
    #[must_use]
    pub const fn invalidates(self) -> bool {
        self.contains(Self::INVALIDATE)
    }

    /// Returns true if the handler captures its category.
    #[must_use]
    pub const fn locks(self) -> bool {
        self.contains(Self::LOCK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_combinations() {
        assert!(!EventFlags::STOP.propagates());
        assert!(!EventFlags::STOP.invalidates());
        assert!(EventFlags::INVALIDATE_AND_PROPAGATE.propagates());
        assert!(EventFlags::INVALIDATE_AND_PROPAGATE.invalidates());
        assert!(EventFlags::INVALIDATE_AND_LOCK.locks());
        assert!(!EventFlags::INVALIDATE_AND_LOCK.propagates());
    }
}
