// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame invalidation tracking.
//!
//! Invalidation is two-level. The tree-dirty flag gates rerunning layout and
//! painting; one dirty bit per frame in flight gates refreshing that frame's
//! draw data. An invalidation therefore costs one layout and paint, followed by
//! one cheap upload for each other buffered frame as it comes around.

/// What the current frame needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameWork {
    /// The frame's draw data is current; draw it as is.
    Reuse,
    /// The tree is unchanged but this frame's buffers predate the last paint;
    /// upload the current painter output.
    Upload,
    /// Lay out, paint, and upload.
    Relayout,
}

/// Per-frame dirty bits plus the tree-dirty flag.
#[derive(Clone, Debug)]
pub struct FrameTracker {
    frames_in_flight: u32,
    dirty: u32,
    tree_dirty: bool,
    current: u32,
}

impl FrameTracker {
    /// Track `frames_in_flight` buffered frames, all initially dirty.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= frames_in_flight <= 32`.
    #[must_use]
    pub fn new(frames_in_flight: u32) -> Self {
        assert!(
            (1..=32).contains(&frames_in_flight),
            "frames_in_flight must be between 1 and 32, got {frames_in_flight}"
        );
        let mut tracker = Self {
            frames_in_flight,
            dirty: 0,
            tree_dirty: false,
            current: 0,
        };
        tracker.invalidate();
        tracker
    }

    fn all_frames(&self) -> u32 {
        u32::MAX >> (32 - self.frames_in_flight)
    }

    /// Mark the tree and every buffered frame dirty.
    pub fn invalidate(&mut self) {
        self.dirty = self.all_frames();
        self.tree_dirty = true;
    }

    /// Returns true if layout and paint must rerun.
    #[must_use]
    pub fn is_tree_dirty(&self) -> bool {
        self.tree_dirty
    }

    /// Returns true if the current frame's draw data is stale.
    #[must_use]
    pub fn is_frame_dirty(&self) -> bool {
        self.dirty & (1 << self.current) != 0
    }

    /// Index of the current frame in flight.
    #[must_use]
    pub fn current_frame(&self) -> u32 {
        self.current
    }

    /// Number of frames in flight.
    #[must_use]
    pub fn frames_in_flight(&self) -> u32 {
        self.frames_in_flight
    }

    /// Decide what the current frame needs.
    #[must_use]
    pub fn begin_frame(&self) -> FrameWork {
        if !self.is_frame_dirty() {
            FrameWork::Reuse
        } else if self.tree_dirty {
            FrameWork::Relayout
        } else {
            FrameWork::Upload
        }
    }

    /// Record that the current frame is up to date and move to the next one.
    pub fn finish_frame(&mut self) {
        self.tree_dirty = false;
        self.dirty &= !(1 << self.current);
        self.current = (self.current + 1) % self.frames_in_flight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tracker: &mut FrameTracker) -> FrameWork {
        let work = tracker.begin_frame();
        tracker.finish_frame();
        work
    }

    #[test]
    fn invalidation_relayouts_once_then_uploads_other_frames() {
        let mut tracker = FrameTracker::new(3);
        assert_eq!(run(&mut tracker), FrameWork::Relayout);
        assert_eq!(run(&mut tracker), FrameWork::Upload);
        assert_eq!(run(&mut tracker), FrameWork::Upload);
        assert_eq!(run(&mut tracker), FrameWork::Reuse);
        assert_eq!(run(&mut tracker), FrameWork::Reuse);

        tracker.invalidate();
        assert!(tracker.is_tree_dirty());
        assert_eq!(run(&mut tracker), FrameWork::Relayout);
        assert!(!tracker.is_tree_dirty());
        assert_eq!(run(&mut tracker), FrameWork::Upload);
    }

    #[test]
    fn single_buffered_frames_never_upload() {
        let mut tracker = FrameTracker::new(1);
        assert_eq!(run(&mut tracker), FrameWork::Relayout);
        assert_eq!(run(&mut tracker), FrameWork::Reuse);
        tracker.invalidate();
        assert_eq!(run(&mut tracker), FrameWork::Relayout);
        assert_eq!(tracker.current_frame(), 0);
    }

    #[test]
    fn thirty_two_frames_fit_the_mask() {
        let mut tracker = FrameTracker::new(32);
        assert_eq!(run(&mut tracker), FrameWork::Relayout);
        for _ in 1..32 {
            assert_eq!(run(&mut tracker), FrameWork::Upload);
        }
        assert_eq!(run(&mut tracker), FrameWork::Reuse);
    }

    #[test]
    #[should_panic(expected = "frames_in_flight must be between 1 and 32")]
    fn zero_frames_is_rejected() {
        let _ = FrameTracker::new(0);
    }
}
