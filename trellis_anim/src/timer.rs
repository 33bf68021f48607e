// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interval timers.

/// Fires every `interval` seconds while running.
#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    interval: f64,
    repeat: bool,
    elapsed: f64,
    running: bool,
}

impl Timer {
    /// Create a stopped timer.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is not a positive finite number.
    #[must_use]
    pub fn new(interval: f64, repeat: bool) -> Self {
        assert!(
            interval.is_finite() && interval > 0.0,
            "timer interval must be positive, got {interval}"
        );
        Self {
            interval,
            repeat,
            elapsed: 0.0,
            running: false,
        }
    }

    /// Interval in seconds.
    #[must_use]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Returns true if the timer keeps firing after the first time.
    #[must_use]
    pub fn repeats(&self) -> bool {
        self.repeat
    }

    /// Returns true while counting.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start counting from zero.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Stop counting.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by `dt` seconds; returns how many times the timer fired.
    ///
    /// A one-shot timer fires at most once and then stops.
    pub fn tick(&mut self, dt: f64) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.interval {
            return 0;
        }
        if !self.repeat {
            self.running = false;
            self.elapsed = 0.0;
            return 1;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "elapsed >= interval > 0, so the quotient is a positive whole count."
        )]
        let fired = (self.elapsed / self.interval) as u32;
        self.elapsed -= f64::from(fired) * self.interval;
        fired
    }
}
