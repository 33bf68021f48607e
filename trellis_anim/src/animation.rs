// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ratio animations.

/// Relative slack when comparing accumulated time against the duration, so
/// that ticking by exact fractions of the duration lands on the end.
const END_SLACK: f64 = 1e-9;

/// How an animation continues after reaching its end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationMode {
    /// Run once and finish at ratio 1.
    #[default]
    Single,
    /// Restart from 0 every duration; never finishes.
    Loop,
    /// Run to 1, back to 0, and so on; never finishes.
    PingPong,
}

/// What a tick did to an animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimationStatus {
    /// Not running.
    Idle,
    /// First tick after [`Animation::start`].
    Start,
    /// Advanced.
    Running,
    /// Reached its end during this tick; reported once.
    Finish,
}

/// A ratio moving from 0 to 1 over `duration` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    duration: f64,
    mode: AnimationMode,
    elapsed: f64,
    ratio: f64,
    running: bool,
    starting: bool,
}

impl Animation {
    /// Create a stopped animation.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is not a positive finite number.
    #[must_use]
    pub fn new(duration: f64, mode: AnimationMode) -> Self {
        assert!(
            duration.is_finite() && duration > 0.0,
            "animation duration must be positive, got {duration}"
        );
        Self {
            duration,
            mode,
            elapsed: 0.0,
            ratio: 0.0,
            running: false,
            starting: false,
        }
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Continuation mode.
    #[must_use]
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// Current ratio in `[0, 1]`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Returns true between [`Animation::start`] and the end or [`Animation::stop`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Interpolate between `from` and `to` at the current ratio.
    #[must_use]
    pub fn lerp(&self, from: f64, to: f64) -> f64 {
        from + (to - from) * self.ratio
    }

    /// Restart from ratio 0.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.ratio = 0.0;
        self.running = true;
        self.starting = true;
    }

    /// Stop where it is.
    pub fn stop(&mut self) {
        self.running = false;
        self.starting = false;
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> AnimationStatus {
        if !self.running {
            return AnimationStatus::Idle;
        }
        self.elapsed += dt.max(0.0);
        let at_end = self.elapsed >= self.duration * (1.0 - END_SLACK);

        let status = match self.mode {
            AnimationMode::Single if at_end => {
                self.elapsed = self.duration;
                self.ratio = 1.0;
                self.running = false;
                self.starting = false;
                log::trace!("animation finished after {}s", self.duration);
                return AnimationStatus::Finish;
            }
            AnimationMode::Single => {
                self.ratio = self.elapsed / self.duration;
                AnimationStatus::Running
            }
            AnimationMode::Loop => {
                self.elapsed %= self.duration;
                self.ratio = self.elapsed / self.duration;
                AnimationStatus::Running
            }
            AnimationMode::PingPong => {
                self.elapsed %= 2.0 * self.duration;
                let phase = self.elapsed / self.duration;
                self.ratio = if phase <= 1.0 { phase } else { 2.0 - phase };
                AnimationStatus::Running
            }
        };

        if self.starting {
            self.starting = false;
            AnimationStatus::Start
        } else {
            status
        }
    }
}
