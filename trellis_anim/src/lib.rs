// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Anim: frame-driven animations and timers.
//!
//! Both are advanced by the elapsed time of each UI tick, in seconds, and
//! report what happened during that tick.
//!
//! - [`Animation`]: a ratio running from 0 to 1 over a duration, once
//!   ([`AnimationMode::Single`]), repeatedly ([`AnimationMode::Loop`]), or back
//!   and forth ([`AnimationMode::PingPong`]).
//! - [`Timer`]: fires every interval, once or repeatedly.
//!
//! ```rust
//! use trellis_anim::{Animation, AnimationMode, AnimationStatus};
//!
//! let mut fade = Animation::new(0.3, AnimationMode::Single);
//! fade.start();
//! assert_eq!(fade.tick(0.1), AnimationStatus::Start);
//! assert_eq!(fade.tick(0.1), AnimationStatus::Running);
//! assert_eq!(fade.tick(0.1), AnimationStatus::Finish);
//! assert_eq!(fade.ratio(), 1.0);
//! assert_eq!(fade.tick(0.1), AnimationStatus::Idle);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod animation;
mod timer;

pub use animation::{Animation, AnimationMode, AnimationStatus};
pub use timer::Timer;
