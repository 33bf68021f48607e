// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Startup configuration.

use kurbo::Size;

/// DPI that corresponds to a scale factor of 1.
pub const BASE_DPI: f64 = 96.0;

/// Initial window state and buffering of a [`Ui`](crate::Ui).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UiConfig {
    /// Window size in pixels; the root item always spans it.
    pub window_size: Size,
    /// Window DPI.
    pub dpi: f64,
    /// Number of frames the renderer keeps in flight, between 1 and 32.
    pub frames_in_flight: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: Size::new(800.0, 600.0),
            dpi: BASE_DPI,
            frames_in_flight: 2,
        }
    }
}

impl UiConfig {
    /// Scale factor relative to [`BASE_DPI`].
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.dpi / BASE_DPI
    }
}
