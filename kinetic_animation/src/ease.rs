// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for state animations.

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Maps linear animation progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Starts and ends slowly, fastest in the middle (a half cosine wave).
    #[default]
    AccelerateDecelerate,
    /// Starts fast and slows down towards the end.
    OutCubic,
}

impl Ease {
    /// Applies the curve to `t`, clamped to `0..=1`.
    ///
    /// Every curve maps `0` to `0` and `1` to `1`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}
