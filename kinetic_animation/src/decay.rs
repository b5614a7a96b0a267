// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fling deceleration.
//!
//! A fling starts with a release velocity `v` and decays exponentially with a
//! friction `k`: the speed after `t` seconds is `|v| * e^(-k*t)` and the
//! displacement is `v / k * (1 - e^(-k*t))`, so position grows monotonically
//! towards `v / k`. The fling stops once the speed drops below
//! [`FlingScroller::STOP_VELOCITY`].

use core::f64::consts::E;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

/// Two-dimensional fling with exponential decay.
///
/// ```
/// use kinetic_animation::FlingScroller;
/// use kurbo::Vec2;
///
/// let mut fling = FlingScroller::default();
/// fling.fling(Vec2::new(1000.0, 0.0));
/// assert!(fling.compute(0));
/// assert!(fling.compute(100));
/// let moved = fling.offset().x;
/// assert!(moved > 0.0 && moved < 100.0, "slower than the release speed");
/// assert!(fling.compute(10_000));
/// assert!(fling.is_finished());
/// assert!(!fling.compute(10_010));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FlingScroller {
    friction: f64,
    velocity: Vec2,
    start_ms: Option<u64>,
    offset: Vec2,
    finished: bool,
}

impl Default for FlingScroller {
    fn default() -> Self {
        Self::with_friction(Self::DEFAULT_FRICTION)
    }
}

impl FlingScroller {
    /// Default decay rate, per second.
    pub const DEFAULT_FRICTION: f64 = 4.2;

    /// Speed below which a fling stops, in px/s.
    pub const STOP_VELOCITY: f64 = 20.0;

    /// Creates a finished scroller with the given decay rate, per second.
    ///
    /// Non-positive or non-finite rates fall back to
    /// [`DEFAULT_FRICTION`](Self::DEFAULT_FRICTION).
    #[must_use]
    pub fn with_friction(friction: f64) -> Self {
        let friction = if friction.is_finite() && friction > 0.0 {
            friction
        } else {
            Self::DEFAULT_FRICTION
        };
        Self {
            friction,
            velocity: Vec2::ZERO,
            start_ms: None,
            offset: Vec2::ZERO,
            finished: true,
        }
    }

    /// Starts a fling with `velocity` in px/s, from offset zero.
    ///
    /// The clock starts at the next [`compute`](Self::compute).
    pub fn fling(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.start_ms = None;
        self.offset = Vec2::ZERO;
        self.finished = false;
    }

    /// Stops the fling where it is.
    pub fn force_finish(&mut self) {
        self.finished = true;
    }

    /// Advances the fling to `now_ms`.
    ///
    /// Returns `false` if the fling had already finished. The tick that
    /// reaches the end of the fling returns `true` and finishes it.
    pub fn compute(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start) as f64 / 1000.0;
        let duration = self.duration_secs();
        if elapsed >= duration {
            self.offset = self.offset_at(duration);
            self.finished = true;
        } else {
            self.offset = self.offset_at(elapsed);
        }
        true
    }

    /// Returns `true` once the fling settled or was stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Displacement since the fling started.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Displacement at which the fling will settle.
    #[must_use]
    pub fn final_offset(&self) -> Vec2 {
        self.offset_at(self.duration_secs())
    }

    /// Total fling duration, in milliseconds.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "durations are a few seconds at most"
    )]
    pub fn duration_ms(&self) -> u64 {
        (self.duration_secs() * 1000.0).ceil() as u64
    }

    fn duration_secs(&self) -> f64 {
        let speed = self.velocity.hypot();
        if speed.is_finite() && speed > Self::STOP_VELOCITY {
            (speed / Self::STOP_VELOCITY).ln() / self.friction
        } else {
            0.0
        }
    }

    fn offset_at(&self, secs: f64) -> Vec2 {
        let decay = E.powf(-self.friction * secs);
        self.velocity * ((1.0 - decay) / self.friction)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::FlingScroller;

    fn run(fling: &mut FlingScroller, step_ms: u64) {
        let mut now = 0;
        while fling.compute(now) {
            now += step_ms;
        }
    }

    #[test]
    fn slow_fling_ends_at_once() {
        let mut fling = FlingScroller::default();
        fling.fling(Vec2::new(5.0, 0.0));
        assert!(fling.compute(0), "first tick reports progress");
        assert!(fling.is_finished(), "slow fling kept running");
        assert_eq!(fling.offset(), Vec2::ZERO, "slow fling moved");
        assert!(!fling.compute(10), "finished fling reported progress");
    }

    #[test]
    fn settles_at_final_offset() {
        let mut fling = FlingScroller::default();
        fling.fling(Vec2::new(3000.0, -4000.0));
        let expected = fling.final_offset();
        run(&mut fling, 10);
        assert!((fling.offset() - expected).hypot() < 1e-9, "{:?}", fling.offset());
        // Direction is kept.
        assert!(fling.offset().x > 0.0 && fling.offset().y < 0.0, "direction changed");
        // Close to v / k.
        assert!((fling.offset().x - 3000.0 / 4.2).abs() < 5.0, "{:?}", fling.offset());
    }

    #[test]
    fn motion_is_monotonic_and_decelerating() {
        let mut fling = FlingScroller::default();
        fling.fling(Vec2::new(2000.0, 0.0));
        let mut prev = 0.0;
        let mut prev_step = f64::INFINITY;
        let mut now = 0;
        while fling.compute(now) {
            let x = fling.offset().x;
            let step = x - prev;
            assert!(step >= 0.0, "moved backwards at {now}");
            if now > 0 {
                assert!(step <= prev_step + 1e-9, "accelerated at {now}");
                prev_step = step;
            }
            prev = x;
            now += 10;
        }
        assert!(now >= fling.duration_ms(), "ended early at {now}");
    }

    #[test]
    fn force_finish_freezes_offset() {
        let mut fling = FlingScroller::with_friction(-1.0);
        fling.fling(Vec2::new(0.0, 1000.0));
        fling.compute(0);
        fling.compute(50);
        let offset = fling.offset();
        fling.force_finish();
        assert!(!fling.compute(100), "stopped fling reported progress");
        assert_eq!(fling.offset(), offset, "stopped fling moved");
    }
}
