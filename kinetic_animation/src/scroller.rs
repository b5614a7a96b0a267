// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eased scalar animation over a fixed duration.

use crate::ease::Ease;

/// Animates a scalar from a start to a final value over a fixed duration.
///
/// The clock starts at the first [`compute`](Self::compute) after
/// [`start`](Self::start), so the caller's clock does not need to be known
/// when the animation is started.
///
/// ```
/// use kinetic_animation::StateScroller;
///
/// let mut scroller = StateScroller::default();
/// scroller.start(0.0, 1.0, 300);
/// scroller.compute(1_000);
/// assert_eq!(scroller.current(), 0.0);
/// scroller.compute(1_150);
/// assert!((scroller.current() - 0.5).abs() < 1e-9);
/// scroller.compute(1_300);
/// assert!(scroller.is_finished());
/// assert_eq!(scroller.current(), 1.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StateScroller {
    ease: Ease,
    duration_ms: u64,
    start_ms: Option<u64>,
    start_value: f64,
    final_value: f64,
    current: f64,
    finished: bool,
}

impl Default for StateScroller {
    fn default() -> Self {
        Self::new(Ease::default())
    }
}

impl StateScroller {
    /// Creates a finished scroller using `ease`.
    #[must_use]
    pub fn new(ease: Ease) -> Self {
        Self {
            ease,
            duration_ms: 0,
            start_ms: None,
            start_value: 0.0,
            final_value: 0.0,
            current: 0.0,
            finished: true,
        }
    }

    /// Starts animating from `start_value` to `final_value`.
    pub fn start(&mut self, start_value: f64, final_value: f64, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.start_ms = None;
        self.start_value = start_value;
        self.final_value = final_value;
        self.current = start_value;
        self.finished = false;
    }

    /// Stops the animation where it is.
    pub fn force_finish(&mut self) {
        self.finished = true;
    }

    /// Advances the animation to `now_ms`.
    ///
    /// Reaching the duration sets the final value and finishes the animation.
    pub fn compute(&mut self, now_ms: u64) {
        if self.finished {
            return;
        }
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start);
        if elapsed >= self.duration_ms {
            self.finished = true;
            self.current = self.final_value;
            return;
        }
        let t = self.ease.apply(elapsed as f64 / self.duration_ms as f64);
        self.current = self.start_value + (self.final_value - self.start_value) * t;
    }

    /// Returns `true` once the animation reached its final value or was
    /// stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current value.
    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }
}
