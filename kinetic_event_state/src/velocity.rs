// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release velocity estimation for fling gestures.
//!
//! Velocity is derived from the kinetic energy imparted by the recent
//! movement (the "impulse" strategy): each segment between two samples adds
//! or removes energy, and the result is converted back into a speed. Only
//! samples from the last [`HORIZON_MS`] are used, and a gap of more than
//! [`ASSUME_STOPPED_MS`] between samples means the pointer had stopped.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Ring buffer size.
const HISTORY_SIZE: usize = 20;

/// Only samples this recent contribute to the velocity.
pub const HORIZON_MS: u64 = 100;

/// A gap longer than this between samples resets the estimate.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: u64,
    pos: Point,
}

/// Tracks recent pointer positions and estimates their velocity in px/s.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }
}

impl VelocityTracker {
    /// Records a position.
    pub fn add(&mut self, time_ms: u64, pos: Point) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, pos });
    }

    /// Forgets all samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Estimated velocity, in px/s. Zero with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        let Some(newest) = self.samples[self.index] else {
            return Vec2::ZERO;
        };

        // Newest first, as (age in ms, position).
        let mut recent = [(0.0, Point::ZERO); HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.index;
        let mut newer = newest;
        while let Some(sample) = self.samples[index] {
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = newer.time_ms.abs_diff(sample.time_ms);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            recent[count] = (age as f64, sample.pos);
            newer = sample;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return Vec2::ZERO;
        }
        let samples = &recent[..count];
        Vec2::new(
            impulse_velocity(samples, |p| p.x),
            impulse_velocity(samples, |p| p.y),
        ) * 1000.0
    }
}

/// Velocity along one axis, in px/ms. `samples` are ordered newest first.
fn impulse_velocity(samples: &[(f64, Point)], axis: impl Fn(Point) -> f64) -> f64 {
    let mut work = 0.0;
    let oldest = samples.len() - 1;
    for i in (1..=oldest).rev() {
        let (older_age, older_pos) = samples[i];
        let (newer_age, newer_pos) = samples[i - 1];
        if older_age == newer_age {
            continue;
        }
        let v_curr = (axis(newer_pos) - axis(older_pos)) / (older_age - newer_age);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    energy_to_velocity(work)
}

fn energy_to_velocity(energy: f64) -> f64 {
    let speed = (2.0 * energy.abs()).sqrt();
    if energy < 0.0 { -speed } else { speed }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::VelocityTracker;

    #[test]
    fn empty_and_single_sample_are_still() {
        let mut tracker = VelocityTracker::default();
        assert_eq!(tracker.velocity().x, 0.0);
        tracker.add(0, Point::ZERO);
        assert_eq!(tracker.velocity().y, 0.0);
    }

    #[test]
    fn constant_speed_is_recovered() {
        let mut tracker = VelocityTracker::default();
        for i in 0..10_u32 {
            // 2 px/ms to the right, 1 px/ms up.
            tracker.add(u64::from(i) * 10, Point::new(f64::from(i) * 20.0, -f64::from(i) * 10.0));
        }
        let velocity = tracker.velocity();
        assert!((velocity.x - 2000.0).abs() < 1.0, "{velocity:?}");
        assert!((velocity.y + 1000.0).abs() < 1.0, "{velocity:?}");
    }

    #[test]
    fn pause_before_release_means_stopped() {
        let mut tracker = VelocityTracker::default();
        tracker.add(0, Point::ZERO);
        tracker.add(10, Point::new(50.0, 0.0));
        tracker.add(80, Point::new(50.0, 0.0));
        assert_eq!(tracker.velocity().x, 0.0);
    }

    #[test]
    fn reset_forgets_samples() {
        let mut tracker = VelocityTracker::default();
        tracker.add(0, Point::ZERO);
        tracker.add(10, Point::new(50.0, 0.0));
        tracker.reset();
        tracker.add(20, Point::new(80.0, 0.0));
        assert_eq!(tracker.velocity().x, 0.0);
    }
}
