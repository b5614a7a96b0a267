// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollers driven through the scheduler by a simulated host.

use kinetic_animation::{AnimationScheduler, FlingScroller, StateScroller, Tick};
use kurbo::Vec2;

/// Runs host frames every `frame_ms` until the scheduler goes idle, calling
/// `step` on every scheduled step. Returns the number of steps.
fn drive(frame_ms: u64, mut step: impl FnMut(u64) -> bool) -> usize {
    let mut scheduler = AnimationScheduler::default();
    scheduler.request();
    let mut steps = 0;
    let mut now = 1_000;
    while scheduler.is_scheduled() {
        if scheduler.begin_tick(now) == Tick::Run {
            steps += 1;
            let proceed = step(now);
            scheduler.end_tick(proceed);
        }
        now += frame_ms;
        assert!(steps < 10_000, "animation never settled");
    }
    steps
}

#[test]
fn fast_host_is_throttled() {
    let mut progress = StateScroller::default();
    progress.start(0.0, 1.0, 300);
    let steps = drive(1, |now| {
        progress.compute(now);
        !progress.is_finished()
    });
    // One step per 10 ms over 300 ms, plus the anchoring step.
    assert_eq!(steps, 31, "unexpected step count");
    assert_eq!(progress.current(), 1.0, "did not reach the end");
}

#[test]
fn fling_settles_regardless_of_frame_rate() {
    let mut finals = Vec::new();
    for frame_ms in [10, 16, 33] {
        let mut fling = FlingScroller::default();
        fling.fling(Vec2::new(-2500.0, 600.0));
        drive(frame_ms, |now| fling.compute(now) && !fling.is_finished());
        assert!(fling.is_finished(), "fling still running at {frame_ms} ms frames");
        finals.push(fling.offset());
    }
    for offset in &finals {
        assert!(
            (*offset - finals[0]).hypot() < 1e-9,
            "final offsets differ: {finals:?}"
        );
    }
}
