// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-cadence frame scheduling.
//!
//! The scheduler does not own a clock or a thread. The host calls
//! [`AnimationScheduler::begin_tick`] from its frame callback, runs the
//! animation step when told to, and reports with
//! [`AnimationScheduler::end_tick`] whether anything is still moving. An
//! optional frame requester lets the scheduler ask the host for the next
//! frame.

use alloc::boxed::Box;
use core::fmt;

/// Callback asking the host for a frame `delay_ms` from now.
pub type FrameRequester = Box<dyn FnMut(u64)>;

/// Decision for a host frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Nothing is scheduled.
    Idle,
    /// Less than a frame period passed since the previous step; stay
    /// scheduled and try again on a later frame.
    Wait,
    /// Run one animation step.
    Run,
}

/// Drives animation steps at most once per [`FRAME_MS`](Self::FRAME_MS).
pub struct AnimationScheduler {
    frame_ms: u64,
    scheduled: bool,
    last_step_ms: Option<u64>,
    requester: Option<FrameRequester>,
}

impl fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("frame_ms", &self.frame_ms)
            .field("scheduled", &self.scheduled)
            .field("last_step_ms", &self.last_step_ms)
            .finish_non_exhaustive()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::with_frame_period(Self::FRAME_MS)
    }
}

impl AnimationScheduler {
    /// Default step period, in milliseconds.
    pub const FRAME_MS: u64 = 10;

    /// Creates an idle scheduler stepping at most once per `frame_ms`.
    #[must_use]
    pub fn with_frame_period(frame_ms: u64) -> Self {
        Self {
            frame_ms,
            scheduled: false,
            last_step_ms: None,
            requester: None,
        }
    }

    /// Installs the callback used to ask the host for frames.
    pub fn set_frame_requester(&mut self, requester: Option<FrameRequester>) {
        self.requester = requester;
    }

    /// Schedules a step. Does nothing if one is already scheduled.
    pub fn request(&mut self) {
        if self.scheduled {
            return;
        }
        self.scheduled = true;
        if let Some(requester) = self.requester.as_mut() {
            requester(self.frame_ms);
        }
    }

    /// Drops a scheduled step. The next request starts a fresh cadence.
    pub fn cancel(&mut self) {
        self.scheduled = false;
        self.last_step_ms = None;
    }

    /// Returns `true` while a step is scheduled.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Decides what to do with a host frame at `now_ms`.
    ///
    /// On [`Tick::Run`] the scheduled step is consumed; call
    /// [`end_tick`](Self::end_tick) after running it. On [`Tick::Wait`] the
    /// next frame is requested again.
    pub fn begin_tick(&mut self, now_ms: u64) -> Tick {
        if !self.scheduled {
            return Tick::Idle;
        }
        if let Some(last) = self.last_step_ms
            && now_ms >= last
            && now_ms - last < self.frame_ms
        {
            let delay = self.frame_ms - (now_ms - last);
            if let Some(requester) = self.requester.as_mut() {
                requester(delay);
            }
            return Tick::Wait;
        }
        self.scheduled = false;
        self.last_step_ms = Some(now_ms);
        Tick::Run
    }

    /// Finishes a step, scheduling the next one if `proceed` is `true`.
    pub fn end_tick(&mut self, proceed: bool) {
        if proceed {
            self.request();
        } else {
            log::trace!("animation steps stopped");
            self.last_step_ms = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::{AnimationScheduler, Tick};

    fn recorded() -> (AnimationScheduler, Rc<RefCell<Vec<u64>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requests);
        let mut scheduler = AnimationScheduler::default();
        scheduler.set_frame_requester(Some(Box::new(move |delay| sink.borrow_mut().push(delay))));
        (scheduler, requests)
    }

    #[test]
    fn request_is_idempotent() {
        let (mut scheduler, requests) = recorded();
        scheduler.request();
        scheduler.request();
        assert!(scheduler.is_scheduled(), "not scheduled");
        assert_eq!(*requests.borrow(), [10], "frame requested twice");
    }

    #[test]
    fn idle_until_requested() {
        let mut scheduler = AnimationScheduler::default();
        assert_eq!(scheduler.begin_tick(0), Tick::Idle, "ran without a request");
        scheduler.request();
        assert_eq!(scheduler.begin_tick(0), Tick::Run, "did not run");
        scheduler.end_tick(false);
        assert_eq!(scheduler.begin_tick(5), Tick::Idle, "ran after stopping");
    }

    #[test]
    fn steps_at_most_once_per_period() {
        let (mut scheduler, requests) = recorded();
        scheduler.request();
        assert_eq!(scheduler.begin_tick(100), Tick::Run, "first step");
        scheduler.end_tick(true);
        assert_eq!(scheduler.begin_tick(104), Tick::Wait, "stepped too early");
        assert_eq!(scheduler.begin_tick(110), Tick::Run, "missed the next period");
        scheduler.end_tick(false);
        assert!(!scheduler.is_scheduled(), "still scheduled");
        assert_eq!(*requests.borrow(), [10, 10, 6], "unexpected frame requests");
    }

    #[test]
    fn cancel_drops_the_step_and_the_cadence() {
        let (mut scheduler, requests) = recorded();
        scheduler.request();
        assert_eq!(scheduler.begin_tick(100), Tick::Run, "first step");
        scheduler.end_tick(true);
        scheduler.cancel();
        assert!(!scheduler.is_scheduled(), "still scheduled");
        assert_eq!(scheduler.begin_tick(104), Tick::Idle, "ran after cancel");

        scheduler.request();
        assert_eq!(scheduler.begin_tick(104), Tick::Run, "throttled by a cancelled step");
        assert_eq!(*requests.borrow(), [10, 10], "unexpected frame requests");
    }

    #[test]
    fn clock_going_backwards_still_steps() {
        let mut scheduler = AnimationScheduler::default();
        scheduler.request();
        assert_eq!(scheduler.begin_tick(100), Tick::Run, "first step");
        scheduler.end_tick(true);
        assert_eq!(scheduler.begin_tick(50), Tick::Run, "stuck on a clock reset");
    }
}
