// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single tap, double tap and long press recognition.
//!
//! Taps are driven by touch timestamps. The timeouts that fire without a touch
//! event (single-tap confirmation and long press) are checked against a time
//! supplied by the host, on the same clock as the touch events.

use kurbo::Point;

/// Second taps arriving faster than this are treated as a new first tap.
pub const DOUBLE_TAP_MIN_TIME_MS: u64 = 40;

/// Result of lifting the last pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// The pointer moved or was joined by others: not a tap.
    None,
    /// A tap that may still become the first half of a double tap.
    SingleTap,
    /// The second tap of a double tap.
    DoubleTap,
}

#[derive(Clone, Copy, Debug)]
struct FirstTap {
    down_pos: Point,
    up_time_ms: u64,
}

/// Tap state machine.
///
/// A tap stays a tap while its pointer does not leave the touch slop and no
/// other pointer joins. A second tap starting within the double-tap timeout
/// and slop of a previous tap is a double tap; the double tap is reported when
/// its pointer goes up, whatever happened in between.
///
/// A single tap is confirmed once the double-tap timeout has passed since its
/// up without a second down. A pointer held still past the long-press timeout
/// is a long press and no longer a tap. The second tap of a double tap never
/// becomes a long press.
#[derive(Clone, Copy, Debug, Default)]
pub struct TapState {
    down_pos: Option<Point>,
    down_time_ms: u64,
    in_tap_region: bool,
    double_tapping: bool,
    in_long_press: bool,
    first_tap: Option<FirstTap>,
}

impl TapState {
    /// Handles the first pointer going down.
    ///
    /// Returns `true` if this down starts the second tap of a double tap.
    pub fn on_down(&mut self, pos: Point, time_ms: u64, timeout_ms: u64, slop: f64) -> bool {
        self.double_tapping = self.first_tap.take().is_some_and(|first| {
            let elapsed = time_ms.saturating_sub(first.up_time_ms);
            (DOUBLE_TAP_MIN_TIME_MS..=timeout_ms).contains(&elapsed)
                && (pos - first.down_pos).hypot2() < slop * slop
        });
        self.down_pos = Some(pos);
        self.down_time_ms = time_ms;
        self.in_tap_region = true;
        self.in_long_press = false;
        self.double_tapping
    }

    /// Handles a move of the primary pointer.
    pub fn on_move(&mut self, pos: Point, touch_slop: f64) {
        if let Some(down) = self.down_pos
            && (pos - down).hypot2() > touch_slop * touch_slop
        {
            self.in_tap_region = false;
        }
    }

    /// Handles a second pointer going down: nothing in progress is a tap.
    pub fn cancel_taps(&mut self) {
        self.in_tap_region = false;
        self.double_tapping = false;
        self.first_tap = None;
    }

    /// Handles the last pointer going up.
    pub fn on_up(&mut self, time_ms: u64) -> TapOutcome {
        self.in_long_press = false;
        let Some(down_pos) = self.down_pos.take() else {
            return TapOutcome::None;
        };
        if self.double_tapping {
            self.double_tapping = false;
            return TapOutcome::DoubleTap;
        }
        if !self.in_tap_region {
            return TapOutcome::None;
        }
        self.first_tap = Some(FirstTap {
            down_pos,
            up_time_ms: time_ms,
        });
        TapOutcome::SingleTap
    }

    /// Handles a cancelled stream.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Confirms the pending single tap once `timeout_ms` has passed since its
    /// up without a second tap starting.
    ///
    /// Returns the position where the confirmed tap went down.
    pub fn confirm_single_tap(&mut self, now_ms: u64, timeout_ms: u64) -> Option<Point> {
        let first = self.first_tap?;
        if now_ms.saturating_sub(first.up_time_ms) <= timeout_ms {
            return None;
        }
        self.first_tap = None;
        Some(first.down_pos)
    }

    /// Time at which [`confirm_single_tap`](Self::confirm_single_tap) fires,
    /// if a single tap is pending.
    #[must_use]
    pub fn single_tap_deadline(&self, timeout_ms: u64) -> Option<u64> {
        let first = self.first_tap?;
        Some(first.up_time_ms.saturating_add(timeout_ms.saturating_add(1)))
    }

    /// Turns the held pointer into a long press once it stayed within the
    /// touch slop for `timeout_ms`.
    ///
    /// Returns the down position the first time the long press is detected.
    pub fn check_long_press(&mut self, now_ms: u64, timeout_ms: u64) -> Option<Point> {
        let deadline = self.long_press_deadline(timeout_ms)?;
        if now_ms < deadline {
            return None;
        }
        self.in_long_press = true;
        self.in_tap_region = false;
        self.down_pos
    }

    /// Time at which [`check_long_press`](Self::check_long_press) fires, if
    /// the current pointer may still become a long press.
    #[must_use]
    pub fn long_press_deadline(&self, timeout_ms: u64) -> Option<u64> {
        let armed = self.in_tap_region() && !self.double_tapping && !self.in_long_press;
        armed.then(|| self.down_time_ms.saturating_add(timeout_ms))
    }

    /// Returns `true` from the moment a long press is detected until its
    /// pointer goes up.
    #[must_use]
    pub fn is_long_pressing(&self) -> bool {
        self.in_long_press
    }

    /// Returns `true` while the current pointer is the second tap of a double
    /// tap.
    #[must_use]
    pub fn is_double_tapping(&self) -> bool {
        self.double_tapping
    }

    /// Returns `true` while the current pointer still qualifies as a tap.
    #[must_use]
    pub fn in_tap_region(&self) -> bool {
        self.down_pos.is_some() && self.in_tap_region
    }
}
