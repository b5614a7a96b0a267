// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: turns focus movement into scroll deltas once the pointer
//! leaves its tap region.
//!
//! ## Usage
//!
//! 1) Start a drag with [`DragState::start`] on pointer down.
//! 2) On each move, call [`DragState::update`]. It returns `None` while the
//!    pointer is still within [`DragState::slop`] of the start position, then
//!    the delta since the previous reported position.
//! 3) When pointers are added or removed, call [`DragState::rebase`] so the
//!    jump of the focus point is not reported as movement.
//! 4) End the drag with [`DragState::end`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use kinetic_event_state::drag::DragState;
//!
//! let mut drag = DragState::with_slop(8.0);
//! drag.start(Point::new(10.0, 20.0));
//!
//! // Small jitter stays a tap.
//! assert_eq!(drag.update(Point::new(13.0, 22.0)), None);
//! assert!(drag.in_tap_region());
//!
//! // Leaving the slop reports the whole movement since the last position.
//! assert_eq!(drag.update(Point::new(30.0, 20.0)), Some(Vec2::new(20.0, 0.0)));
//! assert_eq!(drag.update(Point::new(31.0, 20.0)), Some(Vec2::new(1.0, 0.0)));
//! assert_eq!(drag.total_offset(Point::new(31.0, 20.0)), Some(Vec2::new(21.0, 0.0)));
//! ```

use kurbo::{Point, Vec2};

/// Tracks a single-focus drag with a tap region.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Start position of the drag.
    pub start_pos: Option<Point>,
    /// Last reported position.
    pub last_pos: Option<Point>,
    /// Distance the pointer may travel before movement is reported.
    pub slop: f64,
    left_tap_region: bool,
}

impl DragState {
    /// Creates an idle drag state with the given tap slop.
    #[must_use]
    pub fn with_slop(slop: f64) -> Self {
        Self {
            slop,
            ..Self::default()
        }
    }

    /// Starts tracking a new drag from `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.left_tap_region = false;
    }

    /// Moves the reference position to `pos` without reporting movement.
    ///
    /// Does nothing when no drag is active.
    pub fn rebase(&mut self, pos: Point) {
        if self.start_pos.is_some() {
            self.last_pos = Some(pos);
        }
    }

    /// Treats the drag as no longer being a tap, so every movement is
    /// reported from now on.
    pub fn leave_tap_region(&mut self) {
        if self.start_pos.is_some() {
            self.left_tap_region = true;
        }
    }

    /// Updates the drag with a new position, returning the movement since the
    /// last reported position once the tap region has been left.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let start = self.start_pos?;
        let Some(last) = self.last_pos else {
            self.last_pos = Some(pos);
            return None;
        };

        if !self.left_tap_region {
            if (pos - start).hypot2() <= self.slop * self.slop {
                return None;
            }
            self.left_tap_region = true;
        }

        let delta = pos - last;
        if delta == Vec2::ZERO {
            return None;
        }
        self.last_pos = Some(pos);
        Some(delta)
    }

    /// Total offset of `current_pos` from the drag start.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Ends the drag and resets state.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
        self.left_tap_region = false;
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }

    /// Returns `true` while an active drag has stayed within its slop.
    #[must_use]
    pub fn in_tap_region(&self) -> bool {
        self.is_dragging() && !self.left_tap_region
    }
}
