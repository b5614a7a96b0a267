// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-touch input model.
//!
//! A [`TouchEvent`] carries every pointer that is down at the time of the
//! event. For [`TouchAction::Up`] and [`TouchAction::PointerUp`] this includes
//! the pointer being lifted, so that its final position is known.

use kurbo::Point;
use smallvec::SmallVec;

/// Identifier of a pointer, stable from its down to its up.
pub type PointerId = u64;

/// A single pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    /// Pointer identifier.
    pub id: PointerId,
    /// Position in viewport coordinates.
    pub pos: Point,
}

impl Pointer {
    /// Creates a pointer sample.
    #[must_use]
    pub fn new(id: PointerId, pos: impl Into<Point>) -> Self {
        Self {
            id,
            pos: pos.into(),
        }
    }
}

/// What happened in a [`TouchEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    /// The first pointer went down.
    Down,
    /// One or more pointers moved.
    Move,
    /// The last pointer went up.
    Up,
    /// The gesture was aborted by the host.
    Cancel,
    /// An additional pointer went down.
    PointerDown(PointerId),
    /// A pointer other than the last one went up.
    PointerUp(PointerId),
}

/// Pointers that are down at the same time, inline for the common cases.
pub type Pointers = SmallVec<[Pointer; 4]>;

/// One input event of a touch stream.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// Action of this event.
    pub action: TouchAction,
    /// Every pointer that is down, including a pointer being lifted.
    pub pointers: Pointers,
    /// Timestamp in milliseconds.
    pub time_ms: u64,
}

impl TouchEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(
        action: TouchAction,
        time_ms: u64,
        pointers: impl IntoIterator<Item = Pointer>,
    ) -> Self {
        Self {
            action,
            pointers: pointers.into_iter().collect(),
            time_ms,
        }
    }

    /// First pointer goes down at `pos`.
    #[must_use]
    pub fn down(time_ms: u64, pos: impl Into<Point>) -> Self {
        Self::new(TouchAction::Down, time_ms, [Pointer::new(0, pos)])
    }

    /// Single pointer moves to `pos`.
    #[must_use]
    pub fn move_to(time_ms: u64, pos: impl Into<Point>) -> Self {
        Self::new(TouchAction::Move, time_ms, [Pointer::new(0, pos)])
    }

    /// Last pointer goes up at `pos`.
    #[must_use]
    pub fn up(time_ms: u64, pos: impl Into<Point>) -> Self {
        Self::new(TouchAction::Up, time_ms, [Pointer::new(0, pos)])
    }

    /// Pointer being lifted by this event, if any.
    #[must_use]
    pub fn lifting(&self) -> Option<PointerId> {
        match self.action {
            TouchAction::PointerUp(id) => Some(id),
            TouchAction::Up => self.pointers.first().map(|p| p.id),
            _ => None,
        }
    }

    /// Pointers that remain down after this event.
    pub fn active(&self) -> impl Iterator<Item = &Pointer> + '_ {
        let lifting = self.lifting();
        self.pointers.iter().filter(move |p| Some(p.id) != lifting)
    }

    /// Number of pointers that remain down after this event.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Position of the first pointer, or the origin for an empty event.
    #[must_use]
    pub fn primary(&self) -> Point {
        self.pointers.first().map_or(Point::ZERO, |p| p.pos)
    }

    /// Average position of the pointers that remain down.
    ///
    /// Falls back to every pointer of the event when none remains, which is
    /// the case for [`TouchAction::Up`].
    #[must_use]
    pub fn focus(&self) -> Point {
        average(self.active().map(|p| p.pos))
            .or_else(|| average(self.pointers.iter().map(|p| p.pos)))
            .unwrap_or(Point::ZERO)
    }

    /// Returns `true` if the set of pointers changes with this event.
    #[must_use]
    pub fn changes_pointers(&self) -> bool {
        !matches!(self.action, TouchAction::Move)
    }
}

fn average(points: impl Iterator<Item = Point>) -> Option<Point> {
    let mut count = 0_u32;
    let mut sum = kurbo::Vec2::ZERO;
    for point in points {
        sum += point.to_vec2();
        count += 1;
    }
    (count > 0).then(|| (sum / f64::from(count)).to_point())
}
