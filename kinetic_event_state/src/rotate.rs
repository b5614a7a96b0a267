// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-finger rotation recognition.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use smallvec::SmallVec;

use crate::touch::{TouchAction, TouchEvent};

/// The angle between the first two pointers must change by this many degrees
/// before a rotation begins.
pub const ROTATION_SLOP: f64 = 5.0;

/// Output of [`RotationRecognizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationEvent {
    /// A rotation started.
    Begin {
        /// Midpoint of the first two pointers.
        focus: Point,
    },
    /// The pointers turned.
    Rotate {
        /// Midpoint of the first two pointers.
        focus: Point,
        /// Clockwise angle since the previous event, in degrees, within
        /// `(-180, 180]`.
        degrees: f64,
    },
    /// The rotation ended.
    End,
}

/// Rotation events produced by a single touch event.
pub type RotationEvents = SmallVec<[RotationEvent; 2]>;

/// Tracks the angle of the line between the first two active pointers.
///
/// A gesture that begins while rotation is disabled is rejected as a whole:
/// it produces no events until the pointers change.
#[derive(Clone, Debug, Default)]
pub struct RotationRecognizer {
    focus: Point,
    initial_angle: f64,
    prev_angle: f64,
    in_progress: bool,
    accepted: bool,
}

impl RotationRecognizer {
    /// Feeds a touch event. `enabled` decides whether a starting rotation is
    /// accepted.
    pub fn on_touch(&mut self, event: &TouchEvent, enabled: bool) -> RotationEvents {
        let mut out = RotationEvents::new();
        match event.action {
            TouchAction::Down | TouchAction::Up | TouchAction::Cancel => self.cancel(&mut out),
            TouchAction::PointerDown(_) | TouchAction::PointerUp(_) => {
                if event.active_count() < 2 {
                    self.cancel(&mut out);
                } else if let Some((angle, _)) = pair(event) {
                    // Pointer pair may have changed: continue from the new angle.
                    if !self.in_progress {
                        self.initial_angle = angle;
                    }
                    self.prev_angle = angle;
                }
            }
            TouchAction::Move => {
                let Some((angle, focus)) = pair(event) else {
                    return out;
                };
                if self.in_progress && !self.accepted {
                    return out;
                }
                self.focus = focus;
                if !self.in_progress {
                    if wrap_degrees(angle - self.initial_angle).abs() >= ROTATION_SLOP {
                        self.in_progress = true;
                        self.accepted = enabled;
                        if enabled {
                            out.push(RotationEvent::Begin { focus });
                        }
                    }
                    self.prev_angle = angle;
                } else {
                    out.push(RotationEvent::Rotate {
                        focus,
                        degrees: wrap_degrees(angle - self.prev_angle),
                    });
                    self.prev_angle = angle;
                }
            }
        }
        out
    }

    /// Returns `true` while an accepted rotation is in progress.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress && self.accepted
    }

    /// Midpoint of the first two pointers at the last move.
    #[must_use]
    pub fn focus(&self) -> Point {
        self.focus
    }

    fn cancel(&mut self, out: &mut RotationEvents) {
        if self.in_progress {
            self.in_progress = false;
            if self.accepted {
                out.push(RotationEvent::End);
                self.accepted = false;
            }
        }
    }
}

/// Angle in degrees and midpoint of the first two active pointers.
fn pair(event: &TouchEvent) -> Option<(f64, Point)> {
    let mut active = event.active();
    let a = active.next()?.pos;
    let b = active.next()?.pos;
    let d = b - a;
    Some((d.y.atan2(d.x).to_degrees(), a.midpoint(b)))
}

fn wrap_degrees(degrees: f64) -> f64 {
    let degrees = degrees % 360.0;
    if degrees > 180.0 {
        degrees - 360.0
    } else if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{RotationEvent, RotationRecognizer};
    use crate::touch::{Pointer, TouchAction, TouchEvent};

    fn two(action: TouchAction, a: (f64, f64), b: (f64, f64)) -> TouchEvent {
        TouchEvent::new(action, 0, [Pointer::new(0, a), Pointer::new(1, b)])
    }

    fn start(rotation: &mut RotationRecognizer, enabled: bool) {
        rotation.on_touch(&TouchEvent::down(0, (0.0, 0.0)), enabled);
        rotation.on_touch(&two(TouchAction::PointerDown(1), (0.0, 0.0), (100.0, 0.0)), enabled);
    }

    #[test]
    fn begins_after_slop_then_reports_deltas() {
        let mut rotation = RotationRecognizer::default();
        start(&mut rotation, true);

        // atan(3/100) ~ 1.7 degrees: still within slop.
        let events = rotation.on_touch(&two(TouchAction::Move, (0.0, 0.0), (100.0, 3.0)), true);
        assert!(events.is_empty());

        let events = rotation.on_touch(&two(TouchAction::Move, (0.0, 0.0), (100.0, 100.0)), true);
        assert_eq!(
            events.as_slice(),
            &[RotationEvent::Begin {
                focus: Point::new(50.0, 50.0),
            }]
        );

        let events = rotation.on_touch(&two(TouchAction::Move, (0.0, 0.0), (0.0, 100.0)), true);
        let [RotationEvent::Rotate { degrees, focus }] = events.as_slice() else {
            panic!("expected a rotate event, got {events:?}");
        };
        assert!((degrees - 45.0).abs() < 1e-9);
        assert_eq!(*focus, Point::new(0.0, 50.0));

        let events = rotation.on_touch(
            &two(TouchAction::PointerUp(1), (0.0, 0.0), (0.0, 100.0)),
            true,
        );
        assert_eq!(events.as_slice(), &[RotationEvent::End]);
    }

    #[test]
    fn delta_wraps_across_180() {
        let mut rotation = RotationRecognizer::default();
        start(&mut rotation, true);
        rotation.on_touch(&two(TouchAction::Move, (0.0, 0.0), (-100.0, 10.0)), true);
        let events = rotation.on_touch(
            &two(TouchAction::Move, (0.0, 0.0), (-100.0, -10.0)),
            true,
        );
        let [RotationEvent::Rotate { degrees, .. }] = events.as_slice() else {
            panic!("expected a rotate event, got {events:?}");
        };
        assert!(degrees.abs() < 20.0, "took the long way: {degrees}");
    }

    #[test]
    fn rejected_gesture_stays_silent() {
        let mut rotation = RotationRecognizer::default();
        start(&mut rotation, false);
        let events = rotation.on_touch(&two(TouchAction::Move, (0.0, 0.0), (0.0, 100.0)), false);
        assert!(events.is_empty());
        // Enabling mid-gesture does not revive it.
        let events = rotation.on_touch(&two(TouchAction::Move, (0.0, 0.0), (-100.0, 0.0)), true);
        assert!(events.is_empty());
        assert!(!rotation.is_in_progress());
        assert!(rotation.on_touch(&TouchEvent::up(0, (0.0, 0.0)), true).is_empty());
    }
}
