// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merges the individual recognizers into one ordered gesture stream.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::drag::DragState;
use crate::rotate::{RotationEvent, RotationRecognizer};
use crate::scale::{PinchRecognizer, ScaleEvent, ScaleInput, ScaleSource, StabilizedScale};
use crate::tap::{TapOutcome, TapState};
use crate::touch::{TouchAction, TouchEvent};
use crate::velocity::VelocityTracker;

/// Recognizer thresholds and switches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecognizerConfig {
    /// Distance a pointer travels before it stops being a tap and scrolls.
    pub touch_slop: f64,
    /// Maximum delay between the up of a first tap and the down of a second.
    pub double_tap_timeout_ms: u64,
    /// Maximum distance between the downs of two taps of a double tap.
    pub double_tap_slop: f64,
    /// Time a pointer is held within the touch slop before it long presses.
    pub long_press_timeout_ms: u64,
    /// Minimum release speed on either axis that produces a fling, in px/s.
    pub min_fling_velocity: f64,
    /// Whether pinch gestures may begin.
    pub scale_enabled: bool,
    /// Whether quick scale (double tap and drag) may begin.
    pub quick_scale_enabled: bool,
    /// Whether rotation gestures may begin.
    pub rotation_enabled: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            double_tap_timeout_ms: 300,
            double_tap_slop: 100.0,
            long_press_timeout_ms: 500,
            min_fling_velocity: 50.0,
            scale_enabled: true,
            quick_scale_enabled: true,
            rotation_enabled: false,
        }
    }
}

/// A recognized gesture step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// The first pointer went down.
    Down {
        /// Pointer position.
        pos: Point,
    },
    /// A tap ended. It may still become the first tap of a double tap.
    SingleTapUp {
        /// Pointer position.
        pos: Point,
    },
    /// The double-tap timeout passed after a single tap without a second tap.
    SingleTapConfirmed {
        /// Position where the tap went down.
        pos: Point,
    },
    /// The second tap of a double tap went up.
    DoubleTap {
        /// Pointer position.
        pos: Point,
    },
    /// The first pointer stayed down and still past the long-press timeout.
    LongPress {
        /// Position where the pointer went down.
        pos: Point,
    },
    /// The pointers moved after leaving the tap region.
    Scroll {
        /// Focus position when the stream went down.
        start: Point,
        /// Current focus position.
        current: Point,
        /// Focus movement since the previous scroll.
        delta: Vec2,
    },
    /// The last pointer went up while moving fast enough.
    Fling {
        /// Release velocity, in px/s.
        velocity: Vec2,
    },
    /// A pinch or quick scale started.
    ScaleBegin {
        /// Focus point.
        focus: Point,
    },
    /// The pinch span changed.
    Scale {
        /// Focus point.
        focus: Point,
        /// Ratio of the current span to the previous one.
        factor: f64,
    },
    /// The pinch ended.
    ScaleEnd,
    /// A rotation started.
    RotationBegin {
        /// Focus point.
        focus: Point,
    },
    /// The pointers turned.
    Rotate {
        /// Focus point.
        focus: Point,
        /// Angle since the previous rotate event, in degrees.
        degrees: f64,
    },
    /// The rotation ended.
    RotationEnd,
}

/// Gesture events produced by a single touch event.
pub type GestureEvents = SmallVec<[GestureEvent; 4]>;

/// Feeds every touch event to the tap, scroll, fling, scale and rotation
/// recognizers and merges their output.
///
/// Within one touch event, events are ordered taps, scrolls and flings first,
/// then scale events, then rotation events. Timeouts that passed before the
/// touch event are reported ahead of all of them.
///
/// Single-tap confirmations and long presses also fire without touch input.
/// The host polls them with [`on_time`](Self::on_time) at or after
/// [`next_deadline`](Self::next_deadline), using the clock of the touch events.
///
/// ## Minimal example
///
/// ```
/// use kinetic_event_state::{GestureEvent, GestureMux, TouchEvent};
///
/// let mut mux = GestureMux::default();
/// mux.on_touch(&TouchEvent::down(0, (10.0, 10.0)));
/// let events = mux.on_touch(&TouchEvent::up(50, (10.0, 10.0)));
/// assert!(matches!(events.as_slice(), [GestureEvent::SingleTapUp { .. }]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct GestureMux {
    config: RecognizerConfig,
    drag: DragState,
    tap: TapState,
    velocity: VelocityTracker,
    scale: StabilizedScale<PinchRecognizer>,
    rotation: RotationRecognizer,
}

impl GestureMux {
    /// Creates a mux with the given configuration.
    #[must_use]
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Replaces the configuration. Gestures in progress are not affected.
    pub fn set_config(&mut self, config: RecognizerConfig) {
        self.config = config;
    }

    /// Returns `true` while a pinch or quick scale is in progress.
    #[must_use]
    pub fn is_scaling(&self) -> bool {
        self.scale.is_in_progress()
    }

    /// Returns `true` while an accepted rotation is in progress.
    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_in_progress()
    }

    /// Reports the tap timeouts that passed by `now_ms`.
    pub fn on_time(&mut self, now_ms: u64) -> GestureEvents {
        let mut out = GestureEvents::new();
        self.poll(now_ms, &mut out);
        out
    }

    /// Earliest time at which [`on_time`](Self::on_time) has something to
    /// report, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        let tap = self.tap.single_tap_deadline(self.config.double_tap_timeout_ms);
        let long_press = self.tap.long_press_deadline(self.config.long_press_timeout_ms);
        match (tap, long_press) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn poll(&mut self, now_ms: u64, out: &mut GestureEvents) {
        let config = self.config;
        if let Some(pos) = self.tap.confirm_single_tap(now_ms, config.double_tap_timeout_ms) {
            out.push(GestureEvent::SingleTapConfirmed { pos });
        }
        if let Some(pos) = self.tap.check_long_press(now_ms, config.long_press_timeout_ms) {
            out.push(GestureEvent::LongPress { pos });
        }
    }

    /// Processes one touch event.
    pub fn on_touch(&mut self, event: &TouchEvent) -> GestureEvents {
        let mut out = GestureEvents::new();
        self.poll(event.time_ms, &mut out);
        let config = self.config;
        let focus = event.focus();
        let primary = event.primary();
        self.drag.slop = config.touch_slop;
        let mut double_tap_down = false;

        match event.action {
            TouchAction::Down => {
                self.velocity.reset();
                self.velocity.add(event.time_ms, focus);
                double_tap_down = self.tap.on_down(
                    primary,
                    event.time_ms,
                    config.double_tap_timeout_ms,
                    config.double_tap_slop,
                );
                self.drag.start(focus);
                out.push(GestureEvent::Down { pos: primary });
            }
            TouchAction::PointerDown(_) | TouchAction::PointerUp(_) => {
                self.velocity.reset();
                self.velocity.add(event.time_ms, focus);
                self.drag.rebase(focus);
                if matches!(event.action, TouchAction::PointerDown(_)) {
                    self.tap.cancel_taps();
                    self.drag.leave_tap_region();
                }
            }
            TouchAction::Move => {
                self.velocity.add(event.time_ms, focus);
                self.tap.on_move(primary, config.touch_slop);
                // The second tap of a double tap quick-scales instead of scrolling.
                let scrolls = !self.tap.is_double_tapping() && !self.tap.is_long_pressing();
                if scrolls
                    && let Some(start) = self.drag.start_pos
                    && let Some(delta) = self.drag.update(focus)
                {
                    out.push(GestureEvent::Scroll {
                        start,
                        current: focus,
                        delta,
                    });
                }
            }
            TouchAction::Up => {
                self.velocity.add(event.time_ms, focus);
                let long_pressed = self.tap.is_long_pressing();
                match self.tap.on_up(event.time_ms) {
                    TapOutcome::DoubleTap => out.push(GestureEvent::DoubleTap { pos: primary }),
                    TapOutcome::SingleTap => out.push(GestureEvent::SingleTapUp { pos: primary }),
                    TapOutcome::None if long_pressed => {}
                    TapOutcome::None => {
                        let velocity = self.velocity.velocity();
                        let min = config.min_fling_velocity;
                        if !self.drag.in_tap_region()
                            && (velocity.x.abs() > min || velocity.y.abs() > min)
                        {
                            out.push(GestureEvent::Fling { velocity });
                        }
                    }
                }
                self.drag.end();
            }
            TouchAction::Cancel => {
                self.tap.cancel();
                self.drag.end();
                self.velocity.reset();
            }
        }

        let input = ScaleInput {
            enabled: config.scale_enabled,
            quick_scale_enabled: config.quick_scale_enabled && config.scale_enabled,
            double_tap_down,
            span_slop: 2.0 * config.touch_slop,
        };
        out.extend(self.scale.on_touch(event, &input).into_iter().map(|e| match e {
            ScaleEvent::Begin { focus } => GestureEvent::ScaleBegin { focus },
            ScaleEvent::Scale { focus, factor } => GestureEvent::Scale { focus, factor },
            ScaleEvent::End => GestureEvent::ScaleEnd,
        }));
        out.extend(
            self.rotation
                .on_touch(event, config.rotation_enabled)
                .into_iter()
                .map(|e| match e {
                    RotationEvent::Begin { focus } => GestureEvent::RotationBegin { focus },
                    RotationEvent::Rotate { focus, degrees } => {
                        GestureEvent::Rotate { focus, degrees }
                    }
                    RotationEvent::End => GestureEvent::RotationEnd,
                }),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use kurbo::{Point, Vec2};

    use super::{GestureEvent, GestureMux, RecognizerConfig};
    use crate::touch::{Pointer, TouchAction, TouchEvent};

    #[test]
    fn drag_scrolls_after_slop_and_flings() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (0.0, 0.0)));
        assert!(mux.on_touch(&TouchEvent::move_to(5, (4.0, 0.0))).is_empty());

        let events = mux.on_touch(&TouchEvent::move_to(10, (20.0, 0.0)));
        assert_eq!(
            events.as_slice(),
            &[GestureEvent::Scroll {
                start: Point::ZERO,
                current: Point::new(20.0, 0.0),
                delta: Vec2::new(20.0, 0.0),
            }]
        );

        for i in 3..8_u32 {
            mux.on_touch(&TouchEvent::move_to(u64::from(i) * 5, (f64::from(i) * 10.0, 0.0)));
        }
        let events = mux.on_touch(&TouchEvent::up(40, (80.0, 0.0)));
        let [GestureEvent::Fling { velocity }] = events.as_slice() else {
            panic!("expected a fling, got {events:?}");
        };
        assert!(velocity.x > 1000.0, "{velocity:?}");
    }

    #[test]
    fn slow_release_does_not_fling() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (0.0, 0.0)));
        mux.on_touch(&TouchEvent::move_to(10, (30.0, 0.0)));
        let events = mux.on_touch(&TouchEvent::up(500, (30.0, 0.0)));
        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn double_tap_is_reported_on_second_up() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (50.0, 50.0)));
        mux.on_touch(&TouchEvent::up(50, (50.0, 50.0)));
        let events = mux.on_touch(&TouchEvent::down(150, (55.0, 50.0)));
        assert_eq!(
            events.as_slice(),
            &[GestureEvent::Down {
                pos: Point::new(55.0, 50.0),
            }]
        );
        let events = mux.on_touch(&TouchEvent::up(200, (55.0, 50.0)));
        assert_eq!(
            events.as_slice(),
            &[GestureEvent::DoubleTap {
                pos: Point::new(55.0, 50.0),
            }]
        );
    }

    #[test]
    fn pinch_and_rotation_follow_scroll() {
        let mut mux = GestureMux::new(RecognizerConfig {
            rotation_enabled: true,
            ..RecognizerConfig::default()
        });
        let two = |action, time, b: (f64, f64)| {
            TouchEvent::new(action, time, [Pointer::new(0, (0.0, 0.0)), Pointer::new(1, b)])
        };
        mux.on_touch(&TouchEvent::down(0, (0.0, 0.0)));
        mux.on_touch(&two(TouchAction::PointerDown(1), 10, (100.0, 0.0)));

        // Grows and turns 90 degrees at once.
        let events = mux.on_touch(&two(TouchAction::Move, 20, (0.0, 200.0)));
        let kinds: Vec<_> = events
            .iter()
            .map(|e| match e {
                GestureEvent::Scroll { .. } => "scroll",
                GestureEvent::ScaleBegin { .. } => "scale-begin",
                GestureEvent::Scale { .. } => "scale",
                GestureEvent::RotationBegin { .. } => "rotation-begin",
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(kinds, ["scroll", "scale-begin", "scale", "rotation-begin"]);
        assert!(mux.is_scaling() && mux.is_rotating());

        let events = mux.on_touch(&two(TouchAction::PointerUp(1), 30, (0.0, 200.0)));
        assert_eq!(events.as_slice(), &[GestureEvent::ScaleEnd, GestureEvent::RotationEnd]);
    }

    #[test]
    fn second_pointer_cancels_tap() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (0.0, 0.0)));
        mux.on_touch(&TouchEvent::new(
            TouchAction::PointerDown(1),
            10,
            [Pointer::new(0, (0.0, 0.0)), Pointer::new(1, (1.0, 1.0))],
        ));
        mux.on_touch(&TouchEvent::new(
            TouchAction::PointerUp(1),
            20,
            [Pointer::new(0, (0.0, 0.0)), Pointer::new(1, (1.0, 1.0))],
        ));
        let events = mux.on_touch(&TouchEvent::up(30, (0.0, 0.0)));
        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn single_tap_is_confirmed_by_time() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (40.0, 40.0)));
        mux.on_touch(&TouchEvent::up(60, (41.0, 40.0)));
        assert_eq!(mux.next_deadline(), Some(361));
        assert!(mux.on_time(300).is_empty());

        let events = mux.on_time(361);
        assert_eq!(
            events.as_slice(),
            &[GestureEvent::SingleTapConfirmed {
                pos: Point::new(40.0, 40.0),
            }]
        );
        assert_eq!(mux.next_deadline(), None);
    }

    #[test]
    fn late_touch_reports_the_confirmation_first() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (40.0, 40.0)));
        mux.on_touch(&TouchEvent::up(60, (40.0, 40.0)));
        let events = mux.on_touch(&TouchEvent::down(1000, (40.0, 40.0)));
        assert_eq!(
            events.as_slice(),
            &[
                GestureEvent::SingleTapConfirmed {
                    pos: Point::new(40.0, 40.0),
                },
                GestureEvent::Down {
                    pos: Point::new(40.0, 40.0),
                },
            ]
        );
    }

    #[test]
    fn long_press_swallows_scrolls_and_fling() {
        let mut mux = GestureMux::default();
        mux.on_touch(&TouchEvent::down(0, (10.0, 10.0)));
        assert_eq!(mux.next_deadline(), Some(500));
        assert!(mux.on_time(499).is_empty());
        let events = mux.on_time(520);
        assert_eq!(
            events.as_slice(),
            &[GestureEvent::LongPress {
                pos: Point::new(10.0, 10.0),
            }]
        );
        assert_eq!(mux.next_deadline(), None);

        for i in 1..=5_u32 {
            let x = 10.0 + 60.0 * f64::from(i);
            let events = mux.on_touch(&TouchEvent::move_to(520 + u64::from(i) * 8, (x, 10.0)));
            assert!(events.is_empty(), "{events:?}");
        }
        let events = mux.on_touch(&TouchEvent::up(568, (310.0, 10.0)));
        assert!(events.is_empty(), "{events:?}");
        assert_eq!(mux.next_deadline(), None);
    }
}
