// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch and quick-scale recognition.
//!
//! [`PinchRecognizer`] derives a scale factor from the spread ("span") of the
//! pointers around their focus. It also supports quick scale: the second tap
//! of a double tap is held and dragged vertically, and the span is measured
//! between the finger and the point where the second tap went down.
//!
//! Raw quick-scale factors are jumpy, so the engine consumes them through
//! [`StabilizedScale`], which wraps any [`ScaleSource`] and post-processes its
//! output.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use smallvec::SmallVec;

use crate::touch::{TouchAction, TouchEvent};

/// Lower bound of a stabilized quick-scale factor.
pub const QUICK_SCALE_MIN_FACTOR: f64 = 0.8;
/// Upper bound of a stabilized quick-scale factor.
pub const QUICK_SCALE_MAX_FACTOR: f64 = 1.25;

/// Quick-scale span changes are damped by this factor.
const QUICK_SCALE_SENSITIVITY: f64 = 0.5;

/// Output of a scale recognizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleEvent {
    /// A scale gesture started.
    Begin {
        /// Focus point.
        focus: Point,
    },
    /// The span changed.
    Scale {
        /// Focus point.
        focus: Point,
        /// Ratio of the current span to the previous one.
        factor: f64,
    },
    /// The scale gesture ended.
    End,
}

/// Scale events produced by a single touch event.
pub type ScaleEvents = SmallVec<[ScaleEvent; 2]>;

/// Per-event inputs of a scale recognizer that it cannot derive itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleInput {
    /// Whether a new gesture may begin.
    pub enabled: bool,
    /// Whether quick scale is enabled.
    pub quick_scale_enabled: bool,
    /// Whether this down event is the second tap of a double tap.
    pub double_tap_down: bool,
    /// Minimum span, and minimum span change before a pinch begins.
    pub span_slop: f64,
}

/// A source of scale events, driven by touch events.
pub trait ScaleSource {
    /// Feeds a touch event and returns the resulting scale events, in order.
    fn on_touch(&mut self, event: &TouchEvent, input: &ScaleInput) -> ScaleEvents;

    /// Returns `true` while a quick-scale gesture is being tracked.
    fn is_quick_scale(&self) -> bool;

    /// Returns `true` while a scale gesture is in progress.
    fn is_in_progress(&self) -> bool;
}

/// Span-based pinch recognizer with quick-scale support.
#[derive(Clone, Debug, Default)]
pub struct PinchRecognizer {
    in_progress: bool,
    focus: Point,
    initial_span: f64,
    prev_span: f64,
    curr_span: f64,
    anchor: Option<Point>,
    above_anchor: bool,
}

impl PinchRecognizer {
    /// Current focus point.
    #[must_use]
    pub fn focus(&self) -> Point {
        self.focus
    }

    /// Current span.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.curr_span
    }

    /// Scale factor between the previous and the current span.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        // Coinciding pointers have no span to compare.
        if self.prev_span <= 0.0 || self.curr_span <= 0.0 {
            return 1.0;
        }
        if self.anchor.is_some() {
            let grows = self.curr_span > self.prev_span;
            // Dragging away from the anchor zooms in below it, out above it.
            let scale_up = grows != self.above_anchor;
            let diff = (1.0 - self.curr_span / self.prev_span).abs() * QUICK_SCALE_SENSITIVITY;
            if scale_up { 1.0 + diff } else { 1.0 - diff }
        } else {
            self.curr_span / self.prev_span
        }
    }

    fn end(&mut self, out: &mut ScaleEvents) {
        if self.in_progress {
            out.push(ScaleEvent::End);
            self.in_progress = false;
        }
    }
}

impl ScaleSource for PinchRecognizer {
    fn on_touch(&mut self, event: &TouchEvent, input: &ScaleInput) -> ScaleEvents {
        let mut out = ScaleEvents::new();
        let action = event.action;

        if action == TouchAction::Down && input.double_tap_down && input.quick_scale_enabled {
            self.anchor = Some(event.primary());
        }

        let stop_quick_scale = self.anchor.is_some() && event.pointers.len() > 1;
        let stream_complete =
            matches!(action, TouchAction::Up | TouchAction::Cancel) || stop_quick_scale;
        if action == TouchAction::Down || stream_complete {
            if self.in_progress {
                self.end(&mut out);
                self.initial_span = 0.0;
                self.anchor = None;
            } else if stream_complete {
                self.initial_span = 0.0;
                self.anchor = None;
            }
            if stream_complete {
                return out;
            }
        }

        let config_changed = matches!(
            action,
            TouchAction::Down | TouchAction::PointerDown(_) | TouchAction::PointerUp(_)
        );

        let (focus, span) = match self.anchor {
            Some(anchor) => {
                let y = event.primary().y;
                self.above_anchor = y < anchor.y;
                (anchor, 2.0 * (y - anchor.y).abs())
            }
            None => {
                let focus = event.focus();
                let count = event.active_count().max(1) as f64;
                let (dev_x, dev_y) = event.active().fold((0.0, 0.0), |(x, y), p| {
                    (x + (p.pos.x - focus.x).abs(), y + (p.pos.y - focus.y).abs())
                });
                (focus, (2.0 * dev_x / count).hypot(2.0 * dev_y / count))
            }
        };

        let was_in_progress = self.in_progress;
        self.focus = focus;
        if self.anchor.is_none() && config_changed {
            self.end(&mut out);
        }
        if config_changed {
            self.initial_span = span;
            self.prev_span = span;
            self.curr_span = span;
        }

        // A lone pinch pointer has no span, so this also keeps it from restarting.
        if !self.in_progress
            && input.enabled
            && span >= input.span_slop
            && (was_in_progress || (span - self.initial_span).abs() > input.span_slop)
        {
            self.prev_span = span;
            self.curr_span = span;
            self.in_progress = true;
            out.push(ScaleEvent::Begin { focus });
        }

        if action == TouchAction::Move {
            self.curr_span = span;
            if self.in_progress {
                out.push(ScaleEvent::Scale {
                    focus,
                    factor: self.scale_factor(),
                });
            }
            self.prev_span = self.curr_span;
        }
        out
    }

    fn is_quick_scale(&self) -> bool {
        self.anchor.is_some()
    }

    fn is_in_progress(&self) -> bool {
        self.in_progress
    }
}

/// Wraps a [`ScaleSource`] and stabilizes its quick-scale factors.
///
/// While quick-scaling, a factor is clamped to
/// [`QUICK_SCALE_MIN_FACTOR`]..=[`QUICK_SCALE_MAX_FACTOR`] and replaced by
/// `1.0` when it does not agree with the direction the finger moved in
/// (zooming in requires moving down, zooming out requires moving up). Pinch
/// factors pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct StabilizedScale<S> {
    inner: S,
    prev_y: f64,
    curr_y: f64,
}

impl<S: ScaleSource> StabilizedScale<S> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            prev_y: 0.0,
            curr_y: 0.0,
        }
    }

    /// Wrapped recognizer.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn stabilize(&self, factor: f64) -> f64 {
        let agrees = (self.curr_y > self.prev_y && factor > 1.0)
            || (self.curr_y < self.prev_y && factor < 1.0);
        if agrees {
            factor.max(QUICK_SCALE_MIN_FACTOR).min(QUICK_SCALE_MAX_FACTOR)
        } else {
            1.0
        }
    }
}

impl<S: ScaleSource> ScaleSource for StabilizedScale<S> {
    fn on_touch(&mut self, event: &TouchEvent, input: &ScaleInput) -> ScaleEvents {
        let mut events = self.inner.on_touch(event, input);

        let y = event.primary().y;
        self.prev_y = if event.action == TouchAction::Down { y } else { self.curr_y };
        self.curr_y = y;

        if self.inner.is_quick_scale() {
            for event in &mut events {
                if let ScaleEvent::Scale { factor, .. } = event {
                    *factor = self.stabilize(*factor);
                }
            }
        }
        events
    }

    fn is_quick_scale(&self) -> bool {
        self.inner.is_quick_scale()
    }

    fn is_in_progress(&self) -> bool {
        self.inner.is_in_progress()
    }
}
