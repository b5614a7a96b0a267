// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture engine: touch in, bounded transform out.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kinetic_animation::{AnimationScheduler, FlingScroller, FrameRequester, StateScroller, Tick};
use kinetic_bounds::{BoundsPolicy, MovementBounds, Settings};
use kinetic_event_state::{GestureEvent, GestureMux, RecognizerConfig, TouchAction, TouchEvent};
use kinetic_transform::{
    EPSILON, Transform, approx_eq, compute_new_position, interpolate, interpolate_about,
};
use kurbo::{Point, Vec2};

use crate::listeners::{GestureListener, ListenerId, StateListener, StateRequest, StateRequests};

/// Notification passes replayed for one change before giving up on listeners
/// that keep requesting changes.
const MAX_NOTIFY_PASSES: usize = 32;

/// Applies touch gestures to a live [`Transform`], keeps it within the
/// bounds of its [`Settings`], and animates flings, snap-backs and double-tap
/// zooms.
///
/// The host feeds [`on_touch`](Self::on_touch) with touch events and calls
/// [`on_frame`](Self::on_frame) from its frame callback while
/// [`needs_frame`](Self::needs_frame) is `true`. Every change of the
/// transform is reported to the [`StateListener`]s in the order they were
/// added.
pub struct GestureEngine {
    policy: BoundsPolicy,
    mux: GestureMux,
    state: Transform,
    prev_state: Transform,

    scroll_detected: bool,
    scale_detected: bool,
    rotation_detected: bool,
    changed_during_touch: bool,
    restrict_requested: bool,
    intercept_disallowed: bool,
    animating_in_bounds: bool,
    pivot: Option<Point>,
    end_pivot: Option<Point>,

    fling: FlingScroller,
    fling_bounds: Option<MovementBounds>,
    state_scroller: StateScroller,
    anim_start: Transform,
    anim_end: Transform,
    scheduler: AnimationScheduler,

    state_listeners: Vec<(ListenerId, Box<dyn StateListener>)>,
    next_listener_id: u64,
    gesture_listener: Option<Box<dyn GestureListener>>,
    notifying: bool,
    rerun: Option<bool>,
}

impl fmt::Debug for GestureEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureEngine")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("animating_state", &self.is_animating_state())
            .field("animating_fling", &self.is_animating_fling())
            .field("state_listeners", &self.state_listeners.len())
            .finish_non_exhaustive()
    }
}

impl GestureEngine {
    /// Creates an engine. The transform is the identity until the first
    /// [`update_state`](Self::update_state) or
    /// [`reset_state`](Self::reset_state).
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            policy: BoundsPolicy::new(settings),
            mux: GestureMux::default(),
            state: Transform::IDENTITY,
            prev_state: Transform::IDENTITY,
            scroll_detected: false,
            scale_detected: false,
            rotation_detected: false,
            changed_during_touch: false,
            restrict_requested: false,
            intercept_disallowed: false,
            animating_in_bounds: false,
            pivot: None,
            end_pivot: None,
            fling: FlingScroller::default(),
            fling_bounds: None,
            state_scroller: StateScroller::default(),
            anim_start: Transform::IDENTITY,
            anim_end: Transform::IDENTITY,
            scheduler: AnimationScheduler::default(),
            state_listeners: Vec::new(),
            next_listener_id: 0,
            gesture_listener: None,
            notifying: false,
            rerun: None,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.policy.settings()
    }

    /// Mutable settings. Call [`update_state`](Self::update_state) after
    /// changing sizes or zoom limits.
    pub fn settings_mut(&mut self) -> &mut Settings {
        self.policy.settings_mut()
    }

    /// Bounds policy, for querying zoom and movement bounds.
    #[must_use]
    pub fn policy(&self) -> &BoundsPolicy {
        &self.policy
    }

    /// The live transform.
    #[must_use]
    pub fn state(&self) -> &Transform {
        &self.state
    }

    /// Adds a state listener. Listeners are notified in insertion order.
    pub fn add_state_listener(&mut self, listener: impl StateListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.state_listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a state listener. Returns `false` if it was not registered.
    pub fn remove_state_listener(&mut self, id: ListenerId) -> bool {
        let len = self.state_listeners.len();
        self.state_listeners.retain(|(listener, _)| *listener != id);
        self.state_listeners.len() != len
    }

    /// Sets or clears the gesture listener.
    pub fn set_gesture_listener(&mut self, listener: Option<Box<dyn GestureListener>>) {
        self.gesture_listener = listener;
    }

    /// Installs the callback used to ask the host for animation frames.
    pub fn set_frame_requester(&mut self, requester: Option<FrameRequester>) {
        self.scheduler.set_frame_requester(requester);
    }

    /// Applies the current settings: completes a pending reset, or snaps the
    /// transform into its bounds. Listeners are notified either way.
    ///
    /// Returns `true` if a reset completed.
    pub fn update_state(&mut self) -> bool {
        if let Err(err) = self.policy.settings().validate() {
            log::warn!("inconsistent settings, clamping at use: {err}");
        }
        let reset = self.policy.update_state(&mut self.state);
        self.notify(reset);
        reset
    }

    /// Stops all animations and resets the transform to the fitted,
    /// unrotated placement. Listeners are notified either way.
    pub fn reset_state(&mut self) {
        self.stop_all_animations();
        let reset = self.policy.reset_state(&mut self.state);
        self.notify(reset);
    }

    /// Stops all animations and replaces the transform, then applies the
    /// settings as [`update_state`](Self::update_state) does.
    ///
    /// A transform with non-finite components or a non-positive zoom is
    /// rejected and the current one is kept.
    pub fn set_state(&mut self, state: Transform) {
        if !state.is_valid() {
            log::warn!("ignoring invalid state {state:?}");
            return;
        }
        self.stop_all_animations();
        self.state = state;
        self.update_state();
    }

    /// Animates to `end`, restricted to its bounds.
    ///
    /// Returns `false` if the restricted target equals the current state or
    /// `end` is invalid (see [`set_state`](Self::set_state)), in which case
    /// nothing is started.
    pub fn animate_state_to(&mut self, end: Transform) -> bool {
        if !end.is_valid() {
            log::warn!("ignoring invalid animation target {end:?}");
            return false;
        }
        self.animate_to(end, true)
    }

    /// Returns `true` while a state animation is running.
    #[must_use]
    pub fn is_animating_state(&self) -> bool {
        !self.state_scroller.is_finished()
    }

    /// Returns `true` while a fling is running.
    #[must_use]
    pub fn is_animating_fling(&self) -> bool {
        !self.fling.is_finished()
    }

    /// Returns `true` while any animation is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.is_animating_state() || self.is_animating_fling()
    }

    /// Stops a running state animation where it is.
    pub fn stop_state_animation(&mut self) {
        if self.is_animating_state() {
            self.state_scroller.force_finish();
            self.on_state_animation_finished();
        }
    }

    /// Stops a running fling where it is, without snapping back.
    pub fn stop_fling_animation(&mut self) {
        if self.is_animating_fling() {
            self.fling.force_finish();
            self.on_fling_animation_finished(true);
        }
    }

    /// Stops both the state animation and the fling.
    pub fn stop_all_animations(&mut self) {
        self.stop_state_animation();
        self.stop_fling_animation();
    }

    /// Returns `true` once the current touch stream should not be taken over
    /// by an enclosing scroll container: the image can pan, or a second
    /// pointer went down while zoom or rotation is enabled.
    #[must_use]
    pub fn is_intercept_disallowed(&self) -> bool {
        self.intercept_disallowed
    }

    /// Processes a touch event. Returns whether gestures are enabled, which is
    /// whether the host should consider the event handled.
    pub fn on_touch(&mut self, event: &TouchEvent) -> bool {
        self.mux.set_config(self.recognizer_config());
        for gesture in self.mux.on_touch(event) {
            self.on_gesture(gesture);
        }

        if self.changed_during_touch {
            self.changed_during_touch = false;
            self.policy.restrict_bounds(
                &mut self.state,
                Some(&self.prev_state),
                self.pivot,
                true,
                false,
            );
            if self.state != self.prev_state {
                self.notify(false);
            }
        }

        if self.restrict_requested {
            self.restrict_requested = false;
            if let Some(restricted) = self.policy.restrict_bounds_copy(&self.state, self.pivot) {
                self.animate_to(restricted, false);
            }
        }

        if matches!(event.action, TouchAction::Up | TouchAction::Cancel) {
            self.on_up_or_cancel();
        }

        if !self.intercept_disallowed && self.should_disallow_intercept(event) {
            log::trace!("intercept disallowed on {:?}", event.action);
            self.intercept_disallowed = true;
        }

        self.schedule_timeouts();
        self.settings().is_enabled()
    }

    /// Returns `true` while an animation step or a tap timeout is pending.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Reports the tap timeouts that passed by `now_ms`, then runs the
    /// animation step due at `now_ms`, if any.
    ///
    /// Tap timeouts compare `now_ms` with the touch timestamps, so frames and
    /// touch events must share a clock.
    ///
    /// Returns `true` while further frames are needed.
    pub fn on_frame(&mut self, now_ms: u64) -> bool {
        for gesture in self.mux.on_time(now_ms) {
            self.on_gesture(gesture);
        }
        match self.scheduler.begin_tick(now_ms) {
            Tick::Idle | Tick::Wait => {}
            Tick::Run => {
                let proceed = self.step(now_ms);
                self.scheduler.end_tick(proceed);
            }
        }
        self.schedule_timeouts();
        self.scheduler.is_scheduled()
    }

    /// Keeps frames coming while a tap timeout is pending.
    fn schedule_timeouts(&mut self) {
        if self.mux.next_deadline().is_some() {
            self.scheduler.request();
        } else if !self.is_animating() {
            self.scheduler.cancel();
        }
    }

    fn recognizer_config(&self) -> RecognizerConfig {
        let settings = self.settings();
        RecognizerConfig {
            touch_slop: settings.touch_slop(),
            double_tap_timeout_ms: settings.double_tap_timeout_ms(),
            double_tap_slop: settings.double_tap_slop(),
            long_press_timeout_ms: settings.long_press_timeout_ms(),
            min_fling_velocity: settings.min_fling_velocity(),
            scale_enabled: settings.is_zoom_enabled(),
            quick_scale_enabled: settings.is_double_tap_enabled(),
            rotation_enabled: settings.is_rotation_enabled(),
        }
    }

    fn on_gesture(&mut self, gesture: GestureEvent) {
        match gesture {
            GestureEvent::Down { pos } => self.on_down(pos),
            GestureEvent::SingleTapUp { pos } => {
                if let Some(listener) = self.gesture_listener.as_mut() {
                    listener.on_single_tap_up(pos);
                }
            }
            GestureEvent::SingleTapConfirmed { pos } => {
                if let Some(listener) = self.gesture_listener.as_mut() {
                    listener.on_single_tap_confirmed(pos);
                }
            }
            GestureEvent::DoubleTap { pos } => self.on_double_tap(pos),
            GestureEvent::LongPress { pos } => {
                if self.settings().is_enabled()
                    && let Some(listener) = self.gesture_listener.as_mut()
                {
                    listener.on_long_press(pos);
                }
            }
            GestureEvent::Scroll {
                start,
                current,
                delta,
            } => self.on_scroll(start, current, delta),
            GestureEvent::Fling { velocity } => self.on_fling(velocity),
            GestureEvent::ScaleBegin { .. } => {
                self.scale_detected = self.settings().is_zoom_enabled();
            }
            GestureEvent::Scale { focus, factor } => {
                if factor.is_finite()
                    && factor > 0.0
                    && self.settings().is_zoom_enabled()
                    && !self.is_animating_state()
                {
                    self.pivot = Some(focus);
                    self.state.zoom_by(factor, focus);
                    self.changed_during_touch = true;
                }
            }
            GestureEvent::ScaleEnd => {
                self.scale_detected = false;
                self.restrict_requested = true;
            }
            GestureEvent::RotationBegin { .. } => {
                self.rotation_detected = self.settings().is_rotation_enabled();
            }
            GestureEvent::Rotate { focus, degrees } => {
                if self.settings().is_rotation_enabled() && !self.is_animating_state() {
                    self.pivot = Some(focus);
                    self.state.rotate_by(degrees, focus);
                    self.changed_during_touch = true;
                }
            }
            GestureEvent::RotationEnd => {
                self.rotation_detected = false;
                self.restrict_requested = true;
            }
        }
    }

    fn on_down(&mut self, pos: Point) {
        self.intercept_disallowed = false;
        self.stop_fling_animation();
        if let Some(listener) = self.gesture_listener.as_mut() {
            listener.on_down(pos);
        }
    }

    fn on_up_or_cancel(&mut self) {
        self.scroll_detected = false;
        self.scale_detected = false;
        self.rotation_detected = false;
        if !self.is_animating_fling() && !self.animating_in_bounds {
            self.animate_keep_in_bounds();
        }
        if let Some(listener) = self.gesture_listener.as_mut() {
            listener.on_up_or_cancel();
        }
    }

    fn on_scroll(&mut self, start: Point, current: Point, delta: Vec2) {
        if self.is_animating_state() {
            return;
        }
        if !self.scroll_detected {
            let slop = self.settings().touch_slop();
            let moved = current - start;
            self.scroll_detected = !self.scale_detected
                && !self.rotation_detected
                && (moved.x.abs() > slop || moved.y.abs() > slop);
            // The detecting move itself does not translate.
            return;
        }
        self.state.translate_by(delta);
        self.changed_during_touch = true;
    }

    fn on_fling(&mut self, velocity: Vec2) {
        if self.is_animating_state() {
            return;
        }
        self.stop_fling_animation();

        let settings = self.settings();
        let damping = settings.fling_damping();
        let (min, max) = (settings.min_fling_velocity(), settings.max_fling_velocity());
        let velocity = Vec2::new(
            limit_fling_velocity(velocity.x * damping, min, max),
            limit_fling_velocity(velocity.y * damping, min, max),
        );
        if velocity == Vec2::ZERO {
            return;
        }

        let mut bounds = self.policy.movement_bounds(&self.state);
        bounds.extend(self.state.position());
        self.fling_bounds = Some(bounds);
        self.fling.fling(velocity);
        log::debug!("fling started at {velocity:?} px/s");
        self.scheduler.request();
    }

    /// Moves by a fling step within the fling bounds. Returns `false` if the
    /// bounds stopped the movement.
    fn on_fling_scroll(&mut self, delta: Vec2) -> bool {
        let Some(bounds) = self.fling_bounds else {
            return false;
        };
        let from = self.state.position();
        let to = bounds.restrict(from + delta, Vec2::ZERO);
        self.state.translate_to(to);
        !approx_eq(from.x, to.x) || !approx_eq(from.y, to.y)
    }

    fn on_double_tap(&mut self, pos: Point) {
        if !self.settings().is_double_tap_enabled() || self.scale_detected {
            return;
        }
        if let Some(listener) = self.gesture_listener.as_mut()
            && listener.on_double_tap(pos)
        {
            return;
        }
        let end = self.policy.toggle_min_max_zoom(&self.state, pos);
        self.animate_state_to(end);
    }

    fn should_disallow_intercept(&self, event: &TouchEvent) -> bool {
        match event.action {
            TouchAction::Down | TouchAction::Move => {
                let area = self.policy.movement_area(&self.state);
                area.width() > EPSILON || area.height() > EPSILON
            }
            TouchAction::PointerDown(_) => {
                let settings = self.settings();
                settings.is_zoom_enabled() || settings.is_rotation_enabled()
            }
            _ => false,
        }
    }

    fn animate_keep_in_bounds(&mut self) {
        self.animate_to(self.state, true);
    }

    fn animate_to(&mut self, end: Transform, keep_in_bounds: bool) -> bool {
        let end = if keep_in_bounds {
            self.policy
                .restrict_bounds_copy(&end, self.pivot)
                .unwrap_or(end)
        } else {
            end
        };
        if end == self.state {
            return false;
        }

        self.stop_all_animations();
        self.animating_in_bounds = keep_in_bounds;
        self.anim_start = self.state;
        self.anim_end = end;
        self.end_pivot = self
            .pivot
            .map(|pivot| compute_new_position(pivot, &self.anim_start, &self.anim_end));
        self.state_scroller
            .start(0.0, 1.0, self.settings().animation_duration_ms());
        log::debug!("animating state to {end:?}");
        self.scheduler.request();
        true
    }

    fn on_state_animation_finished(&mut self) {
        self.animating_in_bounds = false;
        self.pivot = None;
        self.end_pivot = None;
    }

    fn on_fling_animation_finished(&mut self, forced: bool) {
        self.fling_bounds = None;
        if !forced {
            self.animate_keep_in_bounds();
        }
    }

    /// One animation step. Returns `true` if anything moved.
    fn step(&mut self, now_ms: u64) -> bool {
        let mut proceed = false;

        if self.is_animating_fling() {
            let before = self.fling.offset();
            if self.fling.compute(now_ms) {
                let delta = self.fling.offset() - before;
                // The first step only anchors the fling clock.
                if delta != Vec2::ZERO && !self.on_fling_scroll(delta) {
                    log::debug!("fling stopped at the movement bounds");
                    self.stop_fling_animation();
                }
                proceed = true;
            }
            if !self.is_animating_fling() {
                self.on_fling_animation_finished(false);
            }
        }

        if self.is_animating_state() {
            self.state_scroller.compute(now_ms);
            let factor = self.state_scroller.current();
            self.state = match (self.pivot, self.end_pivot) {
                (Some(pivot), Some(end_pivot)) => interpolate_about(
                    &self.anim_start,
                    pivot,
                    &self.anim_end,
                    end_pivot,
                    factor,
                ),
                _ => interpolate(&self.anim_start, &self.anim_end, factor),
            };
            proceed = true;
            if !self.is_animating_state() {
                self.on_state_animation_finished();
            }
        }

        if proceed {
            log::trace!("frame at {now_ms} ms: {:?}", self.state);
            self.notify(false);
        }
        proceed
    }

    /// Notifies state listeners, replaying their requests afterwards.
    ///
    /// Notifications triggered while replaying are folded into another pass
    /// of the outer loop instead of recursing.
    fn notify(&mut self, reset: bool) {
        if self.notifying {
            self.rerun = Some(self.rerun.unwrap_or(false) || reset);
            return;
        }
        self.notifying = true;

        let mut reset = reset;
        for _ in 0..MAX_NOTIFY_PASSES {
            let mut requests = StateRequests::default();
            if reset {
                for (_, listener) in &mut self.state_listeners {
                    listener.on_state_reset(&self.prev_state, &self.state, &mut requests);
                }
            }
            self.prev_state = self.state;
            for (_, listener) in &mut self.state_listeners {
                listener.on_state_changed(&self.state, &mut requests);
            }

            for request in requests.take() {
                self.apply_request(request);
            }
            match self.rerun.take() {
                Some(rerun_reset) => reset = rerun_reset,
                None => {
                    self.notifying = false;
                    return;
                }
            }
        }

        log::warn!("state listeners kept requesting changes; dropping further notifications");
        self.rerun = None;
        self.notifying = false;
    }

    fn apply_request(&mut self, request: StateRequest) {
        match request {
            StateRequest::AnimateTo(end) => {
                self.animate_state_to(end);
            }
            StateRequest::SetState(state) => self.set_state(state),
            StateRequest::Reset => self.reset_state(),
            StateRequest::UpdateState => {
                self.update_state();
            }
            StateRequest::StopAnimations => self.stop_all_animations(),
        }
    }
}

/// Zeroes velocities below `min` and clamps those at or above `max`.
fn limit_fling_velocity(velocity: f64, min: f64, max: f64) -> f64 {
    let speed = velocity.abs();
    if speed < min {
        0.0
    } else if speed >= max {
        if velocity < 0.0 { -max } else { max }
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::limit_fling_velocity;

    #[test]
    fn fling_velocity_limits() {
        assert_eq!(limit_fling_velocity(30.0, 50.0, 8000.0), 0.0, "below min");
        assert_eq!(limit_fling_velocity(-300.0, 50.0, 8000.0), -300.0, "in range");
        assert_eq!(limit_fling_velocity(8000.0, 50.0, 8000.0), 8000.0, "at max");
        assert_eq!(limit_fling_velocity(-1e6, 50.0, 8000.0), -8000.0, "above max");
    }
}
