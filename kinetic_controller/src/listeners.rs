// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer interfaces of the gesture engine.
//!
//! Listeners are called while the engine is busy notifying, so they cannot
//! call back into it. Instead they push [`StateRequest`]s onto the
//! [`StateRequests`] they are handed; the engine replays those once the
//! current notification pass is complete.

use kinetic_transform::Transform;
use kurbo::Point;
use smallvec::SmallVec;

/// Receives state changes.
pub trait StateListener {
    /// Called after any change of the live transform.
    fn on_state_changed(&mut self, state: &Transform, requests: &mut StateRequests);

    /// Called when a reset completed, before the matching
    /// [`on_state_changed`](Self::on_state_changed).
    fn on_state_reset(&mut self, old: &Transform, new: &Transform, requests: &mut StateRequests) {
        let _ = (old, new, requests);
    }
}

impl<F> StateListener for F
where
    F: FnMut(&Transform, &mut StateRequests),
{
    fn on_state_changed(&mut self, state: &Transform, requests: &mut StateRequests) {
        self(state, requests);
    }
}

/// Receives raw gesture milestones.
///
/// All methods have empty defaults.
pub trait GestureListener {
    /// The first pointer went down.
    fn on_down(&mut self, pos: Point) {
        let _ = pos;
    }

    /// The last pointer went up, or the stream was cancelled.
    fn on_up_or_cancel(&mut self) {}

    /// A tap ended. The return value tells whether it was handled.
    fn on_single_tap_up(&mut self, pos: Point) -> bool {
        let _ = pos;
        false
    }

    /// A tap was not followed by a second one within the double-tap timeout.
    ///
    /// Only fires from [`GestureEngine::on_frame`] or a later touch batch, so
    /// it is late by up to one frame. The return value tells whether it was
    /// handled.
    ///
    /// [`GestureEngine::on_frame`]: crate::GestureEngine::on_frame
    fn on_single_tap_confirmed(&mut self, pos: Point) -> bool {
        let _ = pos;
        false
    }

    /// A double tap ended. Returning `true` consumes it and suppresses the
    /// zoom toggle.
    fn on_double_tap(&mut self, pos: Point) -> bool {
        let _ = pos;
        false
    }

    /// The first pointer stayed down within the touch slop past the long-press
    /// timeout. Its release is not a tap.
    fn on_long_press(&mut self, pos: Point) {
        let _ = pos;
    }
}

/// Handle for removing a state listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// A change a listener asks the engine to make after notifying.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateRequest {
    /// Animate to a transform, kept in bounds.
    AnimateTo(Transform),
    /// Replace the transform and re-apply bounds.
    SetState(Transform),
    /// Reset to the fitted placement.
    Reset,
    /// Re-apply settings and bounds.
    UpdateState,
    /// Stop the fling and state animations.
    StopAnimations,
}

/// Requests collected during one notification pass, in order.
#[derive(Clone, Debug, Default)]
pub struct StateRequests {
    queue: SmallVec<[StateRequest; 2]>,
}

impl StateRequests {
    /// Asks for an animation to `state`.
    pub fn animate_to(&mut self, state: Transform) {
        self.queue.push(StateRequest::AnimateTo(state));
    }

    /// Asks to replace the transform with `state`.
    pub fn set_state(&mut self, state: Transform) {
        self.queue.push(StateRequest::SetState(state));
    }

    /// Asks for a reset.
    pub fn reset(&mut self) {
        self.queue.push(StateRequest::Reset);
    }

    /// Asks to re-apply settings and bounds.
    pub fn update_state(&mut self) {
        self.queue.push(StateRequest::UpdateState);
    }

    /// Asks to stop all animations.
    pub fn stop_animations(&mut self) {
        self.queue.push(StateRequest::StopAnimations);
    }

    /// Returns `true` if nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Requests in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &StateRequest> + '_ {
        self.queue.iter()
    }

    pub(crate) fn take(&mut self) -> SmallVec<[StateRequest; 2]> {
        core::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use kinetic_transform::Transform;

    use super::{StateListener, StateRequest, StateRequests};

    #[test]
    fn closures_are_listeners() {
        let mut seen = 0;
        let mut requests = StateRequests::default();
        {
            let mut listener = |state: &Transform, requests: &mut StateRequests| {
                seen += 1;
                if state.zoom() > 2.0 {
                    requests.reset();
                }
            };
            listener.on_state_changed(&Transform::new(0.0, 0.0, 3.0, 0.0), &mut requests);
            listener.on_state_reset(&Transform::IDENTITY, &Transform::IDENTITY, &mut requests);
        }
        assert_eq!(seen, 1, "reset reached the closure");
        assert_eq!(requests.take().as_slice(), &[StateRequest::Reset], "unexpected requests");
    }

    #[test]
    fn take_drains_in_order() {
        let mut requests = StateRequests::default();
        requests.stop_animations();
        requests.update_state();
        let taken = requests.take();
        assert_eq!(
            taken.as_slice(),
            &[StateRequest::StopAnimations, StateRequest::UpdateState],
            "order not kept"
        );
        assert!(requests.is_empty(), "requests left behind");
    }
}
