// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinetic Event State: touch gesture recognizers.
//!
//! This crate turns a stream of multi-pointer [`TouchEvent`]s into gesture
//! events. Each recognizer is a small state machine fed with every touch event:
//!
//! - [`drag`]: scroll deltas once the focus leaves its tap region
//! - [`TapState`]: single taps, double taps and long presses
//! - [`VelocityTracker`]: release velocity for flings
//! - [`PinchRecognizer`] and [`StabilizedScale`]: pinch and quick scale
//! - [`RotationRecognizer`]: two-finger rotation
//!
//! [`GestureMux`] feeds all of them and merges their output into one ordered
//! list of [`GestureEvent`]s per touch event. The recognizers do not know what
//! the gestures are applied to; thresholds come from a [`RecognizerConfig`].
//!
//! ## Pinch example
//!
//! ```rust
//! use kinetic_event_state::{GestureEvent, GestureMux, Pointer, TouchAction, TouchEvent};
//!
//! let mut mux = GestureMux::default();
//! mux.on_touch(&TouchEvent::down(0, (100.0, 100.0)));
//! mux.on_touch(&TouchEvent::new(
//!     TouchAction::PointerDown(1),
//!     10,
//!     [Pointer::new(0, (100.0, 100.0)), Pointer::new(1, (200.0, 100.0))],
//! ));
//!
//! // Spreading the pointers to twice their distance.
//! let events = mux.on_touch(&TouchEvent::new(
//!     TouchAction::Move,
//!     20,
//!     [Pointer::new(0, (50.0, 100.0)), Pointer::new(1, (250.0, 100.0))],
//! ));
//! assert!(events.contains(&GestureEvent::ScaleBegin { focus: (150.0, 100.0).into() }));
//! assert!(mux.is_scaling());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod drag;
mod mux;
mod rotate;
mod scale;
mod tap;
mod touch;
mod velocity;

pub use mux::{GestureEvent, GestureEvents, GestureMux, RecognizerConfig};
pub use rotate::{ROTATION_SLOP, RotationEvent, RotationEvents, RotationRecognizer};
pub use scale::{
    PinchRecognizer, QUICK_SCALE_MAX_FACTOR, QUICK_SCALE_MIN_FACTOR, ScaleEvent, ScaleEvents,
    ScaleInput, ScaleSource, StabilizedScale,
};
pub use tap::{DOUBLE_TAP_MIN_TIME_MS, TapOutcome, TapState};
pub use touch::{Pointer, PointerId, Pointers, TouchAction, TouchEvent};
pub use velocity::{ASSUME_STOPPED_MS, HORIZON_MS, VelocityTracker};
