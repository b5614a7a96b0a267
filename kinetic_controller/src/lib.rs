// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinetic Controller: a gesture-driven pan, zoom and rotation engine.
//!
//! [`GestureEngine`] owns a live [`Transform`] and ties the other Kinetic
//! crates together:
//!
//! - touch events go through the `kinetic_event_state` recognizers,
//! - recognized scrolls, pinches and rotations are applied to the transform,
//!   which is kept within `kinetic_bounds` limits with elastic resistance
//!   while touching,
//! - on release it starts a fling or snaps back into bounds, and a double tap
//!   toggles between the fit zoom and the double-tap zoom, animated with
//!   `kinetic_animation` scrollers.
//!
//! Every change is reported to [`StateListener`]s. Listeners cannot call back
//! into the engine directly; they queue [`StateRequests`] that are replayed
//! after the notification pass.
//!
//! ## Minimal example
//!
//! ```rust
//! use kinetic_bounds::Settings;
//! use kinetic_controller::GestureEngine;
//! use kinetic_event_state::TouchEvent;
//! use kurbo::Size;
//!
//! let settings = Settings::new(Size::new(1000.0, 1000.0), Size::new(2000.0, 1000.0));
//! let mut engine = GestureEngine::new(settings);
//! assert!(engine.update_state(), "sizes are known, so the reset completes");
//! assert!((engine.state().zoom() - 0.5).abs() < 1e-9);
//!
//! // Double tap.
//! for (time, up) in [(0, false), (40, true), (150, false), (190, true)] {
//!     let event = if up {
//!         TouchEvent::up(time, (500.0, 500.0))
//!     } else {
//!         TouchEvent::down(time, (500.0, 500.0))
//!     };
//!     engine.on_touch(&event);
//! }
//!
//! // Run the zoom animation.
//! let mut now = 0;
//! while engine.on_frame(now) {
//!     now += 16;
//! }
//! assert!((engine.state().zoom() - 3.0).abs() < 1e-6);
//! ```
//!
//! This crate is `no_std` and uses `alloc` for listener storage.
//!
//! [`Transform`]: kinetic_transform::Transform

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod engine;
mod listeners;

pub use engine::GestureEngine;
pub use listeners::{GestureListener, ListenerId, StateListener, StateRequest, StateRequests};
