// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinetic Animation: frame-driven scrollers.
//!
//! - [`StateScroller`]: an eased scalar over a fixed duration, used as the
//!   progress of a transform-to-transform animation.
//! - [`FlingScroller`]: a two-dimensional fling decaying exponentially from
//!   its release velocity.
//! - [`AnimationScheduler`]: decides on which host frames an animation step
//!   runs, at a fixed cadence, and asks the host for further frames while
//!   something is moving.
//!
//! All of them take timestamps from the caller and anchor their start at the
//! first step, so they work with any millisecond clock.
//!
//! ## Minimal example
//!
//! ```rust
//! use kinetic_animation::{AnimationScheduler, StateScroller, Tick};
//!
//! let mut scheduler = AnimationScheduler::default();
//! let mut progress = StateScroller::default();
//! progress.start(0.0, 1.0, 300);
//! scheduler.request();
//!
//! let mut now = 0;
//! while scheduler.is_scheduled() {
//!     if scheduler.begin_tick(now) == Tick::Run {
//!         progress.compute(now);
//!         scheduler.end_tick(!progress.is_finished());
//!     }
//!     now += 16;
//! }
//! assert_eq!(progress.current(), 1.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc` for the frame requester.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod decay;
mod ease;
mod scheduler;
mod scroller;

pub use decay::FlingScroller;
pub use ease::Ease;
pub use scheduler::{AnimationScheduler, FrameRequester, Tick};
pub use scroller::StateScroller;
