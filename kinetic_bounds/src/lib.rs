// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinetic Bounds: zoom and movement limits for a gesture-driven [`Transform`].
//!
//! Bounds are not stored; they are derived from [`Settings`] and the current
//! transform each time they are needed, because they change with zoom and
//! rotation:
//!
//! - [`ZoomBounds`]: the fit zoom for the (rotated) image and the effective
//!   `min_zoom <= fit_zoom <= max_zoom` range.
//! - [`MovementBounds`]: the range of the image origin that keeps the image
//!   covering the movement area, or pinned by [`Gravity`] when it is smaller.
//! - [`BoundsPolicy`]: applies both to a transform, optionally with elastic
//!   overzoom and overscroll, and owns the reset lifecycle.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use kinetic_bounds::{BoundsPolicy, Settings};
//! use kinetic_transform::Transform;
//!
//! let settings = Settings::new(Size::new(1000.0, 1000.0), Size::new(2000.0, 1000.0));
//! let mut policy = BoundsPolicy::new(settings);
//!
//! let mut state = Transform::default();
//! assert!(policy.reset_state(&mut state));
//! assert!((state.zoom() - 0.5).abs() < 1e-9);
//! assert!((state.y() - 250.0).abs() < 1e-9);
//!
//! // Zooming out past the fit zoom is undone by a strict restriction.
//! state.zoom_to(0.1, Point::new(500.0, 500.0));
//! assert!(policy.restrict_bounds(&mut state, None, None, false, false));
//! assert!((state.zoom() - 0.5).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std`.
//!
//! [`Transform`]: kinetic_transform::Transform

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod gravity;
mod movement_bounds;
mod policy;
mod settings;
mod zoom_bounds;

pub use gravity::{Align, Gravity, default_pivot, image_rect, movement_area_rect};
pub use movement_bounds::MovementBounds;
pub use policy::{BoundsPolicy, PolicyState};
pub use settings::{Fit, Settings, SettingsError};
pub use zoom_bounds::ZoomBounds;
