// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kinetic Transform: the mutable pan/zoom/rotation state behind a gesture view.
//!
//! A [`Transform`] holds a translation (`x`, `y`), a uniform `zoom` and a
//! `rotation` in degrees, together with a cached [`kurbo::Affine`] that is kept
//! consistent with those scalars. It is the single piece of state that the
//! rest of the Kinetic crates read, restrict and animate.
//!
//! - Absolute updates ([`Transform::set`]) rebuild the matrix as
//!   scale → rotate → translate.
//! - Relative updates ([`Transform::translate_by`], [`Transform::zoom_by`],
//!   [`Transform::rotate_by`] and their `*_to` counterparts) post-multiply the
//!   matrix about a pivot and re-derive the scalars from it, so the pivot's
//!   screen position is unchanged by the operation.
//! - Comparisons use a fixed tolerance of [`EPSILON`].
//!
//! The [`interpolate`] helpers blend two transforms for animations and remap
//! pivots between them.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use kinetic_transform::Transform;
//!
//! let mut state = Transform::default();
//! state.set(10.0, 20.0, 2.0, 0.0);
//!
//! // Zooming about a pivot keeps that pivot fixed on screen.
//! let pivot = Point::new(100.0, 100.0);
//! let before = state.matrix().inverse() * pivot;
//! state.zoom_by(1.5, pivot);
//! let after = state.matrix() * before;
//!
//! assert!((state.zoom() - 3.0).abs() < 1e-9);
//! assert!((after.x - pivot.x).abs() < 1e-9 && (after.y - pivot.y).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod interpolate;
mod transform;

pub use interpolate::{compute_new_position, interpolate, interpolate_about, lerp, restrict};
pub use transform::{EPSILON, Transform, approx_eq, normalize_degrees};
