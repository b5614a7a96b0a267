// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interpolation, clamping and pivot remapping helpers.
//!
//! These are pure functions over [`Transform`] values. Transforms are `Copy`,
//! so blending two of them on every animation frame does not allocate.

use kurbo::{Point, Vec2};

use crate::transform::{Transform, approx_eq};

/// Linear interpolation between `start` and `end`.
#[must_use]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor
}

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: if `min > max` the result is `max`.
#[must_use]
pub fn restrict(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Interpolates between two transforms, using each one's position as its pivot.
#[must_use]
pub fn interpolate(start: &Transform, end: &Transform, factor: f64) -> Transform {
    interpolate_about(start, start.position(), end, end.position(), factor)
}

/// Interpolates between two transforms about a moving pivot.
///
/// Zoom and rotation are interpolated linearly and applied about
/// `start_pivot`; the result is then translated by the interpolated pivot
/// displacement (`end_pivot - start_pivot`), so the pivot glides from its
/// start to its end location.
///
/// Rotation follows the shorter arc: when the endpoints are more than 180°
/// apart they are both mapped into `[0, 360)` before interpolating.
#[must_use]
pub fn interpolate_about(
    start: &Transform,
    start_pivot: Point,
    end: &Transform,
    end_pivot: Point,
    factor: f64,
) -> Transform {
    let mut out = *start;

    if !approx_eq(start.zoom(), end.zoom()) {
        out.zoom_to(lerp(start.zoom(), end.zoom(), factor), start_pivot);
    }

    let start_rotation = start.rotation();
    let end_rotation = end.rotation();
    let rotation = if (start_rotation - end_rotation).abs() <= 180.0 {
        (!approx_eq(start_rotation, end_rotation))
            .then(|| lerp(start_rotation, end_rotation, factor))
    } else {
        let start_positive = positive_degrees(start_rotation);
        let end_positive = positive_degrees(end_rotation);
        (!approx_eq(start_positive, end_positive))
            .then(|| lerp(start_positive, end_positive, factor))
    };
    if let Some(rotation) = rotation {
        out.rotate_to(rotation, start_pivot);
    }

    let shift = end_pivot - start_pivot;
    out.translate_by(Vec2::new(lerp(0.0, shift.x, factor), lerp(0.0, shift.y, factor)));
    out
}

fn positive_degrees(degrees: f64) -> f64 {
    if degrees < 0.0 { degrees + 360.0 } else { degrees }
}

/// Maps a screen point attached to the image under `initial` to where the
/// same image point lands under `target`.
///
/// Returns `point` unchanged if `initial` is not invertible.
#[must_use]
pub fn compute_new_position(point: Point, initial: &Transform, target: &Transform) -> Point {
    let matrix = initial.matrix();
    if matrix.determinant().abs() < f64::EPSILON {
        return point;
    }
    target.matrix() * (matrix.inverse() * point)
}
