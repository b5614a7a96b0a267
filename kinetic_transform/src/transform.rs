// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// Tolerance used by every comparison and clamp on transform components.
pub const EPSILON: f64 = 0.001;

/// Returns `true` if `a` and `b` are equal within [`EPSILON`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    a >= b - EPSILON && a <= b + EPSILON
}

/// Normalizes an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let mut degrees = degrees % 360.0;
    if degrees > 180.0 {
        degrees -= 360.0;
    } else if degrees <= -180.0 {
        degrees += 360.0;
    }
    degrees
}

/// Pan, zoom and rotation of an image, with a cached affine matrix.
///
/// `x`/`y` are the screen position of the image's top-left corner (the
/// image-space origin), `zoom` is a uniform scale factor and `rotation` is
/// expressed in degrees within `(-180, 180]`.
///
/// The matrix maps image coordinates to screen coordinates. It is rebuilt from
/// scratch by [`Transform::set`] and post-multiplied by the relative
/// operations, which then re-derive the scalar components from it.
///
/// Equality is tolerant: two transforms are equal if every component matches
/// within [`EPSILON`].
#[derive(Clone, Copy)]
pub struct Transform {
    x: f64,
    y: f64,
    zoom: f64,
    rotation: f64,
    matrix: Affine,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Zero translation, zoom `1.0` and no rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        zoom: 1.0,
        rotation: 0.0,
        matrix: Affine::IDENTITY,
    };

    /// Creates a transform from absolute components.
    #[must_use]
    pub fn new(x: f64, y: f64, zoom: f64, rotation: f64) -> Self {
        let mut state = Self::IDENTITY;
        state.set(x, y, zoom, rotation);
        state
    }

    /// Horizontal translation.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical translation.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Translation as a point.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Uniform zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Rotation in degrees, within `(-180, 180]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Image → screen matrix.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    /// Translates by a screen-space delta.
    pub fn translate_by(&mut self, delta: Vec2) {
        self.matrix = Affine::translate(delta) * self.matrix;
        self.update_from_matrix(false, false);
    }

    /// Moves the image origin to `pos` without changing zoom or rotation.
    pub fn translate_to(&mut self, pos: Point) {
        self.translate_by(pos - self.position());
    }

    /// Multiplies zoom by `factor`, keeping `pivot` fixed on screen.
    ///
    /// Factors that are not finite and positive are ignored.
    pub fn zoom_by(&mut self, factor: f64, pivot: Point) {
        if !is_valid_zoom(factor) {
            return;
        }
        self.matrix = scale_about(factor, pivot) * self.matrix;
        self.update_from_matrix(true, false);
    }

    /// Sets zoom to `zoom`, keeping `pivot` fixed on screen.
    ///
    /// Zooms that are not finite and positive are ignored. A transform whose
    /// own zoom is degenerate has no pivot to keep and is rebuilt at its
    /// current position instead.
    pub fn zoom_to(&mut self, zoom: f64, pivot: Point) {
        if !is_valid_zoom(zoom) {
            return;
        }
        if is_valid_zoom(self.zoom) {
            self.zoom_by(zoom / self.zoom, pivot);
        } else {
            self.set(self.x, self.y, zoom, self.rotation);
        }
    }

    /// Returns `true` if every component is finite and zoom is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.rotation.is_finite()
            && is_valid_zoom(self.zoom)
    }

    /// Rotates by `degrees`, keeping `pivot` fixed on screen.
    pub fn rotate_by(&mut self, degrees: f64, pivot: Point) {
        self.matrix = Affine::rotate_about(degrees.to_radians(), pivot) * self.matrix;
        self.update_from_matrix(false, true);
    }

    /// Sets rotation to `degrees`, keeping `pivot` fixed on screen.
    pub fn rotate_to(&mut self, degrees: f64, pivot: Point) {
        self.rotate_by(degrees - self.rotation, pivot);
    }

    /// Sets all components at once, rebuilding the matrix as
    /// scale → rotate → translate.
    ///
    /// Rotation is normalized into `(-180, 180]`.
    pub fn set(&mut self, x: f64, y: f64, zoom: f64, rotation: f64) {
        let rotation = normalize_degrees(rotation);
        self.x = x;
        self.y = y;
        self.zoom = zoom;
        self.rotation = rotation;

        let mut matrix = Affine::scale(zoom);
        if rotation != 0.0 {
            matrix = Affine::rotate(rotation.to_radians()) * matrix;
        }
        self.matrix = Affine::translate((x, y)) * matrix;
    }

    fn update_from_matrix(&mut self, update_zoom: bool, update_rotation: bool) {
        let [_, b, c, d, e, f] = self.matrix.as_coeffs();
        self.x = e;
        self.y = f;
        if update_zoom {
            self.zoom = c.hypot(d);
        }
        if update_rotation {
            self.rotation = normalize_degrees(b.atan2(d).to_degrees());
        }
    }
}

fn is_valid_zoom(zoom: f64) -> bool {
    zoom.is_finite() && zoom > 0.0
}

fn scale_about(factor: f64, pivot: Point) -> Affine {
    let center = pivot.to_vec2();
    Affine::translate(center) * Affine::scale(factor) * Affine::translate(-center)
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.zoom, other.zoom)
            && approx_eq(self.rotation, other.rotation)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("zoom", &self.zoom)
            .field("rotation", &self.rotation)
            .finish_non_exhaustive()
    }
}
