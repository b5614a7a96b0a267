// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kinetic_transform::{Transform, approx_eq, restrict};
use kurbo::{Affine, Point, Rect, Vec2};

use crate::gravity::{image_rect, movement_area_rect};
use crate::settings::{Fit, Settings};

/// Allowed range of the image origin (`x`, `y`) for a given state.
///
/// Bounds are stored as an axis-aligned rectangle, optionally in a frame
/// rotated about a pivot (only for [`Fit::Outside`], where the movement area
/// turns with the image). Points are rotated into that frame before they are
/// clamped and rotated back afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementBounds {
    bounds: Rect,
    rotation: f64,
    pivot: Point,
}

impl MovementBounds {
    /// Computes movement bounds for `state` under `settings`.
    ///
    /// On each axis where the image is larger than the movement area, the
    /// origin may range so that the image always covers the area; otherwise it
    /// is pinned to the position given by the gravity.
    #[must_use]
    pub fn new(settings: &Settings, state: &Transform) -> Self {
        let mut area = movement_area_rect(settings);

        let rotated = settings.fit() == Fit::Outside && !approx_eq(state.rotation(), 0.0);
        let (rotation, pivot) = if rotated {
            (state.rotation(), area.center())
        } else {
            (0.0, Point::ZERO)
        };

        let mut matrix = state.matrix();
        if rotation != 0.0 {
            let unrotate = Affine::rotate_about(-rotation.to_radians(), pivot);
            area = unrotate.transform_rect_bbox(area);
            matrix = unrotate * matrix;
        }

        let placed = image_rect(matrix, settings);
        let (x0, x1) = axis_range(area.x0, area.x1, placed.x0, placed.x1);
        let (y0, y1) = axis_range(area.y0, area.y1, placed.y0, placed.y1);

        // Bounds above are for the image bounding box; shift them to the origin.
        let image = Rect::from_origin_size(Point::ZERO, settings.image());
        let offset = (matrix * Point::ZERO) - matrix.transform_rect_bbox(image).origin();

        Self {
            bounds: Rect::new(x0, y0, x1, y1) + offset,
            rotation,
            pivot,
        }
    }

    /// Grows the bounds so that `pos` is inside them.
    pub fn extend(&mut self, pos: Point) {
        let pos = self.to_bounds_frame(pos);
        self.bounds = self.bounds.union_pt(pos);
    }

    /// Axis-aligned screen rectangle enclosing the bounds.
    #[must_use]
    pub fn external_bounds(&self) -> Rect {
        if self.rotation == 0.0 {
            self.bounds
        } else {
            Affine::rotate_about(self.rotation.to_radians(), self.pivot)
                .transform_rect_bbox(self.bounds)
        }
    }

    /// Clamps `pos` into the bounds, expanded by `extra` on each axis.
    #[must_use]
    pub fn restrict(&self, pos: Point, extra: Vec2) -> Point {
        let local = self.to_bounds_frame(pos);
        let clamped = Point::new(
            restrict(local.x, self.bounds.x0 - extra.x, self.bounds.x1 + extra.x),
            restrict(local.y, self.bounds.y0 - extra.y, self.bounds.y1 + extra.y),
        );
        if self.rotation == 0.0 {
            clamped
        } else {
            Affine::rotate_about(self.rotation.to_radians(), self.pivot) * clamped
        }
    }

    fn to_bounds_frame(&self, pos: Point) -> Point {
        if self.rotation == 0.0 {
            pos
        } else {
            Affine::rotate_about(-self.rotation.to_radians(), self.pivot) * pos
        }
    }
}

fn axis_range(area_min: f64, area_max: f64, image_min: f64, image_max: f64) -> (f64, f64) {
    let overflow = (image_max - image_min) - (area_max - area_min);
    if overflow > 0.0 {
        (area_min - overflow, area_min)
    } else {
        (image_min, image_min)
    }
}

#[cfg(test)]
mod tests {
    use kinetic_transform::Transform;
    use kurbo::{Point, Rect, Size, Vec2};

    use super::MovementBounds;
    use crate::{Fit, Settings};

    fn assert_point(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-6, "{a:?} != {b:?}");
    }

    fn assert_rect(a: Rect, b: Rect) {
        assert_point(a.origin(), b.origin());
        assert_point(Point::new(a.x1, a.y1), Point::new(b.x1, b.y1));
    }

    fn settings() -> Settings {
        Settings::new(Size::new(1000.0, 1000.0), Size::new(2000.0, 1000.0))
    }

    #[test]
    fn small_image_is_pinned_by_gravity() {
        let bounds = MovementBounds::new(&settings(), &Transform::new(0.0, 0.0, 0.5, 0.0));
        assert_eq!(bounds.external_bounds(), Rect::new(0.0, 250.0, 0.0, 250.0));
        assert_point(
            bounds.restrict(Point::new(300.0, -10.0), Vec2::ZERO),
            Point::new(0.0, 250.0),
        );
    }

    #[test]
    fn large_image_covers_area() {
        let bounds = MovementBounds::new(&settings(), &Transform::IDENTITY);
        assert_eq!(bounds.external_bounds(), Rect::new(-1000.0, 0.0, 0.0, 0.0));
        assert_point(
            bounds.restrict(Point::new(-400.0, 30.0), Vec2::ZERO),
            Point::new(-400.0, 0.0),
        );
        assert_point(
            bounds.restrict(Point::new(-1100.0, 30.0), Vec2::new(50.0, 20.0)),
            Point::new(-1050.0, 20.0),
        );
    }

    #[test]
    fn inside_fit_uses_rotated_bounding_box() {
        let state = Transform::new(750.0, 0.0, 0.5, 90.0);
        let bounds = MovementBounds::new(&settings(), &state);
        // Rotated image is 500x1000; its origin sits at the top-right corner.
        assert_rect(bounds.external_bounds(), Rect::new(750.0, 0.0, 750.0, 0.0));
        assert_point(bounds.restrict(state.position(), Vec2::ZERO), state.position());
    }

    #[test]
    fn outside_fit_rotates_the_bounds() {
        let mut settings = Settings::new(Size::new(100.0, 100.0), Size::new(200.0, 100.0));
        settings.set_fit(Fit::Outside);
        let mut state = Transform::new(-50.0, 0.0, 1.0, 0.0);
        state.rotate_by(30.0, Point::new(50.0, 50.0));

        let bounds = MovementBounds::new(&settings, &state);
        // Rotating about the area center keeps the image centered and in bounds.
        assert_point(bounds.restrict(state.position(), Vec2::ZERO), state.position());

        // Sliding along the rotated long axis is allowed, across it is not.
        let (sin, cos) = 30.0_f64.to_radians().sin_cos();
        let along = state.position() + Vec2::new(cos, sin) * 20.0;
        assert_point(bounds.restrict(along, Vec2::ZERO), along);
        let across = state.position() + Vec2::new(-sin, cos) * 20.0;
        assert_point(bounds.restrict(across, Vec2::ZERO), state.position());
    }

    #[test]
    fn extend_includes_point() {
        let mut bounds = MovementBounds::new(&settings(), &Transform::IDENTITY);
        bounds.extend(Point::new(100.0, -20.0));
        assert_eq!(bounds.external_bounds(), Rect::new(-1000.0, -20.0, 100.0, 0.0));
    }
}
