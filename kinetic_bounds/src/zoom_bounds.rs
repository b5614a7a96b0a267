// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kinetic_transform::{Transform, restrict};
use kurbo::{Affine, Point, Rect, Size};

use crate::settings::{Fit, Settings};

/// Effective zoom limits for a given state.
///
/// The fit zoom depends on the image rotation, so bounds are recomputed for
/// every state they are applied to. The limits always satisfy
/// `min_zoom <= fit_zoom <= max_zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    min_zoom: f64,
    max_zoom: f64,
    fit_zoom: f64,
}

impl ZoomBounds {
    /// Computes zoom bounds for `state` under `settings`.
    ///
    /// If the image or the movement area has a zero dimension, every limit is
    /// `1.0`.
    #[must_use]
    pub fn new(settings: &Settings, state: &Transform) -> Self {
        let image = settings.image();
        let area = settings.movement_area();
        if !settings.has_image_size() || !(area.width > 0.0 && area.height > 0.0) {
            return Self {
                min_zoom: 1.0,
                max_zoom: 1.0,
                fit_zoom: 1.0,
            };
        }

        let rotation = state.rotation();
        let (image, area) = if settings.fit() == Fit::Outside {
            // The area follows the image rotation instead.
            (image, rotated_size(area, -rotation))
        } else {
            (rotated_size(image, rotation), area)
        };

        let fit_zoom = match settings.fit() {
            Fit::Inside => (area.width / image.width).min(area.height / image.height),
            Fit::Outside => (area.width / image.width).max(area.height / image.height),
            Fit::Horizontal => area.width / image.width,
            Fit::Vertical => area.height / image.height,
        };

        let mut min_zoom = settings.min_zoom();
        let mut max_zoom = settings.max_zoom();
        if min_zoom <= 0.0 {
            min_zoom = fit_zoom;
        }
        if max_zoom <= 0.0 {
            max_zoom = fit_zoom;
        }
        if fit_zoom > max_zoom {
            max_zoom = fit_zoom;
        }
        if min_zoom > max_zoom {
            min_zoom = max_zoom;
        }
        if fit_zoom < min_zoom {
            min_zoom = fit_zoom;
        }

        Self {
            min_zoom,
            max_zoom,
            fit_zoom,
        }
    }

    /// Lowest allowed zoom.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Highest allowed zoom.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Zoom at which the image fits the movement area.
    #[must_use]
    pub fn fit_zoom(&self) -> f64 {
        self.fit_zoom
    }

    /// Clamps `zoom` into `[min_zoom / extra, max_zoom * extra]`.
    #[must_use]
    pub fn restrict(&self, zoom: f64, extra: f64) -> f64 {
        restrict(zoom, self.min_zoom / extra, self.max_zoom * extra)
    }
}

fn rotated_size(size: Size, degrees: f64) -> Size {
    if degrees == 0.0 {
        return size;
    }
    Affine::rotate(degrees.to_radians())
        .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, size))
        .size()
}

#[cfg(test)]
mod tests {
    use kinetic_transform::Transform;
    use kurbo::Size;

    use super::ZoomBounds;
    use crate::{Fit, Settings};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn settings() -> Settings {
        Settings::new(Size::new(1000.0, 1000.0), Size::new(2000.0, 1000.0))
    }

    #[test]
    fn fit_modes() {
        let mut settings = settings();
        let state = Transform::IDENTITY;
        let fit = |settings: &Settings| ZoomBounds::new(settings, &state).fit_zoom();

        assert_close(fit(&settings), 0.5);
        settings.set_fit(Fit::Outside);
        assert_close(fit(&settings), 1.0);
        settings.set_fit(Fit::Horizontal);
        assert_close(fit(&settings), 0.5);
        settings.set_fit(Fit::Vertical);
        assert_close(fit(&settings), 1.0);
    }

    #[test]
    fn limits_default_to_fit_and_bracket_it() {
        let mut settings = settings();
        let bounds = ZoomBounds::new(&settings, &Transform::IDENTITY);
        assert_close(bounds.min_zoom(), 0.5);
        assert_close(bounds.max_zoom(), 5.0);

        // A max below fit is raised to fit.
        settings.set_max_zoom(0.25);
        let bounds = ZoomBounds::new(&settings, &Transform::IDENTITY);
        assert_close(bounds.max_zoom(), 0.5);
        assert_close(bounds.min_zoom(), 0.5);

        // A min above fit is lowered to fit.
        settings.set_max_zoom(4.0).set_min_zoom(2.0);
        let bounds = ZoomBounds::new(&settings, &Transform::IDENTITY);
        assert_close(bounds.min_zoom(), 0.5);
        assert_close(bounds.max_zoom(), 4.0);
    }

    #[test]
    fn rotation_changes_fit() {
        let settings = settings();
        let state = Transform::new(0.0, 0.0, 1.0, 90.0);
        // Rotated image is 1000x2000.
        assert_close(ZoomBounds::new(&settings, &state).fit_zoom(), 0.5);

        let square = Settings::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0));
        let state = Transform::new(0.0, 0.0, 1.0, 45.0);
        assert_close(
            ZoomBounds::new(&square, &state).fit_zoom(),
            1.0 / 2.0_f64.sqrt(),
        );
    }

    #[test]
    fn zero_sizes_collapse_to_one() {
        let settings = Settings::new(Size::new(1000.0, 1000.0), Size::ZERO);
        let bounds = ZoomBounds::new(&settings, &Transform::IDENTITY);
        assert_eq!(bounds.min_zoom(), 1.0);
        assert_eq!(bounds.max_zoom(), 1.0);
        assert_eq!(bounds.fit_zoom(), 1.0);
    }

    #[test]
    fn restrict_with_extra() {
        let bounds = ZoomBounds::new(&settings(), &Transform::IDENTITY);
        assert_close(bounds.restrict(0.1, 1.0), 0.5);
        assert_close(bounds.restrict(0.1, 2.0), 0.25);
        assert_close(bounds.restrict(20.0, 2.0), 10.0);
        assert_close(bounds.restrict(2.0, 2.0), 2.0);
    }
}
