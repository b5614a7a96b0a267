// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Size, Vec2};

use crate::gravity::Gravity;

/// How the image is fitted into the movement area to compute the fit zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Fit {
    /// The whole image fits inside the movement area.
    #[default]
    Inside,
    /// The image covers the movement area entirely.
    ///
    /// This is the only mode in which movement bounds follow the image
    /// rotation: the area is rotated with the image instead of the image's
    /// bounding box being used.
    Outside,
    /// The image width matches the movement area width.
    Horizontal,
    /// The image height matches the movement area height.
    Vertical,
}

/// A configuration value rejected by [`Settings::validate`].
///
/// Invalid values are never fatal: every consumer clamps them at the point of
/// use. Validation exists so that hosts can surface configuration mistakes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingsError {
    /// A size or distance is negative or not finite.
    InvalidDimension {
        /// Setting name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The overzoom factor is below `1.0`.
    OverzoomBelowOne(f64),
    /// An explicit minimum zoom is greater than an explicit maximum zoom.
    InvertedZoomRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// The fling velocity range is inverted.
    InvertedFlingRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { field, value } => {
                write!(f, "{field} must be finite and non-negative, got {value}")
            }
            Self::OverzoomBelowOne(value) => {
                write!(f, "overzoom factor must be at least 1.0, got {value}")
            }
            Self::InvertedZoomRange { min, max } => {
                write!(f, "min zoom {min} is greater than max zoom {max}")
            }
            Self::InvertedFlingRange { min, max } => {
                write!(f, "min fling velocity {min} is greater than max fling velocity {max}")
            }
        }
    }
}

impl core::error::Error for SettingsError {}

/// Configuration consumed by the bounds policy and the gesture engine.
///
/// All setters return `&mut Self` so they can be chained:
///
/// ```rust
/// use kurbo::Size;
/// use kinetic_bounds::{Fit, Settings};
///
/// let mut settings = Settings::default();
/// settings
///     .set_viewport(Size::new(1000.0, 1000.0))
///     .set_image(Size::new(2000.0, 1000.0))
///     .set_max_zoom(4.0)
///     .set_fit(Fit::Outside);
/// assert!(settings.has_image_size() && settings.has_viewport_size());
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    viewport: Size,
    movement_area: Option<Size>,
    image: Size,
    min_zoom: f64,
    max_zoom: f64,
    double_tap_zoom: f64,
    zoom_enabled: bool,
    rotation_enabled: bool,
    restrict_rotation: bool,
    overzoom_factor: f64,
    overscroll: Vec2,
    animation_duration_ms: u64,
    fit: Fit,
    gravity: Gravity,
    touch_slop: f64,
    min_fling_velocity: f64,
    max_fling_velocity: f64,
    fling_damping: f64,
    double_tap_timeout_ms: u64,
    double_tap_slop: f64,
    long_press_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Size::ZERO,
            movement_area: None,
            image: Size::ZERO,
            min_zoom: 0.0,
            max_zoom: Self::DEFAULT_MAX_ZOOM,
            double_tap_zoom: Self::DEFAULT_DOUBLE_TAP_ZOOM,
            zoom_enabled: true,
            rotation_enabled: false,
            restrict_rotation: false,
            overzoom_factor: Self::DEFAULT_OVERZOOM_FACTOR,
            overscroll: Vec2::ZERO,
            animation_duration_ms: Self::DEFAULT_ANIMATION_DURATION_MS,
            fit: Fit::Inside,
            gravity: Gravity::CENTER,
            touch_slop: Self::DEFAULT_TOUCH_SLOP,
            min_fling_velocity: Self::DEFAULT_MIN_FLING_VELOCITY,
            max_fling_velocity: Self::DEFAULT_MAX_FLING_VELOCITY,
            fling_damping: Self::DEFAULT_FLING_DAMPING,
            double_tap_timeout_ms: Self::DEFAULT_DOUBLE_TAP_TIMEOUT_MS,
            double_tap_slop: Self::DEFAULT_DOUBLE_TAP_SLOP,
            long_press_timeout_ms: Self::DEFAULT_LONG_PRESS_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Default maximum zoom.
    pub const DEFAULT_MAX_ZOOM: f64 = 5.0;
    /// Default double-tap zoom.
    pub const DEFAULT_DOUBLE_TAP_ZOOM: f64 = 3.0;
    /// Default overzoom factor.
    pub const DEFAULT_OVERZOOM_FACTOR: f64 = 2.0;
    /// Default state animation duration.
    pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 300;
    /// Default distance a pointer travels before a scroll starts.
    pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;
    /// Default minimum fling velocity, in px/s.
    pub const DEFAULT_MIN_FLING_VELOCITY: f64 = 50.0;
    /// Default maximum fling velocity, in px/s.
    pub const DEFAULT_MAX_FLING_VELOCITY: f64 = 8000.0;
    /// Default scale applied to fling velocity before it is handed to the
    /// fling animator.
    pub const DEFAULT_FLING_DAMPING: f64 = 0.9;
    /// Default maximum delay between two taps of a double tap.
    pub const DEFAULT_DOUBLE_TAP_TIMEOUT_MS: u64 = 300;
    /// Default maximum distance between two taps of a double tap.
    pub const DEFAULT_DOUBLE_TAP_SLOP: f64 = 100.0;
    /// Default time a still pointer is held before it is a long press.
    pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 500;

    /// Creates settings for the given viewport and image sizes.
    #[must_use]
    pub fn new(viewport: Size, image: Size) -> Self {
        let mut settings = Self::default();
        settings.set_viewport(viewport).set_image(image);
        settings
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, size: Size) -> &mut Self {
        self.viewport = size;
        self
    }

    /// Movement area size, falling back to the viewport size when unset.
    #[must_use]
    pub fn movement_area(&self) -> Size {
        self.movement_area.unwrap_or(self.viewport)
    }

    /// Returns `true` if an explicit movement area was configured.
    #[must_use]
    pub fn has_movement_area(&self) -> bool {
        self.movement_area.is_some()
    }

    /// Sets an explicit movement area, or clears it with `None`.
    ///
    /// The area is placed inside the viewport according to [`Self::gravity`].
    pub fn set_movement_area(&mut self, size: Option<Size>) -> &mut Self {
        self.movement_area = size;
        self
    }

    /// Image size, in image coordinates.
    #[must_use]
    pub fn image(&self) -> Size {
        self.image
    }

    /// Sets the image size.
    pub fn set_image(&mut self, size: Size) -> &mut Self {
        self.image = size;
        self
    }

    /// Returns `true` if both image dimensions are positive.
    #[must_use]
    pub fn has_image_size(&self) -> bool {
        positive(self.image.width) && positive(self.image.height)
    }

    /// Returns `true` if both viewport dimensions are positive.
    #[must_use]
    pub fn has_viewport_size(&self) -> bool {
        positive(self.viewport.width) && positive(self.viewport.height)
    }

    /// Explicit minimum zoom, or `0.0` when it should default to the fit zoom.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        auto_zoom(self.min_zoom)
    }

    /// Sets the minimum zoom. Values `<= 0` mean "use the fit zoom".
    pub fn set_min_zoom(&mut self, zoom: f64) -> &mut Self {
        self.min_zoom = zoom;
        self
    }

    /// Explicit maximum zoom, or `0.0` when it should default to the fit zoom.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        auto_zoom(self.max_zoom)
    }

    /// Sets the maximum zoom. Values `<= 0` mean "use the fit zoom".
    pub fn set_max_zoom(&mut self, zoom: f64) -> &mut Self {
        self.max_zoom = zoom;
        self
    }

    /// Zoom targeted by a double tap, or `0.0` to target the maximum zoom.
    #[must_use]
    pub fn double_tap_zoom(&self) -> f64 {
        auto_zoom(self.double_tap_zoom)
    }

    /// Sets the double-tap zoom. Values `<= 0` target the maximum zoom.
    pub fn set_double_tap_zoom(&mut self, zoom: f64) -> &mut Self {
        self.double_tap_zoom = zoom;
        self
    }

    /// Whether pinch and double-tap zoom are enabled.
    #[must_use]
    pub fn is_zoom_enabled(&self) -> bool {
        self.zoom_enabled
    }

    /// Enables or disables zoom gestures.
    pub fn set_zoom_enabled(&mut self, enabled: bool) -> &mut Self {
        self.zoom_enabled = enabled;
        self
    }

    /// Whether two-finger rotation is enabled.
    #[must_use]
    pub fn is_rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    /// Enables or disables rotation gestures.
    pub fn set_rotation_enabled(&mut self, enabled: bool) -> &mut Self {
        self.rotation_enabled = enabled;
        self
    }

    /// Whether rotation snaps to the nearest multiple of 90° when restricted.
    #[must_use]
    pub fn is_restrict_rotation(&self) -> bool {
        self.restrict_rotation
    }

    /// Enables or disables snapping rotation to multiples of 90°.
    pub fn set_restrict_rotation(&mut self, restrict: bool) -> &mut Self {
        self.restrict_rotation = restrict;
        self
    }

    /// Whether any transform gesture is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.zoom_enabled || self.rotation_enabled
    }

    /// Whether double taps are recognized.
    #[must_use]
    pub fn is_double_tap_enabled(&self) -> bool {
        self.zoom_enabled
    }

    /// Elastic overzoom factor, never below `1.0`.
    #[must_use]
    pub fn overzoom_factor(&self) -> f64 {
        if self.overzoom_factor.is_finite() && self.overzoom_factor >= 1.0 {
            self.overzoom_factor
        } else {
            1.0
        }
    }

    /// Sets the elastic overzoom factor.
    pub fn set_overzoom_factor(&mut self, factor: f64) -> &mut Self {
        self.overzoom_factor = factor;
        self
    }

    /// Elastic overscroll distance on each axis, never negative.
    #[must_use]
    pub fn overscroll(&self) -> Vec2 {
        Vec2::new(
            non_negative(self.overscroll.x),
            non_negative(self.overscroll.y),
        )
    }

    /// Sets the elastic overscroll distance on each axis.
    pub fn set_overscroll(&mut self, overscroll: Vec2) -> &mut Self {
        self.overscroll = overscroll;
        self
    }

    /// Duration of state animations.
    #[must_use]
    pub fn animation_duration_ms(&self) -> u64 {
        self.animation_duration_ms
    }

    /// Sets the duration of state animations.
    pub fn set_animation_duration_ms(&mut self, duration: u64) -> &mut Self {
        self.animation_duration_ms = duration;
        self
    }

    /// Fit mode.
    #[must_use]
    pub fn fit(&self) -> Fit {
        self.fit
    }

    /// Sets the fit mode.
    pub fn set_fit(&mut self, fit: Fit) -> &mut Self {
        self.fit = fit;
        self
    }

    /// Gravity used to place the movement area and the image.
    #[must_use]
    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Sets the gravity.
    pub fn set_gravity(&mut self, gravity: Gravity) -> &mut Self {
        self.gravity = gravity;
        self
    }

    /// Distance a pointer must travel before a scroll starts.
    #[must_use]
    pub fn touch_slop(&self) -> f64 {
        non_negative(self.touch_slop)
    }

    /// Sets the touch slop.
    pub fn set_touch_slop(&mut self, slop: f64) -> &mut Self {
        self.touch_slop = slop;
        self
    }

    /// Minimum release velocity that starts a fling, in px/s.
    #[must_use]
    pub fn min_fling_velocity(&self) -> f64 {
        non_negative(self.min_fling_velocity)
    }

    /// Maximum fling velocity per axis, in px/s.
    #[must_use]
    pub fn max_fling_velocity(&self) -> f64 {
        non_negative(self.max_fling_velocity).max(self.min_fling_velocity())
    }

    /// Sets the fling velocity range, in px/s.
    pub fn set_fling_velocity_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.min_fling_velocity = min;
        self.max_fling_velocity = max;
        self
    }

    /// Scale applied to the fling velocity before it is animated.
    #[must_use]
    pub fn fling_damping(&self) -> f64 {
        non_negative(self.fling_damping)
    }

    /// Sets the fling damping.
    pub fn set_fling_damping(&mut self, damping: f64) -> &mut Self {
        self.fling_damping = damping;
        self
    }

    /// Maximum delay between the taps of a double tap.
    #[must_use]
    pub fn double_tap_timeout_ms(&self) -> u64 {
        self.double_tap_timeout_ms
    }

    /// Maximum distance between the taps of a double tap.
    #[must_use]
    pub fn double_tap_slop(&self) -> f64 {
        non_negative(self.double_tap_slop)
    }

    /// Sets the double-tap timing and distance tolerances.
    pub fn set_double_tap_tolerance(&mut self, timeout_ms: u64, slop: f64) -> &mut Self {
        self.double_tap_timeout_ms = timeout_ms;
        self.double_tap_slop = slop;
        self
    }

    /// Time a pointer must stay down within the touch slop to long press.
    #[must_use]
    pub fn long_press_timeout_ms(&self) -> u64 {
        self.long_press_timeout_ms
    }

    /// Sets the long-press timeout.
    pub fn set_long_press_timeout_ms(&mut self, timeout_ms: u64) -> &mut Self {
        self.long_press_timeout_ms = timeout_ms;
        self
    }

    /// Reports the first configuration mistake found, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] describing the offending value. Every
    /// consumer tolerates the reported values by clamping them.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let movement = self.movement_area();
        let dimensions = [
            ("viewport width", self.viewport.width),
            ("viewport height", self.viewport.height),
            ("movement area width", movement.width),
            ("movement area height", movement.height),
            ("image width", self.image.width),
            ("image height", self.image.height),
            ("horizontal overscroll", self.overscroll.x),
            ("vertical overscroll", self.overscroll.y),
            ("touch slop", self.touch_slop),
            ("double tap slop", self.double_tap_slop),
            ("fling damping", self.fling_damping),
        ];
        for (field, value) in dimensions {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidDimension { field, value });
            }
        }
        if self.overzoom_factor.is_nan() || self.overzoom_factor < 1.0 {
            return Err(SettingsError::OverzoomBelowOne(self.overzoom_factor));
        }
        let (min, max) = (self.min_zoom(), self.max_zoom());
        if min > 0.0 && max > 0.0 && min > max {
            return Err(SettingsError::InvertedZoomRange { min, max });
        }
        if self.min_fling_velocity > self.max_fling_velocity {
            return Err(SettingsError::InvertedFlingRange {
                min: self.min_fling_velocity,
                max: self.max_fling_velocity,
            });
        }
        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn auto_zoom(zoom: f64) -> f64 {
    non_negative(zoom)
}

#[cfg(test)]
mod tests {
    use kurbo::{Size, Vec2};

    use super::{Settings, SettingsError};

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_zoom(), 5.0);
        assert_eq!(settings.double_tap_zoom(), 3.0);
        assert_eq!(settings.min_zoom(), 0.0);
        assert_eq!(settings.overzoom_factor(), 2.0);
        assert_eq!(settings.overscroll(), Vec2::ZERO);
        assert_eq!(settings.animation_duration_ms(), 300);
        assert_eq!(settings.long_press_timeout_ms(), 500);
        assert!(settings.is_zoom_enabled());
        assert!(!settings.is_rotation_enabled());
        assert!(settings.is_enabled());
        assert!(!settings.has_image_size());
        assert!(!settings.has_viewport_size());
    }

    #[test]
    fn movement_area_falls_back_to_viewport() {
        let mut settings = Settings::new(Size::new(400.0, 300.0), Size::new(10.0, 10.0));
        assert_eq!(settings.movement_area(), Size::new(400.0, 300.0));
        assert!(!settings.has_movement_area());

        settings.set_movement_area(Some(Size::new(200.0, 100.0)));
        assert_eq!(settings.movement_area(), Size::new(200.0, 100.0));
    }

    #[test]
    fn gestures_can_be_disabled() {
        let mut settings = Settings::default();
        settings.set_zoom_enabled(false);
        assert!(!settings.is_enabled());
        assert!(!settings.is_double_tap_enabled());

        settings.set_rotation_enabled(true);
        assert!(settings.is_enabled());
    }

    #[test]
    fn invalid_values_are_clamped_and_reported() {
        let mut settings = Settings::new(Size::new(100.0, 100.0), Size::new(10.0, 10.0));
        settings.set_overzoom_factor(0.5);
        assert_eq!(settings.overzoom_factor(), 1.0);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::OverzoomBelowOne(0.5))
        );

        settings.set_overzoom_factor(2.0).set_min_zoom(4.0).set_max_zoom(2.0);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvertedZoomRange { min: 4.0, max: 2.0 })
        );

        settings.set_min_zoom(0.0).set_overscroll(Vec2::new(-1.0, 0.0));
        assert_eq!(settings.overscroll(), Vec2::ZERO);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidDimension {
                field: "horizontal overscroll",
                ..
            })
        ));
    }

    #[test]
    fn nan_zoom_limits_mean_auto() {
        let mut settings = Settings::default();
        settings.set_max_zoom(f64::NAN).set_double_tap_zoom(-1.0);
        assert_eq!(settings.max_zoom(), 0.0);
        assert_eq!(settings.double_tap_zoom(), 0.0);
    }
}
