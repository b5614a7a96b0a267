// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kinetic_transform::{Transform, approx_eq};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

use crate::gravity::{default_pivot, image_rect, movement_area_rect};
use crate::movement_bounds::MovementBounds;
use crate::settings::Settings;
use crate::zoom_bounds::ZoomBounds;

/// Lifecycle of the state owned by a [`BoundsPolicy`] client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PolicyState {
    /// Image or viewport size is not known yet; the next update retries the
    /// reset.
    #[default]
    Uninitialized,
    /// The state has been reset against known sizes and is kept in bounds.
    Ready,
}

/// Keeps a [`Transform`] within the zoom, rotation and movement bounds
/// derived from [`Settings`].
///
/// While a gesture is in progress, bounds may be exceeded by a bounded amount
/// (overzoom and overscroll), with an elastic pull toward the previous state
/// that grows with the excursion. Once the gesture ends, the state is snapped
/// back with [`BoundsPolicy::restrict_bounds_copy`].
#[derive(Clone, Debug, Default)]
pub struct BoundsPolicy {
    settings: Settings,
    state: PolicyState,
}

impl BoundsPolicy {
    /// Creates a policy over `settings`. The first update performs a reset.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: PolicyState::Uninitialized,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings. Call [`Self::update_state`] after changing them.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Reset lifecycle state.
    #[must_use]
    pub fn state(&self) -> PolicyState {
        self.state
    }

    /// Forces a reset of `state` to the fitted, unrotated placement.
    ///
    /// Returns `true` if the reset completed, which requires both the image
    /// and the viewport sizes. Otherwise the policy stays
    /// [`PolicyState::Uninitialized`] and [`Self::update_state`] retries it.
    pub fn reset_state(&mut self, state: &mut Transform) -> bool {
        self.state = PolicyState::Uninitialized;
        self.update_state(state)
    }

    /// Applies a pending reset, or re-applies strict bounds to `state`.
    ///
    /// Returns `true` only when a pending reset completed.
    pub fn update_state(&mut self, state: &mut Transform) -> bool {
        if self.state == PolicyState::Ready {
            self.restrict_bounds(state, None, None, false, true);
            return false;
        }

        let fit_zoom = ZoomBounds::new(&self.settings, &Transform::IDENTITY).fit_zoom();
        state.set(0.0, 0.0, fit_zoom, 0.0);
        let placed = image_rect(state.matrix(), &self.settings);
        state.translate_to(placed.origin());

        if self.settings.has_image_size() && self.settings.has_viewport_size() {
            self.state = PolicyState::Ready;
            log::debug!("state reset to {state:?}");
            true
        } else {
            log::trace!("reset deferred until image and viewport sizes are known");
            false
        }
    }

    /// Zoom bounds for `state`.
    #[must_use]
    pub fn zoom_bounds(&self, state: &Transform) -> ZoomBounds {
        ZoomBounds::new(&self.settings, state)
    }

    /// Movement bounds for `state`.
    #[must_use]
    pub fn movement_bounds(&self, state: &Transform) -> MovementBounds {
        MovementBounds::new(&self.settings, state)
    }

    /// Screen rectangle the image origin may travel within for `state`.
    #[must_use]
    pub fn movement_area(&self, state: &Transform) -> Rect {
        self.movement_bounds(state).external_bounds()
    }

    /// Screen rectangle of the movement area inside the viewport.
    #[must_use]
    pub fn movement_area_rect(&self) -> Rect {
        movement_area_rect(&self.settings)
    }

    /// Pivot used when a gesture does not supply one.
    #[must_use]
    pub fn default_pivot(&self) -> Point {
        default_pivot(&self.settings)
    }

    /// Returns the state a double tap at `pivot` should animate to.
    ///
    /// Zooms to the double-tap zoom (or the max zoom if unset) when the
    /// current zoom is below the midpoint between that and the fit zoom, and
    /// back to the fit zoom otherwise.
    #[must_use]
    pub fn toggle_min_max_zoom(&self, state: &Transform, pivot: Point) -> Transform {
        let bounds = self.zoom_bounds(state);
        let near = bounds.fit_zoom();
        let far = match self.settings.double_tap_zoom() {
            zoom if zoom > 0.0 => bounds.restrict(zoom, 1.0),
            _ => bounds.max_zoom(),
        };
        let middle = 0.5 * (near + far);
        let target = if state.zoom() < middle { far } else { near };

        let mut end = *state;
        end.zoom_to(target, pivot);
        end
    }

    /// Returns `state` snapped into strict bounds, or `None` if it already is.
    ///
    /// Rotation is snapped to a multiple of 90° when
    /// [`Settings::is_restrict_rotation`] is set.
    #[must_use]
    pub fn restrict_bounds_copy(
        &self,
        state: &Transform,
        pivot: Option<Point>,
    ) -> Option<Transform> {
        let mut copy = *state;
        self.restrict_bounds(&mut copy, None, pivot, false, true)
            .then_some(copy)
    }

    /// Restricts `state` to its bounds, returning `true` if it changed.
    ///
    /// - `previous`: the state before the current input batch. When given,
    ///   out-of-bounds moves away from it are resisted elastically.
    /// - `pivot`: point held fixed while snapping rotation and zoom. `None`
    ///   (or a non-finite point) uses [`Self::default_pivot`].
    /// - `allow_overzoom`: permit bounded overzoom and overscroll.
    /// - `restrict_rotation`: snap rotation to the nearest multiple of 90°,
    ///   if [`Settings::is_restrict_rotation`] also allows it.
    pub fn restrict_bounds(
        &self,
        state: &mut Transform,
        previous: Option<&Transform>,
        pivot: Option<Point>,
        allow_overzoom: bool,
        restrict_rotation: bool,
    ) -> bool {
        let pivot = pivot
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .unwrap_or_else(|| self.default_pivot());
        let mut changed = false;

        if restrict_rotation && self.settings.is_restrict_rotation() {
            let rotation = (state.rotation() / 90.0).round() * 90.0;
            if !approx_eq(rotation, state.rotation()) {
                state.rotate_to(rotation, pivot);
                changed = true;
            }
        }

        let zoom_bounds = self.zoom_bounds(state);
        let min_zoom = zoom_bounds.min_zoom();
        let max_zoom = zoom_bounds.max_zoom();
        let extra_zoom = if allow_overzoom {
            self.settings.overzoom_factor()
        } else {
            1.0
        };

        let mut zoom = zoom_bounds.restrict(state.zoom(), extra_zoom);
        if let Some(previous) = previous {
            zoom = zoom_resilience(zoom, previous.zoom(), min_zoom, max_zoom, extra_zoom);
        }
        if !approx_eq(zoom, state.zoom()) {
            state.zoom_to(zoom, pivot);
            changed = true;
        }

        let extra = if allow_overzoom {
            self.settings.overscroll()
        } else {
            Vec2::ZERO
        };
        let bounds = self.movement_bounds(state);
        let mut pos = bounds.restrict(state.position(), extra);

        // Overscroll room shrinks to nothing as zoom falls toward min / extra.
        if zoom < min_zoom && extra_zoom > 1.0 {
            let factor = ((extra_zoom * zoom / min_zoom - 1.0) / (extra_zoom - 1.0))
                .max(0.0)
                .sqrt();
            let strict = bounds.restrict(pos, Vec2::ZERO);
            pos = strict + (pos - strict) * factor;
        }

        if let Some(previous) = previous {
            let external = bounds.external_bounds();
            pos.x = translation_resilience(pos.x, previous.x(), external.x0, external.x1, extra.x);
            pos.y = translation_resilience(pos.y, previous.y(), external.y0, external.y1, extra.y);
        }

        if !approx_eq(pos.x, state.x()) || !approx_eq(pos.y, state.y()) {
            state.translate_to(pos);
            changed = true;
        }
        changed
    }
}

fn zoom_resilience(zoom: f64, previous: f64, min: f64, max: f64, extra: f64) -> f64 {
    if extra == 1.0 {
        return zoom;
    }
    let resilience = if zoom < min && zoom < previous {
        (min - zoom) / (min - min / extra)
    } else if zoom > max && zoom > previous {
        (zoom - max) / (max * extra - max)
    } else {
        return zoom;
    };
    zoom + resilience.sqrt() * (previous - zoom)
}

fn translation_resilience(value: f64, previous: f64, min: f64, max: f64, overscroll: f64) -> f64 {
    if overscroll == 0.0 {
        return value;
    }
    let avg = 0.5 * (value + previous);
    let resilience = if avg < min && value < previous {
        (min - avg) / overscroll
    } else if avg > max && value > previous {
        (avg - max) / overscroll
    } else {
        return value;
    };
    value - resilience.min(1.0).sqrt() * (value - previous)
}
