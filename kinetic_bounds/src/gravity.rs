// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of the movement area and the image by gravity.

use kurbo::{Affine, Point, Rect, Size};

use crate::settings::Settings;

/// Alignment along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    /// Align with the minimum edge.
    Start,
    /// Center along the axis.
    #[default]
    Center,
    /// Align with the maximum edge.
    End,
}

impl Align {
    fn place(self, length: f64, min: f64, max: f64) -> f64 {
        match self {
            Self::Start => min,
            Self::Center => min + 0.5 * (max - min - length),
            Self::End => max - length,
        }
    }
}

/// Horizontal and vertical alignment of content inside a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Gravity {
    /// Horizontal alignment.
    pub horizontal: Align,
    /// Vertical alignment.
    pub vertical: Align,
}

impl Gravity {
    /// Centered on both axes.
    pub const CENTER: Self = Self::new(Align::Center, Align::Center);
    /// Top-left corner.
    pub const START: Self = Self::new(Align::Start, Align::Start);

    /// Creates a gravity from per-axis alignments.
    #[must_use]
    pub const fn new(horizontal: Align, vertical: Align) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Places a rectangle of `size` inside `container`.
    ///
    /// Content larger than the container overflows on the side(s) opposite to
    /// the alignment.
    #[must_use]
    pub fn apply(self, size: Size, container: Rect) -> Rect {
        let x = self
            .horizontal
            .place(size.width, container.x0, container.x1);
        let y = self.vertical.place(size.height, container.y0, container.y1);
        Rect::from_origin_size((x, y), size)
    }
}

/// Screen rectangle of the movement area, placed inside the viewport.
#[must_use]
pub fn movement_area_rect(settings: &Settings) -> Rect {
    let viewport = Rect::from_origin_size(Point::ZERO, settings.viewport());
    settings
        .gravity()
        .apply(settings.movement_area(), viewport)
}

/// Where the bounding box of the image under `matrix` should sit inside the
/// movement area.
#[must_use]
pub fn image_rect(matrix: Affine, settings: &Settings) -> Rect {
    let bbox = matrix.transform_rect_bbox(Rect::from_origin_size(Point::ZERO, settings.image()));
    settings
        .gravity()
        .apply(bbox.size(), movement_area_rect(settings))
}

/// Gravity point of the movement area: the pivot used when none is given.
#[must_use]
pub fn default_pivot(settings: &Settings) -> Point {
    settings
        .gravity()
        .apply(Size::ZERO, movement_area_rect(settings))
        .origin()
}
