//! Percentage to pixel mapping.

use crate::foundation::core::{Canvas, Point};
use crate::scene::model::PctPoint;

/// `dimension_px × pct / 100`. Out-of-range percentages land off-frame.
pub fn map_pct(pct: f64, dimension_px: f64) -> f64 {
    dimension_px * pct / 100.0
}

/// Resolution-bound mapper. Built fresh for every render; never cached across renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    canvas: Canvas,
}

impl CoordinateMapper {
    /// Mapper for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Horizontal percentage to pixels.
    pub fn x(&self, pct: f64) -> f64 {
        map_pct(pct, self.canvas.w())
    }

    /// Vertical percentage to pixels.
    pub fn y(&self, pct: f64) -> f64 {
        map_pct(pct, self.canvas.h())
    }

    /// Map a percentage point to absolute pixels.
    pub fn point(&self, p: PctPoint) -> Point {
        Point::new(self.x(p.x_pct), self.y(p.y_pct))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/coords.rs"]
mod tests;
