//! Polygon containers shared by the slicer and the fill generators.

use serde::{Deserialize, Serialize};

use crate::point::{Point2, PointF};

/// Winding rule applied when a multi-contour region is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
}

/// Result of a point-location query against a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointLocation {
    Inside,
    OnBoundary,
    Outside,
}

/// An ordered point sequence in fixed-point coordinates.
///
/// Contours are implicitly closed; toolpath polylines use the same container
/// with open semantics. [`Polygon::close`] makes closure explicit by
/// repeating the first point, which the offset-shell operations rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point2>,
}

impl Polygon {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Builds a polygon from user-space points, rounding onto the fixed grid.
    pub fn from_float(points: &[PointF]) -> Self {
        Self {
            points: points.iter().copied().map(Point2::from_float).collect(),
        }
    }

    pub fn to_float(&self) -> Vec<PointF> {
        self.points.iter().map(|p| p.to_float()).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed shoelace area in fixed-point units squared.
    ///
    /// Positive for counter-clockwise contours; holes carry negative area.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0i128;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
        }
        sum as f64 / 2.0
    }

    /// Axis-aligned bounds, or `None` for an empty polygon.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.points.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }

    /// Whether the last point explicitly repeats the first.
    pub fn is_explicitly_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Appends the first point when the contour is not explicitly closed.
    pub fn close(&mut self) {
        if !self.points.is_empty() && !self.is_explicitly_closed() {
            self.points.push(self.points[0]);
        }
    }

    /// Chainable variant of [`Polygon::close`].
    pub fn closed(mut self) -> Self {
        self.close();
        self
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

/// A group of contours forming one region under a fill rule.
pub type Polygons = Vec<Polygon>;

/// A chain that may or may not have closed into a loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsafePolygon {
    pub path: Polygon,
    pub closed: bool,
}

pub type UnsafePolygons = Vec<UnsafePolygon>;
