//! Point types for the fixed-point and floating coordinate spaces.

use serde::{Deserialize, Serialize};

/// Scale factor between floating user space and fixed-point coordinates.
///
/// One user unit maps to 1e6 integer steps, so equality on [`Point2`] is a
/// robust replacement for epsilon comparison on floats.
pub const FIXED_SCALE: f64 = 1e6;

/// A 2D point in fixed-point integer coordinates.
///
/// Doubles as the quantization key that merges coincident intersection
/// points coming from adjacent faces during slicing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Point2 {
    pub x: i64,
    pub y: i64,
}

impl Point2 {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Converts a user-space point, rounding to the nearest fixed-point step.
    pub fn from_float(p: PointF) -> Self {
        Self {
            x: (p.x * FIXED_SCALE).round() as i64,
            y: (p.y * FIXED_SCALE).round() as i64,
        }
    }

    /// Quantizes raw single-precision coordinates (e.g. interpolated mesh
    /// intersections) onto the fixed-point grid.
    pub fn quantize(x: f32, y: f32) -> Self {
        Self {
            x: (x as f64 * FIXED_SCALE).round() as i64,
            y: (y as f64 * FIXED_SCALE).round() as i64,
        }
    }

    pub fn to_float(self) -> PointF {
        PointF {
            x: self.x as f64 / FIXED_SCALE,
            y: self.y as f64 / FIXED_SCALE,
        }
    }
}

/// A 2D point in floating user-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PointF) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other` at parameter `t` in `[0, 1]`.
    pub fn lerp(&self, other: &PointF, t: f64) -> PointF {
        PointF {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<PointF> for Point2 {
    fn from(p: PointF) -> Self {
        Point2::from_float(p)
    }
}

impl From<Point2> for PointF {
    fn from(p: Point2) -> Self {
        p.to_float()
    }
}
