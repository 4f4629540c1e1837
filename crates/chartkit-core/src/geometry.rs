//! Geometry primitives shared by the locator and the hit tester.
//!
//! Two coordinate spaces exist side by side:
//! - **Paper space** ([`PixelPoint`]): pixels relative to the whole chart
//!   drawing area, margins included, +Y pointing down.
//! - **Data space** ([`DataPoint`]): x in chart time-axis units, y in the
//!   value units of a particular subplot.

use serde::{Deserialize, Serialize};

/// A point in paper space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared euclidean distance to another point.
    pub fn distance_sq(&self, other: &PixelPoint) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }
}

/// A point in the data space of one subplot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
///
/// A degenerate segment (`a == b`) is treated as a single point.
pub fn segment_distance_sq(p: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    let l2 = a.distance_sq(&b);
    if l2 == 0.0 {
        return p.distance_sq(&a);
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / l2;
    let t = t.clamp(0.0, 1.0);
    let proj = PixelPoint::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance_sq(&proj)
}
