//! Two-point interpolation between neighbouring rule-curve knots.

use std::fmt;

/// Interpolates a value at `x` between `(x0, y0)` and `(x1, y1)`, where
/// `x0 < x <= x1`.
pub trait Interpolator: fmt::Debug + Send + Sync {
    /// Returns the interpolated value.
    fn interpolate(&self, x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64;
}

/// Straight line between the two knots.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn interpolate(&self, x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// Holds the lower knot's value until the upper knot is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Step;

impl Interpolator for Step {
    fn interpolate(&self, _x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
        if x >= x1 { y1 } else { y0 }
    }
}
