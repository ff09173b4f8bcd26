//! Helpers that build volume functions for maps and outlets.

use crate::error::ReservoirError;

/// Wraps `f` so inputs outside `[min, max]` give NaN.
pub fn close_on_domain<F>(f: F, min: f64, max: f64) -> impl Fn(f64) -> f64 + Send + Sync + 'static
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    move |x| if (min..=max).contains(&x) { f(x) } else { f64::NAN }
}

/// Wraps `f` so outputs outside `[min, max]` give NaN.
pub fn close_on_range<F>(f: F, min: f64, max: f64) -> impl Fn(f64) -> f64 + Send + Sync + 'static
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    move |x| {
        let y = f(x);
        if (min..=max).contains(&y) { y } else { f64::NAN }
    }
}

/// Wraps `f` so outputs saturate at `min` and `max`. NaN maps to `min`.
pub fn clamp_to<F>(f: F, min: f64, max: f64) -> impl Fn(f64) -> f64 + Send + Sync + 'static
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    move |x| {
        let y = f(x);
        if y.is_nan() || y < min {
            min
        } else if y > max {
            max
        } else {
            y
        }
    }
}

/// Builds a piecewise-linear function through `(xs[i], ys[i])`.
///
/// Outside `[xs[0], xs[last]]` the function returns `below` / `above`, or
/// NaN when those are `None`.
///
/// # Errors
///
/// Returns [`ReservoirError::InterpolationData`] if the slices are empty,
/// differ in length, or `xs` is not strictly ascending.
pub fn interpolate_from_data(
    xs: &[f64],
    ys: &[f64],
    below: Option<f64>,
    above: Option<f64>,
) -> Result<impl Fn(f64) -> f64 + Send + Sync + 'static, ReservoirError> {
    if xs.is_empty() {
        return Err(ReservoirError::InterpolationData {
            reason: "no data points".to_string(),
        });
    }
    if xs.len() != ys.len() {
        return Err(ReservoirError::InterpolationData {
            reason: format!("{} x values and {} y values", xs.len(), ys.len()),
        });
    }
    if xs.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(ReservoirError::InterpolationData {
            reason: "x values must be strictly ascending".to_string(),
        });
    }
    let xs = xs.to_vec();
    let ys = ys.to_vec();
    Ok(move |x: f64| {
        let last = xs.len() - 1;
        if x.is_nan() {
            return f64::NAN;
        }
        if x < xs[0] {
            return below.unwrap_or(f64::NAN);
        }
        if x > xs[last] {
            return above.unwrap_or(f64::NAN);
        }
        // First knot at or beyond x.
        let i = xs.partition_point(|&k| k < x);
        if xs[i] == x {
            return ys[i];
        }
        let (x0, x1, y0, y1) = (xs[i - 1], xs[i], ys[i - 1], ys[i]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    })
}
