//! Seasonal target storage by day of the water year.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use canteen_calendar::{dowy, water_year_length};

use crate::error::OperationsError;
use crate::interpolate::{Interpolator, Linear};

/// Target storage volume as a function of the day of the water year.
///
/// The curve lives on a circle of `end_of_water_year` days. Queries before
/// the first configured day interpolate from the previous year's last
/// target; queries after the last day interpolate towards the next year's
/// first target. Both wrap through the same bridging segment, so the curve
/// is continuous at the year boundary.
///
/// Day and target violations are collected in [`messages`](Self::messages)
/// and make [`target_volume`](Self::target_volume) fail.
#[derive(Debug, Clone)]
pub struct RuleCurve {
    pairs: Vec<(u16, f64)>,
    end_of_water_year: u16,
    interpolator: Arc<dyn Interpolator>,
    messages: Vec<String>,
}

impl RuleCurve {
    /// Builds a curve from `(day of water year, target volume)` pairs.
    /// Pairs are sorted by day. When a day is given more than once, the first
    /// pair for it is kept and the rest are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`OperationsError::EmptyRuleCurve`] if `pairs` is empty.
    pub fn new(
        pairs: impl IntoIterator<Item = (u16, f64)>,
        leap_year: bool,
    ) -> Result<Self, OperationsError> {
        let mut pairs: Vec<(u16, f64)> = pairs.into_iter().collect();
        if pairs.is_empty() {
            return Err(OperationsError::EmptyRuleCurve);
        }
        pairs.sort_by_key(|p| p.0);
        let n_given = pairs.len();
        pairs.dedup_by_key(|p| p.0);
        if pairs.len() < n_given {
            warn!(n_dropped = n_given - pairs.len(), "rule curve days repeated, keeping the first target");
        }
        let end_of_water_year = water_year_length(leap_year);
        let messages = validate(&pairs, end_of_water_year);
        if !messages.is_empty() {
            warn!(n_messages = messages.len(), "rule curve failed validation");
        }
        Ok(Self {
            pairs,
            end_of_water_year,
            interpolator: Arc::new(Linear),
            messages,
        })
    }

    /// Builds a curve from `(date, target volume)` pairs, converting each
    /// date to its day of the water year.
    ///
    /// # Errors
    ///
    /// Returns [`OperationsError::EmptyRuleCurve`] if `pairs` is empty.
    pub fn from_dates(
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
        leap_year: bool,
    ) -> Result<Self, OperationsError> {
        Self::new(pairs.into_iter().map(|(d, v)| (dowy(d), v)), leap_year)
    }

    /// Replaces the linear interpolation between knots.
    pub fn with_interpolator(mut self, interpolator: impl Interpolator + 'static) -> Self {
        self.interpolator = Arc::new(interpolator);
        self
    }

    /// Returns the pairs, sorted by day.
    pub fn pairs(&self) -> &[(u16, f64)] {
        &self.pairs
    }

    /// Returns the configured days.
    pub fn days(&self) -> Vec<u16> {
        self.pairs.iter().map(|p| p.0).collect()
    }

    /// Returns the configured targets, in day order.
    pub fn targets(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.1).collect()
    }

    /// Returns the length of the water year the curve is defined on.
    pub fn end_of_water_year(&self) -> u16 {
        self.end_of_water_year
    }

    /// Returns `true` if every day and target passed validation.
    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the validation messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns the target volume on day `dowy` of the water year.
    ///
    /// `dowy` may be 0, which is the same point on the circle as
    /// `end_of_water_year`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationsError::InvalidRuleCurve`] for an invalid curve and
    /// [`OperationsError::OutOfRange`] if `dowy` is outside
    /// `[0, end_of_water_year]`.
    pub fn target_volume(&self, dowy: u16) -> Result<f64, OperationsError> {
        if !self.is_valid() {
            return Err(OperationsError::InvalidRuleCurve {
                messages: self.messages.clone(),
            });
        }
        if dowy > self.end_of_water_year {
            return Err(OperationsError::OutOfRange {
                name: "dowy".to_string(),
                value: f64::from(dowy),
                min: 0.0,
                max: f64::from(self.end_of_water_year),
                context: "RuleCurve::target_volume".to_string(),
            });
        }
        if let Some(&(_, target)) = self.pairs.iter().find(|p| p.0 == dowy) {
            return Ok(target);
        }

        let knots = self.knots();
        let x = f64::from(dowy);
        if let Some(&(_, target)) = knots.iter().find(|k| k.0 == x) {
            return Ok(target);
        }
        // Knots span (last - E, first + E), which covers every valid day.
        let i = knots.partition_point(|k| k.0 < x);
        let (x0, y0) = knots[i - 1];
        let (x1, y1) = knots[i];
        Ok(self.interpolator.interpolate(x0, y0, x1, y1, x))
    }

    /// The configured pairs padded with the neighbouring years' ends.
    fn knots(&self) -> Vec<(f64, f64)> {
        let e = f64::from(self.end_of_water_year);
        let (first_day, first_target) = self.pairs[0];
        let (last_day, last_target) = self.pairs[self.pairs.len() - 1];
        let mut knots = Vec::with_capacity(self.pairs.len() + 2);
        knots.push((f64::from(last_day) - e, last_target));
        knots.extend(self.pairs.iter().map(|&(d, t)| (f64::from(d), t)));
        knots.push((f64::from(first_day) + e, first_target));
        knots
    }
}

fn validate(pairs: &[(u16, f64)], end_of_water_year: u16) -> Vec<String> {
    let mut messages = Vec::new();
    for &(day, target) in pairs {
        if !(1..=end_of_water_year).contains(&day) {
            messages.push(format!(
                "the day value {day} of RuleCurve::new is not on the valid range [1, {end_of_water_year}]"
            ));
        }
        if !(target >= 0.0 && target.is_finite()) {
            messages.push(format!(
                "the target value {target} of RuleCurve::new is not on the valid range [0, inf)"
            ));
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    use crate::interpolate::Step;

    #[test]
    fn repeated_day_keeps_first_target() {
        let rc = RuleCurve::new([(300, 1.0), (100, 4.0), (1, 2.0), (100, 9.0)], false).unwrap();
        assert!(rc.is_valid());
        assert_eq!(rc.pairs(), &[(1, 2.0), (100, 4.0), (300, 1.0)]);
        assert_abs_diff_eq!(rc.target_volume(100).unwrap(), 4.0);
        assert_abs_diff_eq!(rc.target_volume(200).unwrap(), 2.5);
    }

    #[test]
    fn wraps_to_next_year() {
        let rc = RuleCurve::new([(1, 0.0), (362, 0.0), (364, 1.0)], false).unwrap();
        assert_abs_diff_eq!(rc.target_volume(363).unwrap(), 0.5);
        assert_abs_diff_eq!(rc.target_volume(365).unwrap(), 0.5);
    }

    #[test]
    fn wraps_to_previous_year() {
        let rc = RuleCurve::new([(2, 0.0), (365, 1.0)], false).unwrap();
        assert_abs_diff_eq!(rc.target_volume(1).unwrap(), 0.5);
    }

    #[test]
    fn exact_day_returns_target() {
        let rc = RuleCurve::new([(1, 0.0), (100, 3.3), (364, 1.0)], false).unwrap();
        assert_eq!(rc.target_volume(1).unwrap(), 0.0);
        assert_eq!(rc.target_volume(100).unwrap(), 3.3);
        assert_eq!(rc.target_volume(364).unwrap(), 1.0);
    }

    #[test]
    fn continuous_at_year_boundary() {
        let rc = RuleCurve::new([(30, 4.0), (200, 10.0), (300, 6.0)], false).unwrap();
        let at_zero = rc.target_volume(0).unwrap();
        let at_end = rc.target_volume(365).unwrap();
        assert_abs_diff_eq!(at_zero, at_end, epsilon = 1e-12);
    }

    #[test]
    fn pairs_are_sorted() {
        let rc = RuleCurve::new([(300, 1.0), (10, 2.0)], true).unwrap();
        assert_eq!(rc.days(), vec![10, 300]);
        assert_eq!(rc.targets(), vec![2.0, 1.0]);
        assert_eq!(rc.end_of_water_year(), 366);
    }

    #[test]
    fn out_of_range_day() {
        let rc = RuleCurve::new([(1, 0.0)], false).unwrap();
        let err = rc.target_volume(366).unwrap_err();
        assert!(matches!(err, OperationsError::OutOfRange { value, .. } if value == 366.0));
    }

    #[test]
    fn single_pair_is_constant() {
        let rc = RuleCurve::new([(100, 7.0)], false).unwrap();
        assert_eq!(rc.target_volume(0).unwrap(), 7.0);
        assert_eq!(rc.target_volume(250).unwrap(), 7.0);
    }

    #[test]
    fn invalid_pairs_collected() {
        let rc = RuleCurve::new([(0, 1.0), (400, -1.0)], false).unwrap();
        assert!(!rc.is_valid());
        assert_eq!(rc.messages().len(), 3);
        assert!(matches!(
            rc.target_volume(10),
            Err(OperationsError::InvalidRuleCurve { .. })
        ));
    }

    #[test]
    fn empty_pairs_rejected() {
        let pairs: Vec<(u16, f64)> = Vec::new();
        assert_eq!(
            RuleCurve::new(pairs, false).unwrap_err(),
            OperationsError::EmptyRuleCurve
        );
    }

    #[test]
    fn step_interpolation() {
        let rc = RuleCurve::new([(100, 1.0), (200, 2.0)], false)
            .unwrap()
            .with_interpolator(Step);
        assert_eq!(rc.target_volume(150).unwrap(), 1.0);
        assert_eq!(rc.target_volume(250).unwrap(), 2.0);
    }

    #[test]
    fn from_dates() {
        let oct1 = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap();
        let sep30 = NaiveDate::from_ymd_opt(2021, 9, 30).unwrap();
        let rc = RuleCurve::from_dates([(sep30, 5.0), (oct1, 1.0)], false).unwrap();
        assert_eq!(rc.pairs(), &[(1, 1.0), (365, 5.0)]);
    }
}
