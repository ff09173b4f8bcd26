//! Releases that pull storage towards a rule curve.

use tracing::trace;

use canteen_calendar::{dowy, is_leap_water_year, water_year};
use canteen_data::TimeStep;
use canteen_reservoir::Outlet;

use crate::allocate::allocate;
use crate::error::OperationsError;
use crate::policy::{OperateContext, OperationsPolicy, Releases};
use crate::rule_curve::RuleCurve;

/// Releases whatever keeps storage at the rule-curve target:
/// `(storage + inflow - target_volume(dowy(date))) * factor`, split across
/// outlets lowest first. Nothing is released when storage is at or below
/// the curve.
///
/// Steps must carry calendar dates. In leap water years the optional leap
/// curve is used; without one, day 366 reads the curve's last day.
#[derive(Debug, Clone)]
pub struct RuleCurveOperations {
    curve: RuleCurve,
    leap_curve: Option<RuleCurve>,
}

impl RuleCurveOperations {
    /// Operates against `curve` in every year.
    pub fn new(curve: RuleCurve) -> Self {
        Self {
            curve,
            leap_curve: None,
        }
    }

    /// Uses `curve` in leap water years.
    pub fn with_leap_curve(mut self, curve: RuleCurve) -> Self {
        self.leap_curve = Some(curve);
        self
    }

    /// Returns the curve used in non-leap years.
    pub fn curve(&self) -> &RuleCurve {
        &self.curve
    }

    /// Target release for a step, before allocation.
    ///
    /// # Errors
    ///
    /// Returns [`OperationsError::MissingDate`] for an undated step, or the
    /// rule curve's error.
    pub fn target_release(&self, step: &TimeStep, factor: f64) -> Result<f64, OperationsError> {
        let date = step.date().date().ok_or_else(|| OperationsError::MissingDate {
            date: step.date().to_string(),
            context: "rule curve operations".to_string(),
        })?;
        let curve = match &self.leap_curve {
            Some(leap) if is_leap_water_year(water_year(date)) => leap,
            _ => &self.curve,
        };
        let day = dowy(date).min(curve.end_of_water_year());
        let target_volume = curve.target_volume(day)?;
        let available = step.storage() + step.inflows();
        trace!(date = %date, day, target_volume, available, "rule curve target");
        Ok((available - target_volume) * factor)
    }
}

impl OperationsPolicy for RuleCurveOperations {
    fn operate(
        &self,
        step: &TimeStep,
        outlets: &[Outlet],
        ctx: &OperateContext,
    ) -> Result<Releases, OperationsError> {
        let target = self.target_release(step, ctx.factor())?;
        let available = step.storage() + step.inflows();
        Ok(allocate(outlets, available, Some(target)))
    }

    fn name(&self) -> &str {
        "rule-curve"
    }
}
