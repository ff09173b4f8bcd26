//! Standard operating procedure: meet demand, spill above capacity.

use tracing::trace;

use canteen_data::TimeStep;
use canteen_reservoir::Outlet;

use crate::allocate::allocate;
use crate::error::OperationsError;
use crate::policy::{OperateContext, OperationsPolicy, Releases};

/// Releases to satisfy the step's `demand`, and at least what would
/// otherwise exceed the step's `capacity`.
///
/// With `available = storage + inflow` the target release is
///
/// ```text
/// clamp(max(min(demand, available), available - capacity) * factor, 0, available)
/// ```
///
/// where `factor` is the context action (default 1). The target is then
/// split across outlets, lowest first.
#[derive(Debug, Clone)]
pub struct StandardOperatingProcedure {
    demand_key: String,
    capacity_key: String,
}

impl Default for StandardOperatingProcedure {
    fn default() -> Self {
        Self {
            demand_key: "demand".to_string(),
            capacity_key: "capacity".to_string(),
        }
    }
}

impl StandardOperatingProcedure {
    /// Reads demand and capacity from differently named inputs.
    pub fn with_keys(demand_key: impl Into<String>, capacity_key: impl Into<String>) -> Self {
        Self {
            demand_key: demand_key.into(),
            capacity_key: capacity_key.into(),
        }
    }

    /// The target release for `available` volume.
    pub fn target(demand: f64, capacity: f64, available: f64, factor: f64) -> f64 {
        let target = demand.min(available).max(available - capacity) * factor;
        target.clamp(0.0, available.max(0.0))
    }
}

impl OperationsPolicy for StandardOperatingProcedure {
    fn operate(
        &self,
        step: &TimeStep,
        outlets: &[Outlet],
        ctx: &OperateContext,
    ) -> Result<Releases, OperationsError> {
        let demand = step.number(&self.demand_key, "standard operating procedure")?;
        let capacity = step.number(&self.capacity_key, "standard operating procedure")?;
        let available = step.storage() + step.inflows();
        let target = Self::target(demand, capacity, available, ctx.factor());
        trace!(date = %step.date(), demand, capacity, available, target, "sop operations");
        Ok(allocate(outlets, available, Some(target)))
    }

    fn name(&self) -> &str {
        "sop"
    }
}
