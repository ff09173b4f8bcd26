//! Free spill: every outlet releases as much as it physically can.

use tracing::trace;

use canteen_data::TimeStep;
use canteen_reservoir::Outlet;

use crate::allocate::allocate;
use crate::error::OperationsError;
use crate::policy::{OperateContext, OperationsPolicy, Releases};

/// Releases the maximum each outlet allows, lowest outlet first.
///
/// The context action is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl OperationsPolicy for Passive {
    fn operate(
        &self,
        step: &TimeStep,
        outlets: &[Outlet],
        _ctx: &OperateContext,
    ) -> Result<Releases, OperationsError> {
        let available = step.storage() + step.inflows();
        trace!(date = %step.date(), available, "passive operations");
        Ok(allocate(outlets, available, None))
    }

    fn name(&self) -> &str {
        "passive"
    }
}
