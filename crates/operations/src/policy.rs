//! The operations-policy interface.

use indexmap::IndexMap;

use canteen_data::TimeStep;
use canteen_reservoir::Outlet;

use crate::error::OperationsError;

/// Release per outlet name.
pub type Releases = IndexMap<String, f64>;

/// Per-call context for an operations policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperateContext {
    /// Decision injected by an external caller such as an optimizer.
    /// Policies that use it treat it as a multiplicative factor on their
    /// target release.
    pub action: Option<f64>,
}

impl OperateContext {
    /// A context carrying `action`.
    pub fn with_action(action: f64) -> Self {
        Self {
            action: Some(action),
        }
    }

    /// The release factor: the action, or 1 when none was given.
    pub fn factor(&self) -> f64 {
        self.action.unwrap_or(1.0)
    }
}

/// Decides releases for one time step.
///
/// `step` carries the current inputs, including storage and inflows.
/// `outlets` are the reservoir's outlets in reservoir order. The returned
/// map should have one entry per outlet.
pub trait OperationsPolicy: Send + Sync {
    /// Computes the release through each outlet.
    ///
    /// # Errors
    ///
    /// Implementations fail when a required input is missing or a
    /// configured curve cannot be evaluated.
    fn operate(
        &self,
        step: &TimeStep,
        outlets: &[Outlet],
        ctx: &OperateContext,
    ) -> Result<Releases, OperationsError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> OperationsPolicy for F
where
    F: Fn(&TimeStep, &[Outlet], &OperateContext) -> Result<Releases, OperationsError>
        + Send
        + Sync,
{
    fn operate(
        &self,
        step: &TimeStep,
        outlets: &[Outlet],
        ctx: &OperateContext,
    ) -> Result<Releases, OperationsError> {
        self(step, outlets, ctx)
    }
}
