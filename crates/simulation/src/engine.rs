//! The time-stepping loop.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use canteen_data::{Input, RunOrder, TimeSeries, TimeStep};
use canteen_operations::{OperateContext, OperationsPolicy};
use canteen_reservoir::Reservoir;

use crate::error::SimulationError;

/// Where a step is in its tick. Used for trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// Carried-forward storage has been merged into the step.
    Start,
    /// Pre-operations outputs are running.
    PreOperations,
    /// The operations policy is running.
    Operate,
    /// Post-operations outputs are running.
    PostOperations,
    /// Storage for the next step is being computed.
    StorageUpdate,
    /// The step is complete.
    End,
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepPhase::Start => "start",
            StepPhase::PreOperations => "pre-operations",
            StepPhase::Operate => "operate",
            StepPhase::PostOperations => "post-operations",
            StepPhase::StorageUpdate => "storage update",
            StepPhase::End => "end",
        };
        f.write_str(s)
    }
}

/// A reservoir operated by a policy.
///
/// Both parts are shared and immutable, so one `Simulation` can run any
/// number of series, one after another or in parallel.
#[derive(Clone)]
pub struct Simulation {
    reservoir: Arc<Reservoir>,
    policy: Arc<dyn OperationsPolicy>,
}

impl Simulation {
    /// Creates a simulation. An invalid reservoir is accepted with a warning.
    pub fn new(reservoir: impl Into<Arc<Reservoir>>, policy: impl OperationsPolicy + 'static) -> Self {
        Self::from_shared(reservoir.into(), Arc::new(policy))
    }

    /// Creates a simulation from an already shared policy.
    pub fn from_shared(reservoir: Arc<Reservoir>, policy: Arc<dyn OperationsPolicy>) -> Self {
        if !reservoir.is_valid() {
            warn!(
                reservoir = %reservoir.name(),
                errors = ?reservoir.errors(),
                "simulating an invalid reservoir"
            );
        }
        Self { reservoir, policy }
    }

    /// Returns the reservoir.
    pub fn reservoir(&self) -> &Reservoir {
        &self.reservoir
    }

    /// Returns the operations policy.
    pub fn policy(&self) -> &dyn OperationsPolicy {
        self.policy.as_ref()
    }

    /// Starts stepping through `series`.
    pub fn stepper<'a>(&'a self, series: &'a TimeSeries) -> Stepper<'a> {
        Stepper {
            simulation: self,
            series,
            history: Vec::with_capacity(series.len()),
            carry: IndexMap::new(),
        }
    }

    /// Runs every step of `series` with no injected action and returns the
    /// realised series.
    ///
    /// # Errors
    ///
    /// Fails at the first step whose outputs, policy or storage merge fail.
    pub fn simulate(&self, series: &TimeSeries) -> Result<TimeSeries, SimulationError> {
        self.simulate_with(series, &OperateContext::default())
    }

    /// Runs every step of `series`, passing `ctx` to the policy at each step.
    ///
    /// # Errors
    ///
    /// Fails at the first step whose outputs, policy or storage merge fail.
    #[tracing::instrument(skip_all, fields(n_steps = series.len(), policy = self.policy.name()))]
    pub fn simulate_with(
        &self,
        series: &TimeSeries,
        ctx: &OperateContext,
    ) -> Result<TimeSeries, SimulationError> {
        let mut stepper = self.stepper(series);
        while stepper.step(ctx)?.is_some() {}
        debug!("simulation complete");
        stepper.finish()
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("reservoir", &self.reservoir.name())
            .field("policy", &self.policy.name())
            .finish()
    }
}

/// Advances a simulation one step at a time.
///
/// Each call to [`step`](Self::step) realises the next input step:
///
/// 1. values staged by the previous step are merged in;
/// 2. outputs run in schedule order, each seeing the history so far.
///    Pre-operations values are added to the step, post-operations values
///    are staged for the next one;
/// 3. the policy runs once, before the first post-operations output (or
///    after all outputs when there is none), and its releases are added as
///    computed outflows;
/// 4. `inflows + storage - outflows` is staged for the next step under the
///    series' storage key, replacing any post-operations value of that name.
///
/// Post-operations values of the last step have no step to land in and are
/// dropped.
#[derive(Debug)]
pub struct Stepper<'a> {
    simulation: &'a Simulation,
    series: &'a TimeSeries,
    history: Vec<TimeStep>,
    carry: IndexMap<String, Input>,
}

impl<'a> Stepper<'a> {
    /// Index of the next step to realise.
    pub fn position(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` once every step has been realised.
    pub fn is_finished(&self) -> bool {
        self.history.len() >= self.series.len()
    }

    /// Returns the steps realised so far.
    pub fn history(&self) -> &[TimeStep] {
        &self.history
    }

    /// Realises the next step with `ctx` passed to the policy. Returns
    /// `None` when the series is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Output`] when an output fails, the
    /// policy's error when it fails, and [`SimulationError::Data`] when the
    /// merged inputs are inconsistent.
    pub fn step(&mut self, ctx: &OperateContext) -> Result<Option<&TimeStep>, SimulationError> {
        let t = self.history.len();
        let series = self.series;
        let Some(input) = series.get(t) else {
            return Ok(None);
        };

        let carry = std::mem::take(&mut self.carry);
        let current = if carry.is_empty() {
            input.clone()
        } else {
            input.add_inputs(carry)?
        };
        trace!(t, date = %current.date(), phase = %StepPhase::Start);
        let outputs = current.shared_outputs();
        self.history.push(current);

        let mut operated = false;
        let mut staged = IndexMap::new();
        for (name, output) in outputs.iter() {
            let phase = match output.run_order() {
                RunOrder::PreOperations => StepPhase::PreOperations,
                RunOrder::PostOperations => StepPhase::PostOperations,
            };
            if phase == StepPhase::PostOperations && !operated {
                self.operate(t, ctx)?;
                operated = true;
            }
            trace!(t, output = %name, phase = %phase);
            let values = output
                .run(&self.history, t)
                .map_err(|source| SimulationError::Output {
                    name: name.clone(),
                    step: self.history[t].date().to_string(),
                    source,
                })?;
            match phase {
                StepPhase::PostOperations => staged.extend(values),
                _ => self.history[t] = self.history[t].add_inputs(values)?,
            }
        }
        if !operated {
            self.operate(t, ctx)?;
        }

        let step = &self.history[t];
        let next_storage = step.inflows() + step.storage() - step.outflows();
        trace!(t, phase = %StepPhase::StorageUpdate, next_storage);
        staged.insert(
            series.storage_key().to_string(),
            Input::storage(next_storage).into_output(),
        );
        if t + 1 < series.len() {
            self.carry = staged;
        }
        trace!(t, phase = %StepPhase::End);
        Ok(self.history.last())
    }

    /// Adds computed values to the most recently realised step.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Data`] if nothing has been realised yet or
    /// the values conflict with the step's storage input.
    pub fn record(&mut self, values: IndexMap<String, Input>) -> Result<(), SimulationError> {
        let last = self
            .history
            .last_mut()
            .ok_or(SimulationError::Data(canteen_data::DataError::EmptySeries))?;
        *last = last.add_inputs(values)?;
        Ok(())
    }

    /// Consumes the stepper and returns the realised steps as a series.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Data`] if no step was realised.
    pub fn finish(self) -> Result<TimeSeries, SimulationError> {
        Ok(TimeSeries::new(self.history)?)
    }

    fn operate(&mut self, t: usize, ctx: &OperateContext) -> Result<(), SimulationError> {
        let sim = self.simulation;
        let step = &self.history[t];
        let releases = sim
            .policy
            .operate(step, sim.reservoir.outlets(), ctx)?;
        trace!(t, phase = %StepPhase::Operate, releases = ?releases);
        let outflows = releases
            .into_iter()
            .map(|(name, release)| (name, Input::outflow(release).into_output()));
        self.history[t] = step.add_inputs(outflows)?;
        Ok(())
    }
}
