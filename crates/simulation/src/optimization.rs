//! Scoring operating decisions over a simulated series.
//!
//! An [`Optimization`] lets a [`DecisionPolicy`] pick the operating action
//! at every step from indicator values of the previous step, and scores
//! the realised series against [`Threshold`]s. The policy search itself
//! lives outside this crate.

use indexmap::IndexMap;
use tracing::{debug, trace};

use canteen_data::{Input, TimeSeries, TimeStep};
use canteen_operations::OperateContext;

use crate::engine::Simulation;
use crate::error::SimulationError;

/// Penalty shape for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Penalises `x²`.
    Minimize,
    /// Rewards large values: penalises `-x²`.
    Maximize,
    /// No penalty while `x <= t`, then `(x - t)²`.
    Below(f64),
    /// No penalty while `x >= t`, then `(t - x)²`.
    Above(f64),
    /// No penalty inside `[lo, hi]`, squared distance to the nearest bound
    /// outside.
    Between(f64, f64),
}

impl Threshold {
    /// Penalty for metric value `x`.
    pub fn penalty(&self, x: f64) -> f64 {
        match *self {
            Threshold::Minimize => x * x,
            Threshold::Maximize => -(x * x),
            Threshold::Below(t) => (x - t).max(0.0).powi(2),
            Threshold::Above(t) => (t - x).max(0.0).powi(2),
            Threshold::Between(lo, hi) => (lo - x).max(0.0).powi(2) + (x - hi).max(0.0).powi(2),
        }
    }
}

/// A metric fed to the decision policy, with the range the policy search
/// should split it over.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    /// Metric name, see [`TimeStep::metric`].
    pub name: String,
    /// Lower bound of the search range.
    pub min: f64,
    /// Upper bound of the search range.
    pub max: f64,
}

impl Indicator {
    /// Creates an indicator.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

/// What a decision policy chose, and which rule chose it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Action passed to the operations policy.
    pub action: f64,
    /// Description of the rule that fired, if the policy has one.
    pub rule: Option<String>,
}

/// Maps indicator states to an operating action.
pub trait DecisionPolicy {
    /// Chooses an action. `states` holds one value per indicator, in
    /// indicator order.
    fn evaluate(&self, states: &[f64]) -> Decision;
}

impl<F> DecisionPolicy for F
where
    F: Fn(&[f64]) -> Decision,
{
    fn evaluate(&self, states: &[f64]) -> Decision {
        self(states)
    }
}

/// Result of one scored run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Sum of the per-step penalties.
    pub total_penalty: f64,
    /// The realised series; steps after the first carry a `penalty` value.
    pub series: TimeSeries,
    /// The decision taken at each step after the first.
    pub decisions: Vec<Decision>,
}

/// Scores decision policies on a simulation.
#[derive(Debug, Clone)]
pub struct Optimization {
    simulation: Simulation,
    thresholds: IndexMap<String, Threshold>,
    indicators: Vec<Indicator>,
    actions: Vec<f64>,
}

impl Optimization {
    /// Creates an optimization with no thresholds or indicators.
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation,
            thresholds: IndexMap::new(),
            indicators: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Penalises `metric` with `threshold`.
    pub fn with_threshold(mut self, metric: impl Into<String>, threshold: Threshold) -> Self {
        self.thresholds.insert(metric.into(), threshold);
        self
    }

    /// Adds an indicator. Indicators are passed to the policy in the order
    /// they were added.
    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// Sets the discrete actions a policy search may choose from.
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = f64>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    /// Returns the simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Returns the thresholds by metric.
    pub fn thresholds(&self) -> &IndexMap<String, Threshold> {
        &self.thresholds
    }

    /// Returns the indicators.
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// Returns the action set.
    pub fn actions(&self) -> &[f64] {
        &self.actions
    }

    /// Sum of threshold penalties for one realised step.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::MissingMetric`] if a thresholded metric is
    /// absent.
    pub fn penalty(&self, step: &TimeStep) -> Result<f64, SimulationError> {
        let mut total = 0.0;
        for (name, threshold) in &self.thresholds {
            total += threshold.penalty(metric(step, name)?);
        }
        Ok(total)
    }

    /// Indicator values of `step`, in indicator order.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::MissingMetric`] if an indicator is absent.
    pub fn indicator_states(&self, step: &TimeStep) -> Result<Vec<f64>, SimulationError> {
        self.indicators
            .iter()
            .map(|i| metric(step, &i.name))
            .collect()
    }

    /// Runs `series` with `policy` choosing the action for every step after
    /// the first from the previous step's indicators.
    ///
    /// The first step runs with no action and is not penalised.
    ///
    /// # Errors
    ///
    /// Any simulation error, or [`SimulationError::MissingMetric`] for an
    /// absent indicator or thresholded metric.
    #[tracing::instrument(skip_all, fields(n_steps = series.len()))]
    pub fn evaluate(
        &self,
        series: &TimeSeries,
        policy: &dyn DecisionPolicy,
    ) -> Result<Evaluation, SimulationError> {
        let mut stepper = self.simulation.stepper(series);
        let mut total_penalty = 0.0;
        let mut decisions = Vec::with_capacity(series.len().saturating_sub(1));

        stepper.step(&OperateContext::default())?;
        while !stepper.is_finished() {
            let previous = stepper
                .history()
                .last()
                .ok_or(SimulationError::Data(canteen_data::DataError::EmptySeries))?;
            let states = self.indicator_states(previous)?;
            let decision = policy.evaluate(&states);
            trace!(t = stepper.position(), ?states, action = decision.action, "decision");

            let ctx = OperateContext::with_action(decision.action);
            let penalty = match stepper.step(&ctx)? {
                Some(step) => self.penalty(step)?,
                None => break,
            };
            let mut values = IndexMap::new();
            values.insert("penalty".to_string(), Input::other(penalty).into_output());
            stepper.record(values)?;
            total_penalty += penalty;
            decisions.push(decision);
        }
        debug!(total_penalty, "optimization run scored");
        Ok(Evaluation {
            total_penalty,
            series: stepper.finish()?,
            decisions,
        })
    }
}

fn metric(step: &TimeStep, name: &str) -> Result<f64, SimulationError> {
    step.metric(name).ok_or_else(|| SimulationError::MissingMetric {
        name: name.to_string(),
        step: step.date().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_penalties() {
        assert_eq!(Threshold::Minimize.penalty(3.0), 9.0);
        assert_eq!(Threshold::Maximize.penalty(3.0), -9.0);
        assert_eq!(Threshold::Below(10.0).penalty(8.0), 0.0);
        assert_eq!(Threshold::Below(10.0).penalty(12.0), 4.0);
        assert_eq!(Threshold::Above(10.0).penalty(12.0), 0.0);
        assert_eq!(Threshold::Above(10.0).penalty(7.0), 9.0);
        assert_eq!(Threshold::Between(1.0, 2.0).penalty(1.5), 0.0);
        assert_eq!(Threshold::Between(1.0, 2.0).penalty(0.0), 1.0);
        assert_eq!(Threshold::Between(1.0, 2.0).penalty(4.0), 4.0);
    }

    #[test]
    fn closures_are_decision_policies() {
        let half = |_: &[f64]| Decision {
            action: 0.5,
            rule: None,
        };
        assert_eq!(half.evaluate(&[1.0]).action, 0.5);
    }
}
