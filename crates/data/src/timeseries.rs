//! Ordered sequences of time steps.

use tracing::debug;

use crate::error::DataError;
use crate::output::{Output, Values};
use crate::timestep::TimeStep;

/// An ordered sequence of time steps sharing one storage key.
///
/// The storage key is the name of the single storage input on the first
/// step. Simulation writes carried-forward storage under this name on every
/// following step.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    steps: Vec<TimeStep>,
    storage_key: String,
}

impl TimeSeries {
    /// Builds a series, taking the storage key from the first step.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptySeries`] for an empty step list,
    /// [`DataError::MissingStorageKey`] if the first step has no storage
    /// input and [`DataError::AmbiguousStorageKey`] if it has several.
    pub fn new(steps: Vec<TimeStep>) -> Result<Self, DataError> {
        let first = steps.first().ok_or(DataError::EmptySeries)?;
        let storage_key = match first.storage_keys().as_slice() {
            [] => {
                return Err(DataError::MissingStorageKey {
                    date: first.date().to_string(),
                });
            }
            [key] => key.to_string(),
            keys => {
                return Err(DataError::AmbiguousStorageKey {
                    keys: keys.iter().map(|k| k.to_string()).collect(),
                });
            }
        };
        debug!(n_steps = steps.len(), storage_key = %storage_key, "time series built");
        Ok(Self { steps, storage_key })
    }

    /// Returns the steps.
    pub fn steps(&self) -> &[TimeStep] {
        &self.steps
    }

    /// Returns step `t`.
    pub fn get(&self, t: usize) -> Option<&TimeStep> {
        self.steps.get(t)
    }

    /// Returns the storage input name shared by the series.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Number of steps. Never zero.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: a series holds at least one step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeStep> {
        self.steps.iter()
    }

    /// Consumes the series and returns its steps.
    pub fn into_steps(self) -> Vec<TimeStep> {
        self.steps
    }

    /// Returns a new series where steps `start`, `start + stride`, ... carry
    /// `output` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ZeroStride`] if `stride` is 0 and
    /// [`DataError::StepOutOfRange`] if `start` is past the end.
    pub fn with_periodic_output(
        &self,
        name: &str,
        output: &Output,
        start: usize,
        stride: usize,
    ) -> Result<Self, DataError> {
        if stride == 0 {
            return Err(DataError::ZeroStride);
        }
        if start >= self.steps.len() {
            return Err(DataError::StepOutOfRange {
                index: start,
                len: self.steps.len(),
            });
        }
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(t, step)| {
                if t >= start && (t - start) % stride == 0 {
                    step.add_outputs([(name.to_string(), output.clone())])
                } else {
                    step.clone()
                }
            })
            .collect();
        Ok(Self {
            steps,
            storage_key: self.storage_key.clone(),
        })
    }

    /// Per-step values of the named numeric input (`None` where absent).
    pub fn column(&self, name: &str) -> Vec<Option<f64>> {
        self.steps
            .iter()
            .map(|s| s.input(name).and_then(|i| i.as_f64()))
            .collect()
    }

    /// Storage at the start of every step.
    pub fn storages(&self) -> Vec<f64> {
        self.steps.iter().map(TimeStep::storage).collect()
    }

    /// Total outflow of every step.
    pub fn outflow_totals(&self) -> Vec<f64> {
        self.steps.iter().map(TimeStep::outflows).collect()
    }

    /// One flat record per step.
    pub fn to_records(&self, include_outputs: bool) -> Vec<Values> {
        self.steps
            .iter()
            .map(|s| s.to_record(include_outputs))
            .collect()
    }

    /// One display line per step.
    pub fn display(&self, digits: u32) -> String {
        self.steps
            .iter()
            .map(|s| s.display(digits))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a TimeStep;
    type IntoIter = std::slice::Iter<'a, TimeStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
