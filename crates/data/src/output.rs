//! Deferred output computations.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::category::{Category, RunOrder};
use crate::error::DataError;
use crate::input::Input;
use crate::timestep::TimeStep;
use crate::value::Value;

/// Named values produced by an output computation.
pub type Values = IndexMap<String, Value>;

type OutputFn = dyn Fn(&[TimeStep], usize) -> Result<Values, DataError> + Send + Sync;

/// A computation evaluated during simulation of a time step.
///
/// The function receives the realised history (steps `0..=t`, with step `t`
/// holding everything computed so far in the current tick) and the index
/// `t`. Its results become inputs of step `t` tagged with this output's
/// category and marked as computed.
///
/// Outputs are cheap to clone and carry no state, so the same output can
/// be attached to many steps.
#[derive(Clone)]
pub struct Output {
    f: Arc<OutputFn>,
    category: Category,
    run_order: RunOrder,
}

impl Output {
    /// Creates an output from a function, its category and its run order.
    pub fn new<F>(category: Category, run_order: RunOrder, f: F) -> Self
    where
        F: Fn(&[TimeStep], usize) -> Result<Values, DataError> + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            category,
            run_order,
        }
    }

    /// Returns the category given to every produced value.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns when this output runs relative to operations.
    pub fn run_order(&self) -> RunOrder {
        self.run_order
    }

    /// Sort key used to schedule outputs within a step.
    pub fn sort_key(&self) -> (RunOrder, Category) {
        (self.run_order, self.category)
    }

    /// Evaluates the output for step `t` of `history`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::StepOutOfRange`] if `t` is not inside `history`,
    /// any error raised by the function itself, and
    /// [`DataError::NonNumeric`] if a volume-category output produces a
    /// non-numeric value.
    pub fn run(&self, history: &[TimeStep], t: usize) -> Result<IndexMap<String, Input>, DataError> {
        if t >= history.len() {
            return Err(DataError::StepOutOfRange {
                index: t,
                len: history.len(),
            });
        }
        let values = (self.f)(history, t)?;
        values
            .into_iter()
            .map(|(name, value)| Ok((name, Input::new(value, self.category)?.into_output())))
            .collect()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("category", &self.category)
            .field("run_order", &self.run_order)
            .finish_non_exhaustive()
    }
}
