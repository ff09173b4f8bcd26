//! Construction of time series from column-oriented tables.

use indexmap::IndexMap;

use crate::category::Category;
use crate::error::DataError;
use crate::input::Input;
use crate::timeseries::TimeSeries;
use crate::timestep::{Inputs, StepDate, TimeStep};
use crate::value::Value;

/// Default category for a column, from its name.
///
/// Names containing `inflow`, `outflow` or `storage` (case-insensitive)
/// get that category; everything else is [`Category::Other`].
pub fn categorize(name: &str) -> Category {
    let lower = name.to_lowercase();
    if lower.contains("inflow") {
        Category::Inflow
    } else if lower.contains("outflow") {
        Category::Outflow
    } else if lower.contains("storage") {
        Category::Storage
    } else {
        Category::Other
    }
}

/// Table columns keyed by name; `None` marks a missing cell.
pub type Columns = IndexMap<String, Vec<Option<Value>>>;

impl TimeSeries {
    /// Builds a series from one date per row and named columns.
    ///
    /// Each column is categorised with [`categorize`]. Missing cells are
    /// simply absent from that step's inputs, so a storage column usually
    /// holds only the initial value.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::LengthMismatch`] if a column length differs from
    /// the number of dates, [`DataError::NonNumeric`] for text in a flow or
    /// storage column, and any [`TimeSeries::new`] error.
    pub fn from_columns(dates: Vec<StepDate>, columns: Columns) -> Result<Self, DataError> {
        for (name, values) in &columns {
            if values.len() != dates.len() {
                return Err(DataError::LengthMismatch {
                    column: name.clone(),
                    expected: dates.len(),
                    got: values.len(),
                });
            }
        }
        let categories: Vec<Category> = columns.keys().map(|k| categorize(k)).collect();
        let mut steps = Vec::with_capacity(dates.len());
        for (row, date) in dates.into_iter().enumerate() {
            let mut inputs = Inputs::new();
            for ((name, values), &category) in columns.iter().zip(&categories) {
                if let Some(value) = &values[row] {
                    inputs.insert(name.clone(), Input::new(value.clone(), category)?);
                }
            }
            steps.push(TimeStep::new(date, inputs)?);
        }
        TimeSeries::new(steps)
    }
}
