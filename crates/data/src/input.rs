//! Categorised step inputs.

use crate::category::Category;
use crate::error::DataError;
use crate::value::Value;

/// A named value at a time step, tagged with its category.
///
/// `is_output` marks values computed during simulation (releases, storage
/// carried forward, deferred outputs) rather than supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    value: Value,
    category: Category,
    is_output: bool,
}

impl Input {
    /// Creates a caller-supplied input.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NonNumeric`] if `category` is a volume category
    /// (inflow, outflow, storage) and `value` is not a number.
    pub fn new(value: impl Into<Value>, category: Category) -> Result<Self, DataError> {
        let value = value.into();
        if category.is_volume() && value.as_f64().is_none() {
            return Err(DataError::NonNumeric {
                category,
                value: value.display(6),
            });
        }
        Ok(Self {
            value,
            category,
            is_output: false,
        })
    }

    /// Creates a numeric input. Always valid.
    pub fn number(value: f64, category: Category) -> Self {
        Self {
            value: Value::Number(value),
            category,
            is_output: false,
        }
    }

    /// Numeric inflow input.
    pub fn inflow(value: f64) -> Self {
        Self::number(value, Category::Inflow)
    }

    /// Numeric outflow input.
    pub fn outflow(value: f64) -> Self {
        Self::number(value, Category::Outflow)
    }

    /// Numeric storage input.
    pub fn storage(value: f64) -> Self {
        Self::number(value, Category::Storage)
    }

    /// Uncategorised input of any value type.
    pub fn other(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            category: Category::Other,
            is_output: false,
        }
    }

    /// Returns the same input marked as computed.
    pub fn into_output(mut self) -> Self {
        self.is_output = true;
        self
    }

    /// Returns the value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// Returns the category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns `true` if the value was computed during simulation.
    pub fn is_output(&self) -> bool {
        self.is_output
    }
}
