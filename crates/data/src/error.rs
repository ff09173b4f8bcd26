//! Error types for the canteen-data crate.

use crate::category::Category;

/// Error type for all fallible operations in the canteen-data crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// Returned when a time step is given more than one storage input.
    #[error("time step {date} has {} storage inputs ({}), at most one is allowed", .keys.len(), .keys.join(", "))]
    MultipleStorage {
        /// Display form of the step date.
        date: String,
        /// Names of the conflicting storage inputs.
        keys: Vec<String>,
    },

    /// Returned when the first step of a series carries no storage input.
    #[error("the first time step ({date}) has no storage input")]
    MissingStorageKey {
        /// Display form of the first step date.
        date: String,
    },

    /// Returned when the first step of a series carries several storage inputs.
    #[error("the first time step has an ambiguous storage key: {}", .keys.join(", "))]
    AmbiguousStorageKey {
        /// Names of the candidate storage inputs.
        keys: Vec<String>,
    },

    /// Returned when a series is built without any time steps.
    #[error("a time series needs at least one time step")]
    EmptySeries,

    /// Returned when a flow or storage input is given a non-numeric value.
    #[error("{category} inputs must be numeric, got {value:?}")]
    NonNumeric {
        /// Category the value was tagged with.
        category: Category,
        /// Display form of the rejected value.
        value: String,
    },

    /// Returned when a named input required by a computation is absent.
    #[error("input '{name}' is missing at {date} (required by {context})")]
    MissingInput {
        /// Name of the missing input.
        name: String,
        /// Display form of the step date.
        date: String,
        /// Operation that required the input.
        context: String,
    },

    /// Returned when a named input exists but does not hold a number.
    #[error("input '{name}' at {date} is not numeric")]
    NotNumber {
        /// Name of the input.
        name: String,
        /// Display form of the step date.
        date: String,
    },

    /// Returned when a table column does not match the number of dates.
    #[error("column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        /// Column name.
        column: String,
        /// Number of dates.
        expected: usize,
        /// Number of values in the column.
        got: usize,
    },

    /// Returned when a step index falls outside the series.
    #[error("step index {index} is out of range for a series of {len} steps")]
    StepOutOfRange {
        /// The requested index.
        index: usize,
        /// Series length.
        len: usize,
    },

    /// Returned when a periodic output is scheduled with a zero stride.
    #[error("output stride must be at least 1")]
    ZeroStride,

    /// Returned by a deferred output computation that could not produce values.
    #[error("output computation failed: {reason}")]
    Output {
        /// Description of the problem.
        reason: String,
    },
}

impl DataError {
    /// Builds a [`DataError::Output`] from any displayable reason.
    pub fn output(reason: impl std::fmt::Display) -> Self {
        Self::Output {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_multiple_storage() {
        let e = DataError::MultipleStorage {
            date: "01 Oct 2020".to_string(),
            keys: vec!["s1".to_string(), "s2".to_string()],
        };
        assert_eq!(
            e.to_string(),
            "time step 01 Oct 2020 has 2 storage inputs (s1, s2), at most one is allowed"
        );
    }

    #[test]
    fn error_missing_storage_key() {
        let e = DataError::MissingStorageKey {
            date: "step 0".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "the first time step (step 0) has no storage input"
        );
    }

    #[test]
    fn error_non_numeric() {
        let e = DataError::NonNumeric {
            category: Category::Inflow,
            value: "abc".to_string(),
        };
        assert_eq!(e.to_string(), "inflow inputs must be numeric, got \"abc\"");
    }

    #[test]
    fn error_missing_input() {
        let e = DataError::MissingInput {
            name: "demand".to_string(),
            date: "step 3".to_string(),
            context: "StandardOperatingProcedure::operate".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "input 'demand' is missing at step 3 (required by StandardOperatingProcedure::operate)"
        );
    }

    #[test]
    fn error_length_mismatch() {
        let e = DataError::LengthMismatch {
            column: "inflow".to_string(),
            expected: 3,
            got: 2,
        };
        assert_eq!(e.to_string(), "column 'inflow' has 2 values, expected 3");
    }

    #[test]
    fn output_helper() {
        let e = DataError::output("no temperature");
        assert_eq!(e.to_string(), "output computation failed: no temperature");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<DataError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<DataError>();
    }
}
