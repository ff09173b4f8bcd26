//! Error types for the canteen-operations crate.

use canteen_data::DataError;

/// Error type for all fallible operations in the canteen-operations crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationsError {
    /// Returned when a numeric argument is outside its valid range.
    #[error("the {name} value {value} of {context} is not on the valid range [{min}, {max}]")]
    OutOfRange {
        /// Name of the argument.
        name: String,
        /// The offending value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
        /// Operation that received the value.
        context: String,
    },

    /// Returned when an invalid rule curve is queried.
    #[error("invalid rule curve: {}", .messages.join("; "))]
    InvalidRuleCurve {
        /// Validation messages collected at construction.
        messages: Vec<String>,
    },

    /// Returned when a rule curve is built without any pairs.
    #[error("a rule curve needs at least one (day, target) pair")]
    EmptyRuleCurve,

    /// Returned when a calendar-driven policy receives an undated step.
    #[error("{context} needs a calendar date, but the step is dated {date}")]
    MissingDate {
        /// Display form of the step position.
        date: String,
        /// Operation that needed the date.
        context: String,
    },

    /// A data-model error raised while reading step inputs.
    #[error(transparent)]
    Data(#[from] DataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_out_of_range() {
        let e = OperationsError::OutOfRange {
            name: "dowy".to_string(),
            value: 367.0,
            min: 0.0,
            max: 365.0,
            context: "RuleCurve::target_volume".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "the dowy value 367 of RuleCurve::target_volume is not on the valid range [0, 365]"
        );
    }

    #[test]
    fn error_invalid_rule_curve() {
        let e = OperationsError::InvalidRuleCurve {
            messages: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(e.to_string(), "invalid rule curve: a; b");
    }

    #[test]
    fn error_from_data() {
        let e: OperationsError = DataError::EmptySeries.into();
        assert!(matches!(e, OperationsError::Data(DataError::EmptySeries)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<OperationsError>();
    }
}
