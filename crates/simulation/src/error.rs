//! Error types for the canteen-simulation crate.

use canteen_data::DataError;
use canteen_operations::OperationsError;

/// Error type for all fallible operations in the canteen-simulation crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// A data-model error, e.g. a storage conflict while merging inputs.
    #[error(transparent)]
    Data(#[from] DataError),

    /// The operations policy failed.
    #[error(transparent)]
    Operations(#[from] OperationsError),

    /// An output computation failed.
    #[error("output '{name}' failed at {step}: {source}")]
    Output {
        /// Name of the output.
        name: String,
        /// Display form of the step date.
        step: String,
        /// The underlying error.
        source: DataError,
    },

    /// Returned when an indicator or threshold metric is absent from a step.
    #[error("metric '{name}' is not available at {step}")]
    MissingMetric {
        /// Name of the metric.
        name: String,
        /// Display form of the step date.
        step: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_output_names_step() {
        let e = SimulationError::Output {
            name: "release_plus_one".to_string(),
            step: "step 2".to_string(),
            source: DataError::output("boom"),
        };
        assert!(e.to_string().starts_with("output 'release_plus_one' failed at step 2: "));
    }

    #[test]
    fn error_missing_metric() {
        let e = SimulationError::MissingMetric {
            name: "salinity".to_string(),
            step: "step 0".to_string(),
        };
        assert_eq!(e.to_string(), "metric 'salinity' is not available at step 0");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SimulationError>();
    }
}
