//! Error types for the canteen-reservoir crate.

/// Error type for the hard failures of the canteen-reservoir crate.
///
/// Invalid outlet locations and capacities are not errors: they are
/// recorded on the object (see [`Reservoir::errors`](crate::Reservoir::errors)).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReservoirError {
    /// Returned when two volume maps share a name.
    #[error("the map name '{name}' is duplicated in the set of maps")]
    DuplicateMap {
        /// The duplicated name.
        name: String,
    },

    /// Returned when a volume map is requested by an unknown name.
    #[error("the requested variable '{name}' is not in the dictionary of mapped variables")]
    UnknownMap {
        /// The requested name.
        name: String,
    },

    /// Returned when interpolation data cannot define a function.
    #[error("invalid interpolation data: {reason}")]
    InterpolationData {
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_duplicate_map() {
        let e = ReservoirError::DuplicateMap {
            name: "elevation".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "the map name 'elevation' is duplicated in the set of maps"
        );
    }

    #[test]
    fn error_unknown_map() {
        let e = ReservoirError::UnknownMap {
            name: "area".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "the requested variable 'area' is not in the dictionary of mapped variables"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<ReservoirError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<ReservoirError>();
    }
}
