//! Error types for the canteen-calendar crate.

/// Error type for all fallible operations in the canteen-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range for its year.
    #[error("invalid day of year: {doy} (must be 1..={max})")]
    InvalidDoy {
        /// The invalid day-of-year value that was provided.
        doy: u16,
        /// The last valid day of that year (365 or 366).
        max: u16,
    },
}
