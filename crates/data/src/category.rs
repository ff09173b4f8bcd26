//! Value categories and output run orders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classifies an input or output value for aggregation.
///
/// The declaration order is the secondary sort key for deferred outputs,
/// so flows are resolved before storage and storage before everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Water entering the reservoir during the step.
    Inflow,
    /// Water leaving the reservoir during the step.
    Outflow,
    /// Volume held at the start of the step.
    Storage,
    /// Anything else (demand, temperature, labels, ...).
    Other,
}

impl Category {
    /// Returns `true` for categories whose values must be numeric.
    pub fn is_volume(self) -> bool {
        !matches!(self, Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Inflow => "inflow",
            Category::Outflow => "outflow",
            Category::Storage => "storage",
            Category::Other => "other",
        };
        f.write_str(s)
    }
}

/// When a deferred output runs relative to the operations call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOrder {
    /// Evaluated before releases are decided.
    PreOperations,
    /// Evaluated after releases are decided.
    PostOperations,
}
