//! Accumulated validation messages.
//!
//! Outlets and reservoirs do not fail on bad configuration. They record a
//! message per problem and report `is_valid() == false`, so callers can
//! inspect everything that is wrong at once.

/// Accumulates validation errors for one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Record every error of another object.
    pub(crate) fn extend<'a>(&mut self, msgs: impl IntoIterator<Item = &'a String>) {
        self.errors.extend(msgs.into_iter().cloned());
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the collector and return the recorded messages.
    pub(crate) fn finish(self) -> Vec<String> {
        self.errors
    }
}

/// Checks `min <= value <= max`, returning a message naming the value, the
/// bounds and the calling operation when it is not. NaN is never on range.
pub(crate) fn check_range(
    name: &str,
    value: f64,
    min: f64,
    max: f64,
    context: &str,
) -> Option<String> {
    if (min..=max).contains(&value) {
        None
    } else {
        Some(format!(
            "the {name} value {value} of {context} is not on the valid range [{min}, {max}]"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range() {
        assert_eq!(check_range("x", 0.0, 0.0, f64::INFINITY, "t"), None);
        assert_eq!(check_range("x", 1e300, 0.0, f64::INFINITY, "t"), None);
    }

    #[test]
    fn out_of_range_message() {
        assert_eq!(
            check_range("location", -1.0, 0.0, f64::INFINITY, "Outlet::new").unwrap(),
            "the location value -1 of Outlet::new is not on the valid range [0, inf]"
        );
    }

    #[test]
    fn nan_is_out_of_range() {
        assert!(check_range("x", f64::NAN, 0.0, 1.0, "t").is_some());
    }

    #[test]
    fn collector_accumulates() {
        let mut c = ValidationCollector::new();
        assert!(c.is_empty());
        c.push("a");
        c.extend(&vec!["b".to_string(), "c".to_string()]);
        assert!(!c.is_empty());
        assert_eq!(c.finish(), vec!["a", "b", "c"]);
    }
}
