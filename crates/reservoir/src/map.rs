//! Named functions of reservoir volume (elevation, area, ...).

use std::fmt;
use std::sync::Arc;

/// A function of reservoir volume.
pub type VolumeFn = dyn Fn(f64) -> f64 + Send + Sync;

/// Maps reservoir volume to a named variable, optionally with an inverse.
#[derive(Clone)]
pub struct Map {
    name: String,
    f: Arc<VolumeFn>,
    inverse: Option<Arc<VolumeFn>>,
}

impl Map {
    /// Creates a map from `f`.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
            inverse: None,
        }
    }

    /// Adds the inverse function (variable back to volume).
    pub fn with_inverse<F>(mut self, inverse: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.inverse = Some(Arc::new(inverse));
        self
    }

    /// Returns the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the map at `volume`.
    pub fn f(&self, volume: f64) -> f64 {
        (self.f)(volume)
    }

    /// Evaluates the inverse at `y`, if one was given.
    pub fn inverse_f(&self, y: f64) -> Option<f64> {
        self.inverse.as_ref().map(|g| g(y))
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("name", &self.name)
            .field("has_inverse", &self.inverse.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map() {
        let m = Map::new("simple", |x| x);
        assert_eq!(m.name(), "simple");
        assert_eq!(m.f(1.0), 1.0);
        assert_eq!(m.inverse_f(1.0), None);
    }

    #[test]
    fn inverse() {
        let m = Map::new("double", |x| 2.0 * x).with_inverse(|y| y / 2.0);
        assert_eq!(m.f(3.0), 6.0);
        assert_eq!(m.inverse_f(6.0), Some(3.0));
    }
}
