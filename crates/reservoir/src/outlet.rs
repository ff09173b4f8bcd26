//! Release structures (gates, spillways, ...).

use std::fmt;
use std::sync::Arc;

use crate::validate::{ValidationCollector, check_range};

/// Maximum-release function: storage volume to largest possible release.
pub type ReleaseFn = dyn Fn(f64) -> f64 + Send + Sync;

/// A named release path out of a reservoir.
///
/// `location` is the volume (or elevation) threshold of the structure.
/// Without an explicit maximum-release function the outlet behaves as an
/// uncontrolled spillway at `location`: it can release everything above it.
#[derive(Clone)]
pub struct Outlet {
    name: String,
    location: f64,
    max_release: Option<Arc<ReleaseFn>>,
    errors: Vec<String>,
}

impl Outlet {
    /// Creates an outlet. A negative or NaN location is recorded as a
    /// validation error; the outlet is still built.
    pub fn new(name: impl Into<String>, location: f64) -> Self {
        let name = name.into();
        let mut errors = ValidationCollector::new();
        if let Some(msg) = check_range("location", location, 0.0, f64::INFINITY, "Outlet::new") {
            errors.push(format!("{name} outlet: {msg}"));
        }
        Self {
            name,
            location,
            max_release: None,
            errors: errors.finish(),
        }
    }

    /// Replaces the default spillway behaviour with `f`.
    pub fn with_max_release<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.max_release = Some(Arc::new(f));
        self
    }

    /// Returns the outlet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the outlet location.
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Returns `true` if no validation errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the recorded validation errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Largest release possible with `volume` in storage.
    ///
    /// The default function returns `volume - location` above the location
    /// and 0 otherwise, so it is never negative.
    pub fn max_release(&self, volume: f64) -> f64 {
        match &self.max_release {
            Some(f) => f(volume),
            None if volume > self.location => volume - self.location,
            None => 0.0,
        }
    }

    /// Renders `name(location: value)` with the location rounded to `digits`.
    pub fn display(&self, digits: u32) -> String {
        format!("{}(location: {})", self.name, round(self.location, digits))
    }

    pub(crate) fn renamed(&self, name: String) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }
}

impl Default for Outlet {
    fn default() -> Self {
        Self::new("default", 0.0)
    }
}

impl fmt::Debug for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outlet")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("custom_max_release", &self.max_release.is_some())
            .field("errors", &self.errors)
            .finish()
    }
}

pub(crate) fn round(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(digits as i32);
    let r = (x * scale).round() / scale;
    if r == 0.0 { 0.0 } else { r }
}
