//! The reservoir: capacity, outlets and volume maps.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::ReservoirError;
use crate::map::Map;
use crate::outlet::{Outlet, round};
use crate::validate::{ValidationCollector, check_range};

/// An immutable reservoir.
///
/// Outlets are held sorted by descending location, ties by name, with
/// unique names. Bad capacity or outlet configuration is recorded in
/// [`errors`](Self::errors) rather than raised.
#[derive(Debug, Clone)]
pub struct Reservoir {
    name: String,
    capacity: f64,
    outlets: Vec<Outlet>,
    maps: IndexMap<String, Map>,
    errors: Vec<String>,
    messages: Vec<String>,
}

/// Builder for [`Reservoir`].
#[derive(Debug, Clone)]
pub struct ReservoirBuilder {
    name: String,
    capacity: f64,
    outlets: Option<Vec<Outlet>>,
    maps: Vec<Map>,
}

impl Default for ReservoirBuilder {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            capacity: 1.0,
            outlets: None,
            maps: Vec::new(),
        }
    }
}

impl ReservoirBuilder {
    /// Sets the reservoir name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the storage capacity.
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the outlets. Without this a single `spill` outlet at the
    /// capacity is used.
    pub fn with_outlets(mut self, outlets: impl IntoIterator<Item = Outlet>) -> Self {
        self.outlets = Some(outlets.into_iter().collect());
        self
    }

    /// Adds one outlet.
    pub fn with_outlet(mut self, outlet: Outlet) -> Self {
        self.outlets.get_or_insert_with(Vec::new).push(outlet);
        self
    }

    /// Adds a volume map.
    pub fn with_map(mut self, map: Map) -> Self {
        self.maps.push(map);
        self
    }

    /// Builds the reservoir.
    ///
    /// Capacity is validated, outlets are sorted and de-duplicated, then the
    /// map dictionary is built.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::DuplicateMap`] if two maps share a name.
    pub fn build(self) -> Result<Reservoir, ReservoirError> {
        let mut errors = ValidationCollector::new();
        if let Some(msg) = check_range("capacity", self.capacity, 0.0, f64::INFINITY, "Reservoir::build") {
            errors.push(format!("{} reservoir: {msg}", self.name));
        } else if self.capacity == 0.0 || self.capacity.is_infinite() {
            errors.push(format!(
                "{} reservoir: the capacity value {} of Reservoir::build must be positive and finite",
                self.name, self.capacity
            ));
        }

        let outlets = self
            .outlets
            .unwrap_or_else(|| vec![Outlet::new("spill", self.capacity)]);
        for outlet in &outlets {
            errors.extend(outlet.errors());
        }
        let (outlets, messages) = deduplicate(outlets);

        let mut maps = IndexMap::with_capacity(self.maps.len());
        for map in self.maps {
            let name = map.name().to_string();
            if maps.contains_key(&name) {
                return Err(ReservoirError::DuplicateMap { name });
            }
            maps.insert(name, map);
        }

        let errors = errors.finish();
        if !errors.is_empty() {
            warn!(reservoir = %self.name, n_errors = errors.len(), "reservoir failed validation");
        }
        Ok(Reservoir {
            name: self.name,
            capacity: self.capacity,
            outlets,
            maps,
            errors,
            messages,
        })
    }
}

/// Sorts outlets by descending location then name, and renames every
/// member of a duplicated name group to `{name}_@{location}_{n}`.
fn deduplicate(mut outlets: Vec<Outlet>) -> (Vec<Outlet>, Vec<String>) {
    outlets.sort_by(|a, b| {
        b.location()
            .total_cmp(&a.location())
            .then_with(|| a.name().cmp(b.name()))
    });

    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for o in &outlets {
        *counts.entry(o.name()).or_insert(0) += 1;
    }
    let duplicated: HashSet<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    if duplicated.is_empty() {
        return (outlets, Vec::new());
    }

    let mut taken: HashSet<String> = outlets.iter().map(|o| o.name().to_string()).collect();
    let mut messages = Vec::new();
    let renamed = outlets
        .into_iter()
        .map(|o| {
            if !duplicated.contains(o.name()) {
                return o;
            }
            let mut n = 0usize;
            let mut name = format!("{}_@{}_{n}", o.name(), o.location());
            while taken.contains(&name) {
                n += 1;
                name = format!("{}_@{}_{n}", o.name(), o.location());
            }
            taken.insert(name.clone());
            let msg = format!("Outlet: {} name was changed to: {name}.", o.display(0));
            debug!("{msg}");
            messages.push(msg);
            o.renamed(name)
        })
        .collect();
    (renamed, messages)
}

impl Reservoir {
    /// Starts a builder with the defaults: name `default`, capacity 1, one
    /// `spill` outlet at the capacity, no maps.
    pub fn builder() -> ReservoirBuilder {
        ReservoirBuilder::default()
    }

    /// Returns the reservoir name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the storage capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the outlets, highest location first.
    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    /// Returns the outlet called `name`.
    pub fn outlet(&self, name: &str) -> Option<&Outlet> {
        self.outlets.iter().find(|o| o.name() == name)
    }

    /// Returns the outlets whose names are in `names`, in reservoir order.
    pub fn select_outlets(&self, names: &[&str]) -> Vec<Outlet> {
        self.outlets
            .iter()
            .filter(|o| names.contains(&o.name()))
            .cloned()
            .collect()
    }

    /// Returns the outlets whose names are not in `names`, in reservoir order.
    pub fn deselect_outlets(&self, names: &[&str]) -> Vec<Outlet> {
        self.outlets
            .iter()
            .filter(|o| !names.contains(&o.name()))
            .cloned()
            .collect()
    }

    /// Returns the volume maps by name.
    pub fn maps(&self) -> &IndexMap<String, Map> {
        &self.maps
    }

    /// Evaluates the map `key` at `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`ReservoirError::UnknownMap`] if no map is called `key`.
    pub fn f(&self, key: &str, volume: f64) -> Result<f64, ReservoirError> {
        self.maps
            .get(key)
            .map(|m| m.f(volume))
            .ok_or_else(|| ReservoirError::UnknownMap {
                name: key.to_string(),
            })
    }

    /// Returns `true` if neither the capacity nor any outlet failed validation.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the validation errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns informational messages such as outlet renames.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Renders the reservoir with numbers rounded to `digits`.
    pub fn display(&self, digits: u32) -> String {
        let outlets: Vec<String> = self.outlets.iter().map(|o| o.display(digits)).collect();
        let maps = if self.maps.is_empty() {
            "None".to_string()
        } else {
            self.maps.keys().cloned().collect::<Vec<_>>().join(", ")
        };
        format!(
            "{}(capacity: {}, outlets: [{}], mapped variables: [{}])",
            self.name,
            round(self.capacity, digits),
            outlets.join(", "),
            maps
        )
    }
}

impl Default for Reservoir {
    fn default() -> Self {
        let outlet = Outlet::new("spill", 1.0);
        Self {
            name: "default".to_string(),
            capacity: 1.0,
            outlets: vec![outlet],
            maps: IndexMap::new(),
            errors: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl fmt::Display for Reservoir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(2))
    }
}
