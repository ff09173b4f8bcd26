use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Canteen configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CanteenConfig {
    /// Reservoir definition.
    #[serde(default)]
    pub reservoir: ReservoirToml,

    /// Operating policy.
    #[serde(default)]
    pub operations: OperationsToml,

    /// Input series settings.
    #[serde(default)]
    pub series: SeriesToml,
}

/// Reads and parses a configuration file.
pub fn load(path: &Path) -> Result<CanteenConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservoirToml {
    #[serde(default = "default_reservoir_name")]
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    /// Empty means a single spillway at the capacity.
    #[serde(default)]
    pub outlets: Vec<OutletToml>,
    #[serde(default)]
    pub maps: Vec<MapToml>,
}

impl Default for ReservoirToml {
    fn default() -> Self {
        Self {
            name: default_reservoir_name(),
            capacity: default_capacity(),
            outlets: Vec::new(),
            maps: Vec::new(),
        }
    }
}

fn default_reservoir_name() -> String {
    "default".to_string()
}
fn default_capacity() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutletToml {
    pub name: String,
    #[serde(default)]
    pub location: f64,
    /// Caps the spillway release at this value.
    #[serde(default)]
    pub max_release: Option<f64>,
}

/// A volume map given as a lookup table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapToml {
    pub name: String,
    pub volumes: Vec<f64>,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationsToml {
    /// One of `passive`, `sop`, `rule-curve`.
    #[serde(default = "default_policy")]
    pub policy: String,
    /// Factor applied to the policy's target release.
    #[serde(default)]
    pub action: Option<f64>,
    #[serde(default = "default_demand_key")]
    pub demand_key: String,
    #[serde(default = "default_capacity_key")]
    pub capacity_key: String,
    #[serde(default)]
    pub rule_curve: Option<RuleCurveToml>,
}

impl Default for OperationsToml {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            action: None,
            demand_key: default_demand_key(),
            capacity_key: default_capacity_key(),
            rule_curve: None,
        }
    }
}

fn default_policy() -> String {
    "passive".to_string()
}
fn default_demand_key() -> String {
    "demand".to_string()
}
fn default_capacity_key() -> String {
    "capacity".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleCurveToml {
    /// `[day_of_water_year, target_volume]` pairs.
    pub pairs: Vec<(u16, f64)>,
    /// Pairs for leap water years, if they differ.
    #[serde(default)]
    pub leap_pairs: Option<Vec<(u16, f64)>>,
    /// `linear` or `step`.
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
}

fn default_interpolation() -> String {
    "linear".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesToml {
    pub path: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Storage at the first step when the CSV has no storage column.
    #[serde(default)]
    pub initial_storage: Option<f64>,
}

impl Default for SeriesToml {
    fn default() -> Self {
        Self {
            path: None,
            date_column: default_date_column(),
            date_format: default_date_format(),
            initial_storage: None,
        }
    }
}

fn default_date_column() -> String {
    "date".to_string()
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: CanteenConfig = toml::from_str("").unwrap();
        assert_eq!(config.reservoir.name, "default");
        assert_eq!(config.reservoir.capacity, 1.0);
        assert!(config.reservoir.outlets.is_empty());
        assert_eq!(config.operations.policy, "passive");
        assert_eq!(config.series.date_format, "%Y-%m-%d");
    }

    #[test]
    fn full_config() {
        let config: CanteenConfig = toml::from_str(
            r#"
            [reservoir]
            name = "lake"
            capacity = 100.0

            [[reservoir.outlets]]
            name = "spill"
            location = 100.0

            [[reservoir.outlets]]
            name = "gate"
            max_release = 5.0

            [[reservoir.maps]]
            name = "elevation"
            volumes = [0.0, 100.0]
            values = [200.0, 220.0]

            [operations]
            policy = "rule-curve"
            action = 0.8

            [operations.rule_curve]
            pairs = [[1, 50.0], [182, 90.0]]
            interpolation = "step"

            [series]
            path = "inflows.csv"
            initial_storage = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(config.reservoir.outlets.len(), 2);
        assert_eq!(config.reservoir.outlets[1].location, 0.0);
        assert_eq!(config.reservoir.outlets[1].max_release, Some(5.0));
        assert_eq!(config.operations.action, Some(0.8));
        let rc = config.operations.rule_curve.unwrap();
        assert_eq!(rc.pairs, vec![(1, 50.0), (182, 90.0)]);
        assert_eq!(rc.interpolation, "step");
        assert_eq!(config.series.initial_storage, Some(40.0));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<CanteenConfig, _> = toml::from_str("[reservoir]\nvolume = 3.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load(Path::new("/nonexistent/canteen.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
