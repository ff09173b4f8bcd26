//! Pure conversion functions: TOML config structs -> crate API types.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::config::*;

use canteen_operations::{
    OperationsPolicy, Passive, RuleCurve, RuleCurveOperations, StandardOperatingProcedure, Step,
};
use canteen_reservoir::{Map, Outlet, Reservoir, clamp_to, interpolate_from_data};

/// Builds an outlet. A `max_release` caps the default spillway release.
pub fn build_outlet(o: &OutletToml) -> Outlet {
    let outlet = Outlet::new(o.name.clone(), o.location);
    match o.max_release {
        Some(cap) => {
            let location = o.location;
            outlet.with_max_release(clamp_to(move |v| v - location, 0.0, cap))
        }
        None => outlet,
    }
}

/// Builds a volume map from a lookup table, with its inverse when the
/// values are strictly increasing.
pub fn build_map(m: &MapToml) -> Result<Map> {
    let f = interpolate_from_data(&m.volumes, &m.values, None, None)
        .with_context(|| format!("invalid table for map {:?}", m.name))?;
    let map = Map::new(m.name.clone(), f);
    match interpolate_from_data(&m.values, &m.volumes, None, None) {
        Ok(inverse) => Ok(map.with_inverse(inverse)),
        Err(_) => Ok(map),
    }
}

/// Builds the reservoir. Validation problems are left on the reservoir.
pub fn build_reservoir(r: &ReservoirToml) -> Result<Reservoir> {
    let mut builder = Reservoir::builder()
        .with_name(r.name.clone())
        .with_capacity(r.capacity);
    if !r.outlets.is_empty() {
        builder = builder.with_outlets(r.outlets.iter().map(build_outlet));
    }
    for m in &r.maps {
        builder = builder.with_map(build_map(m)?);
    }
    builder.build().context("failed to build reservoir")
}

/// Builds a rule curve with the named interpolation.
pub fn build_rule_curve(pairs: &[(u16, f64)], leap_year: bool, interpolation: &str) -> Result<RuleCurve> {
    let curve = RuleCurve::new(pairs.iter().copied(), leap_year)?;
    match interpolation.to_lowercase().as_str() {
        "linear" => Ok(curve),
        "step" => Ok(curve.with_interpolator(Step)),
        other => bail!("unknown interpolation: {other:?}"),
    }
}

/// Builds the rule-curve policy, including the leap-year curve if given.
pub fn build_rule_curve_operations(rc: &RuleCurveToml) -> Result<RuleCurveOperations> {
    let curve = build_rule_curve(&rc.pairs, false, &rc.interpolation)?;
    let mut ops = RuleCurveOperations::new(curve);
    if let Some(leap) = &rc.leap_pairs {
        ops = ops.with_leap_curve(build_rule_curve(leap, true, &rc.interpolation)?);
    }
    Ok(ops)
}

/// Parses the policy name and builds the operations policy.
pub fn build_policy(o: &OperationsToml) -> Result<Arc<dyn OperationsPolicy>> {
    match o.policy.to_lowercase().as_str() {
        "passive" => Ok(Arc::new(Passive)),
        "sop" => Ok(Arc::new(StandardOperatingProcedure::with_keys(
            o.demand_key.clone(),
            o.capacity_key.clone(),
        ))),
        "rule-curve" | "rule_curve" => {
            let Some(rc) = &o.rule_curve else {
                bail!("policy \"rule-curve\" needs an [operations.rule_curve] section");
            };
            Ok(Arc::new(build_rule_curve_operations(rc)?))
        }
        other => bail!("unknown operations policy: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(s: &str) -> CanteenConfig {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn default_reservoir() {
        let r = build_reservoir(&ReservoirToml::default()).unwrap();
        assert_eq!(
            r.display(0),
            "default(capacity: 1, outlets: [spill(location: 1)], mapped variables: [None])"
        );
    }

    #[test]
    fn capped_outlet() {
        let gate = build_outlet(&OutletToml {
            name: "gate".to_string(),
            location: 2.0,
            max_release: Some(3.0),
        });
        assert_eq!(gate.max_release(1.0), 0.0);
        assert_eq!(gate.max_release(4.0), 2.0);
        assert_eq!(gate.max_release(40.0), 3.0);
    }

    #[test]
    fn map_with_inverse() {
        let m = build_map(&MapToml {
            name: "elevation".to_string(),
            volumes: vec![0.0, 100.0],
            values: vec![200.0, 220.0],
        })
        .unwrap();
        assert_eq!(m.f(50.0), 210.0);
        assert_eq!(m.inverse_f(210.0), Some(50.0));
    }

    #[test]
    fn bad_map_table() {
        let err = build_map(&MapToml {
            name: "area".to_string(),
            volumes: vec![0.0, 1.0],
            values: vec![1.0],
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid table for map \"area\""));
    }

    #[test]
    fn policies_by_name() {
        assert_eq!(build_policy(&OperationsToml::default()).unwrap().name(), "passive");
        let sop = config("[operations]\npolicy = \"sop\"\n");
        assert_eq!(build_policy(&sop.operations).unwrap().name(), "sop");
        let rc = config("[operations]\npolicy = \"rule-curve\"\n[operations.rule_curve]\npairs = [[1, 2.0]]\n");
        assert_eq!(build_policy(&rc.operations).unwrap().name(), "rule-curve");
    }

    #[test]
    fn rule_curve_policy_needs_curve() {
        let c = config("[operations]\npolicy = \"rule-curve\"\n");
        let Err(err) = build_policy(&c.operations) else {
            panic!("rule-curve policy built without a curve");
        };
        assert!(err.to_string().contains("[operations.rule_curve]"));
    }

    #[test]
    fn unknown_names_rejected() {
        let c = config("[operations]\npolicy = \"hedging\"\n");
        assert!(build_policy(&c.operations).is_err());
        assert!(build_rule_curve(&[(1, 1.0)], false, "cubic").is_err());
    }

    #[test]
    fn step_interpolation_from_config() {
        let curve = build_rule_curve(&[(100, 1.0), (200, 3.0)], false, "step").unwrap();
        assert_eq!(curve.target_volume(150).unwrap(), 1.0);
    }
}
