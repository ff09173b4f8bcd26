//! Curve command: tabulate the configured rule curve.

use anyhow::{Result, bail};
use tracing::info_span;

use canteen_data::round;

use crate::cli::CurveArgs;
use crate::config;
use crate::convert;

/// Print `day<TAB>target` for every day of the water year, starting at 0.
pub fn run(args: CurveArgs) -> Result<()> {
    let _cmd = info_span!("curve").entered();
    let config = config::load(&args.config)?;
    let Some(rc) = &config.operations.rule_curve else {
        bail!("no rule curve: add an [operations.rule_curve] section to the config");
    };
    let pairs = match (&rc.leap_pairs, args.leap) {
        (Some(leap), true) => leap,
        _ => &rc.pairs,
    };
    let curve = convert::build_rule_curve(pairs, args.leap, &rc.interpolation)?;
    if !curve.is_valid() {
        bail!("invalid rule curve:\n  {}", curve.messages().join("\n  "));
    }
    for (day, target) in tabulate(&curve)? {
        println!("{day}\t{}", round(target, args.digits));
    }
    Ok(())
}

fn tabulate(curve: &canteen_operations::RuleCurve) -> Result<Vec<(u16, f64)>> {
    (0..=curve.end_of_water_year())
        .map(|day| Ok::<_, anyhow::Error>((day, curve.target_volume(day)?)))
        .collect()
}
