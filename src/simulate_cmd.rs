//! Simulate command: run the configured reservoir over an input series.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use canteen_operations::OperateContext;
use canteen_simulation::Simulation;

use crate::cli::SimulateArgs;
use crate::config;
use crate::convert;
use crate::load;

/// Run a simulation and print the realised series to stdout.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();
    // 1. Load project TOML
    let config = config::load(&args.config)?;

    // 2. Build reservoir and policy
    let reservoir = convert::build_reservoir(&config.reservoir)?;
    for error in reservoir.errors() {
        warn!(reservoir = %reservoir.name(), "{error}");
    }
    for message in reservoir.messages() {
        info!(reservoir = %reservoir.name(), "{message}");
    }
    let policy = convert::build_policy(&config.operations)?;
    info!(
        reservoir = %reservoir.display(2),
        policy = policy.name(),
        "model configured"
    );

    // 3. Read the input series
    let path = args
        .series
        .as_ref()
        .or(config.series.path.as_ref())
        .ok_or_else(|| anyhow::anyhow!("no input series: set [series].path in config or use --series"))?;
    let series = load::read_series(path, &config.series)?;

    // 4. Step through the series
    let sim = Simulation::from_shared(Arc::new(reservoir), policy);
    let ctx = OperateContext {
        action: args.action.or(config.operations.action),
    };
    let realised = sim.simulate_with(&series, &ctx).context("simulation failed")?;
    info!(n_steps = realised.len(), "simulation complete");

    // 5. Report
    if args.json {
        let records = realised.to_records(!args.inputs_only);
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", sim.reservoir().display(args.digits));
        println!("{}", realised.display(args.digits));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use canteen_operations::Passive;
    use canteen_reservoir::Reservoir;

    use crate::config::SeriesToml;

    #[test]
    fn action_reaches_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"date,inflow,storage,demand,capacity\n2021-10-01,4,0,2,10\n")
            .unwrap();
        let series = load::read_series(file.path(), &SeriesToml::default()).unwrap();

        let sop = convert::build_policy(&config::OperationsToml {
            policy: "sop".to_string(),
            ..config::OperationsToml::default()
        })
        .unwrap();
        let reservoir = Reservoir::builder()
            .with_capacity(10.0)
            .with_outlets([canteen_reservoir::Outlet::new("gate", 0.0)])
            .build()
            .unwrap();
        let sim = Simulation::from_shared(Arc::new(reservoir), sop);

        let full = sim.simulate(&series).unwrap();
        let half = sim.simulate_with(&series, &OperateContext::with_action(0.5)).unwrap();
        assert_eq!(full.column("gate"), vec![Some(2.0)]);
        assert_eq!(half.column("gate"), vec![Some(1.0)]);
    }

    #[test]
    fn passive_report_is_json_serialisable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"date,inflow,storage\n2021-10-01,2,0\n").unwrap();
        let series = load::read_series(file.path(), &SeriesToml::default()).unwrap();
        let sim = Simulation::new(Reservoir::default(), Passive);
        let out = sim.simulate(&series).unwrap();
        let json = serde_json::to_value(out.to_records(true)).unwrap();
        assert_eq!(json[0]["date"], "01 Oct 2021");
        assert_eq!(json[0]["spill"], 1.0);
    }
}
