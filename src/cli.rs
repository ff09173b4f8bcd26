use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Canteen reservoir operations simulator.
#[derive(Parser)]
#[command(
    name = "canteen",
    version,
    about = "Reservoir operations simulator"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Simulate a reservoir over an input series.
    Simulate(SimulateArgs),
    /// Print the configured rule curve for every day of the water year.
    Curve(CurveArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "canteen.toml")]
    pub config: PathBuf,

    /// Override the input CSV path from config.
    #[arg(short, long)]
    pub series: Option<PathBuf>,

    /// Override the operations action from config.
    #[arg(short, long)]
    pub action: Option<f64>,

    /// Decimal places in the text report.
    #[arg(short, long, default_value_t = 2)]
    pub digits: u32,

    /// Print records as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Leave computed values out of the JSON records.
    #[arg(long)]
    pub inputs_only: bool,
}

/// Arguments for the `curve` subcommand.
#[derive(clap::Args)]
pub struct CurveArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "canteen.toml")]
    pub config: PathBuf,

    /// Print the leap-year curve instead.
    #[arg(long)]
    pub leap: bool,

    /// Decimal places in the output.
    #[arg(short, long, default_value_t = 3)]
    pub digits: u32,
}
