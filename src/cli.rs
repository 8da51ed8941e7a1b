//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Off-grid PV + battery sizer.
#[derive(Debug, Parser)]
#[command(name = "offgrid-sizer", version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Size PV and battery for a load file
    Size(SizeArgs),
    /// Start the HTTP API
    #[cfg(feature = "api")]
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct SizeArgs {
    /// Load file, CSV or Excel (`timestamp,kW` rows)
    #[arg(long)]
    pub load: PathBuf,

    /// Per-kW solar output CSV, one value per hour
    #[arg(long, conflicts_with_all = ["lat", "lon"], required_unless_present_all = ["lat", "lon"])]
    pub solar: Option<PathBuf>,

    /// Site latitude for a solar resource lookup
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Site longitude for a solar resource lookup
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Cost per PV kW (overrides config)
    #[arg(long)]
    pub pv_cost: Option<f64>,

    /// Cost per battery kWh (overrides config)
    #[arg(long)]
    pub battery_cost: Option<f64>,

    /// Write the feasible frontier to this CSV file
    #[arg(long)]
    pub frontier_out: Option<PathBuf>,
}

#[cfg(feature = "api")]
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}
