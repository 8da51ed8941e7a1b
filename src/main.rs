//! Off-grid sizer entry point: CLI wiring, config loading, and dispatch.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use offgrid_sizer::config::SizerConfig;
use offgrid_sizer::io::export::export_frontier_csv;
use offgrid_sizer::io::load_profile::read_load_file;
use offgrid_sizer::sizing::{CostWeights, find_sizing_with};
use offgrid_sizer::solar::load_solar_file;

use cli::{Cli, Command, SizeArgs};

fn load_config(path: Option<&Path>) -> anyhow::Result<SizerConfig> {
    let cfg = match path {
        Some(p) => SizerConfig::from_toml_file(p)?,
        None => SizerConfig::default(),
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("invalid configuration ({} error(s))", errors.len());
    }
    Ok(cfg)
}

#[cfg(feature = "api")]
fn fetch_solar(cfg: &SizerConfig, lat: f64, lon: f64) -> anyhow::Result<Vec<f64>> {
    use offgrid_sizer::solar::{NasaPowerClient, SolarSource};

    let client = NasaPowerClient::new(&cfg.solar)?;
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    Ok(rt.block_on(client.solar_per_kw(lat, lon))?)
}

#[cfg(not(feature = "api"))]
fn fetch_solar(_cfg: &SizerConfig, _lat: f64, _lon: f64) -> anyhow::Result<Vec<f64>> {
    bail!("solar resource lookup requires the `api` feature; pass --solar <csv> instead")
}

fn run_size(cfg: &SizerConfig, args: &SizeArgs) -> anyhow::Result<()> {
    let load = read_load_file(&args.load)
        .with_context(|| format!("cannot load \"{}\"", args.load.display()))?;

    let solar = match (&args.solar, args.lat, args.lon) {
        (Some(path), _, _) => load_solar_file(path)
            .with_context(|| format!("cannot load \"{}\"", path.display()))?,
        (None, Some(lat), Some(lon)) => fetch_solar(cfg, lat, lon)?,
        _ => bail!("either --solar or both --lat and --lon are required"),
    };

    let defaults = cfg.cost_weights();
    let costs = CostWeights::new(
        args.pv_cost.unwrap_or(defaults.pv_cost),
        args.battery_cost.unwrap_or(defaults.battery_cost),
    );

    let outcome = find_sizing_with(&load, &solar, &costs, &cfg.search_params())?;

    match (outcome.pv, outcome.battery) {
        (Some(pv), Some(battery)) => {
            println!("PV capacity:       {pv:.2} kW");
            println!("Battery capacity:  {battery:.2} kWh");
        }
        _ => println!("no feasible sizing found in the swept PV range"),
    }
    println!("Frontier points:   {}", outcome.pairs.len());

    if let Some(ref path) = args.frontier_out {
        export_frontier_csv(&outcome.pairs, &costs, path)
            .with_context(|| format!("failed to write \"{}\"", path.display()))?;
        info!("frontier written to {}", path.display());
    }

    Ok(())
}

#[cfg(feature = "api")]
fn run_serve(cfg: SizerConfig, args: &cli::ServeArgs) -> anyhow::Result<()> {
    use std::net::{IpAddr, SocketAddr};
    use std::sync::Arc;

    use offgrid_sizer::api::{AppState, serve};
    use offgrid_sizer::solar::NasaPowerClient;

    let host: IpAddr = cfg
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host \"{}\"", cfg.server.host))?;
    let addr = SocketAddr::new(host, args.port.unwrap_or(cfg.server.port));

    let solar = Arc::new(NasaPowerClient::new(&cfg.solar)?);
    let state = Arc::new(AppState { config: cfg, solar });

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(serve(state, addr))
        .with_context(|| format!("server on {addr} failed"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|cfg| match cli.command {
        Command::Size(ref args) => run_size(&cfg, args),
        #[cfg(feature = "api")]
        Command::Serve(ref args) => run_serve(cfg, args),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
