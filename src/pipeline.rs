//! Upload-to-sizing pipeline: parse load, fetch solar, run the search.

use serde::Serialize;
use tracing::info;

use crate::error::PipelineError;
use crate::io::load_profile::parse_load_file;
use crate::sizing::{CostWeights, SearchParams, SizingOutcome, SizingPair, find_sizing_with};
use crate::solar::SolarSource;

/// Response shape for a sized installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    /// Selected PV capacity (kW), `null` if infeasible.
    pub pv_kw: Option<f64>,
    /// Selected battery capacity (kWh), `null` if infeasible.
    pub battery_kwh: Option<f64>,
    /// Feasible frontier for plotting.
    pub pv_battery_curve: Vec<SizingPair>,
    /// Hourly load used for sizing.
    pub load_profile: Vec<f64>,
    /// Hourly per-kW solar output used for sizing.
    pub solar_profile: Vec<f64>,
}

impl SizingReport {
    fn new(outcome: SizingOutcome, load: Vec<f64>, solar: Vec<f64>) -> Self {
        Self {
            pv_kw: outcome.pv,
            battery_kwh: outcome.battery,
            pv_battery_curve: outcome.pairs,
            load_profile: load,
            solar_profile: solar,
        }
    }
}

/// Runs the full pipeline for an uploaded load file at a location.
///
/// # Arguments
///
/// * `file_bytes` - Uploaded load file contents
/// * `filename` - Uploaded file name (selects the parser)
/// * `lat` / `lon` - Site coordinates for the solar lookup
/// * `costs` - Selection cost weights
/// * `params` - Search parameters
/// * `source` - Solar resource provider
///
/// # Errors
///
/// Returns a [`PipelineError`] wrapping the first failing stage.
pub async fn run_full_sizing(
    file_bytes: &[u8],
    filename: &str,
    lat: f64,
    lon: f64,
    costs: CostWeights,
    params: SearchParams,
    source: &dyn SolarSource,
) -> Result<SizingReport, PipelineError> {
    let load = parse_load_file(file_bytes, filename)?;
    let solar = source.solar_per_kw(lat, lon).await?;
    info!(filename, lat, lon, "sizing uploaded load profile");

    let (outcome, load, solar) = size_blocking(load, solar, costs, params).await?;
    Ok(SizingReport::new(outcome, load, solar))
}

/// Runs [`find_sizing_with`] on the blocking thread pool.
///
/// The series are moved in and handed back alongside the outcome.
///
/// # Errors
///
/// Returns [`PipelineError::Sizing`] for core failures and
/// [`PipelineError::Task`] if the worker panics.
pub async fn size_blocking(
    load: Vec<f64>,
    solar: Vec<f64>,
    costs: CostWeights,
    params: SearchParams,
) -> Result<(SizingOutcome, Vec<f64>, Vec<f64>), PipelineError> {
    let (outcome, load, solar) = tokio::task::spawn_blocking(move || {
        let outcome = find_sizing_with(&load, &solar, &costs, &params);
        (outcome, load, solar)
    })
    .await
    .map_err(|e| PipelineError::Task(e.to_string()))?;

    Ok((outcome?, load, solar))
}
