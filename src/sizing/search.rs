//! PV sweep, minimum-battery bisection, and cost-based selection.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::survivability::{net_energy_total, survives};
use super::types::{CostWeights, SearchParams, SizingOutcome, SizingPair, validate_series};
use crate::error::SizingError;

/// Finds the cheapest PV + battery sizing with default search parameters.
///
/// See [`find_sizing_with`].
///
/// # Errors
///
/// Returns a [`SizingError`] for malformed input or a zero solar resource.
pub fn find_sizing(
    load: &[f64],
    solar_per_kw: &[f64],
    costs: &CostWeights,
) -> Result<SizingOutcome, SizingError> {
    find_sizing_with(load, solar_per_kw, costs, &SearchParams::default())
}

/// Finds the cheapest PV + battery sizing that serves the load every hour.
///
/// Sweeps PV sizes from the break-even capacity (`mean(load) / mean(solar)`)
/// up to `params.sweep_span` times that, finds the minimum surviving battery
/// for each by bisection, and picks the pair with the lowest linear cost.
/// Candidates are evaluated in parallel; the frontier keeps sweep order so
/// ties go to the smallest PV size.
///
/// # Arguments
///
/// * `load` - Hourly load (kW), non-negative
/// * `solar_per_kw` - Hourly output per installed PV kW, non-negative
/// * `costs` - Linear cost weighting for selection
/// * `params` - Sweep and bisection parameters
///
/// # Returns
///
/// A [`SizingOutcome`]; `pv`/`battery` are `None` when nothing in the swept
/// range survives.
///
/// # Errors
///
/// Returns [`SizingError::InvalidInput`] if the series, costs, or parameters
/// are malformed, and [`SizingError::ZeroAverageSolar`] if the solar series
/// averages to zero.
pub fn find_sizing_with(
    load: &[f64],
    solar_per_kw: &[f64],
    costs: &CostWeights,
    params: &SearchParams,
) -> Result<SizingOutcome, SizingError> {
    validate_series(load, solar_per_kw)?;
    costs.validate()?;
    params.validate()?;

    let candidates = pv_candidates(load, solar_per_kw, params)?;
    debug!(
        start_pv = candidates.first().copied().unwrap_or_default(),
        end_pv = candidates.last().copied().unwrap_or_default(),
        count = candidates.len(),
        "sweeping PV candidates"
    );

    // Indexed collect keeps sweep order regardless of evaluation order.
    let evaluated: Vec<Option<SizingPair>> = candidates
        .par_iter()
        .map(|&pv| {
            min_battery_for_pv(load, solar_per_kw, pv, params.tolerance_kwh)
                .map(|battery| SizingPair { pv, battery })
        })
        .collect();
    let pairs: Vec<SizingPair> = evaluated.into_iter().flatten().collect();

    let Some(best) = select_cheapest(&pairs, costs) else {
        info!(candidates = candidates.len(), "no feasible sizing found");
        return Ok(SizingOutcome {
            pv: None,
            battery: None,
            pairs,
        });
    };

    info!(
        pv_kw = best.pv,
        battery_kwh = best.battery,
        frontier = pairs.len(),
        "selected sizing"
    );

    Ok(SizingOutcome {
        pv: Some(round2(best.pv)),
        battery: Some(round2(best.battery)),
        pairs,
    })
}

/// Builds the evenly spaced PV sweep for a load/solar pair.
///
/// The sweep starts at the PV size whose average output equals the average
/// load and ends at `params.sweep_span` times that.
///
/// # Errors
///
/// Returns [`SizingError::ZeroAverageSolar`] if the solar series averages to
/// zero, and [`SizingError::InvalidInput`] if the sweep bounds or the energy
/// produced at the top of the sweep overflow.
pub fn pv_candidates(
    load: &[f64],
    solar_per_kw: &[f64],
    params: &SearchParams,
) -> Result<Vec<f64>, SizingError> {
    let avg_load = mean(load);
    let avg_solar = mean(solar_per_kw);
    if avg_solar == 0.0 {
        return Err(SizingError::ZeroAverageSolar);
    }

    let start_pv = avg_load / avg_solar;
    if !start_pv.is_finite() {
        return Err(SizingError::InvalidInput(format!(
            "break-even PV size is not finite (mean load {avg_load}, mean solar {avg_solar})"
        )));
    }
    let end_pv = start_pv * params.sweep_span;
    if !end_pv.is_finite() || !net_energy_total(load, solar_per_kw, end_pv).is_finite() {
        return Err(SizingError::InvalidInput(format!(
            "PV sweep up to {end_pv} kW overflows the energy balance"
        )));
    }
    Ok(linspace(start_pv, end_pv, params.sweep_points))
}

/// Binary-searches the smallest battery (kWh) that survives at `pv_kw`.
///
/// Searches `[0, Σ load]`. The upper end is checked once before narrowing;
/// the returned value is always a battery size verified (or bounded) as
/// feasible and lies within `tolerance_kwh` of the true minimum. A tolerance
/// finer than the float spacing stops once the interval cannot shrink.
///
/// # Returns
///
/// `None` if the PV size cannot cover the year's energy (`Σ net < 0`), the
/// load total is not finite, or the upper bound itself fails.
pub fn min_battery_for_pv(
    load: &[f64],
    solar_per_kw: &[f64],
    pv_kw: f64,
    tolerance_kwh: f64,
) -> Option<f64> {
    if net_energy_total(load, solar_per_kw, pv_kw) < 0.0 {
        return None;
    }

    let mut low = 0.0_f64;
    let mut high: f64 = load.iter().sum();
    if !high.is_finite() {
        return None;
    }

    if !survives(load, solar_per_kw, pv_kw, high) {
        warn!(pv_kw, upper_kwh = high, "upper battery bound does not survive; skipping");
        return None;
    }

    while high - low > tolerance_kwh {
        let mid = low.midpoint(high);
        if mid <= low || mid >= high {
            break;
        }
        if survives(load, solar_per_kw, pv_kw, mid) {
            high = mid;
        } else {
            low = mid;
        }
    }

    Some(high)
}

/// Returns the lowest-cost pair; the first one seen wins a tie.
pub fn select_cheapest(pairs: &[SizingPair], costs: &CostWeights) -> Option<SizingPair> {
    let mut best: Option<(SizingPair, f64)> = None;
    for pair in pairs {
        let cost = costs.cost(pair);
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((*pair, cost)),
        }
    }
    best.map(|(pair, _)| pair)
}

/// `n` evenly spaced values over `[start, end]`, both ends included.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
