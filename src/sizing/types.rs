//! Sizing inputs, tuning parameters, and results.

use serde::{Deserialize, Serialize};

use crate::error::SizingError;

/// Hours in the canonical (non-leap) sizing year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Linear cost weighting applied to candidate pairs.
///
/// # Examples
///
/// ```
/// use offgrid_sizer::sizing::{CostWeights, SizingPair};
///
/// let costs = CostWeights::default();
/// let pair = SizingPair { pv: 2.0, battery: 10.0 };
/// assert_eq!(costs.cost(&pair), 7.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Cost per installed PV kW.
    pub pv_cost: f64,
    /// Cost per installed battery kWh.
    pub battery_cost: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            pv_cost: 1.0,
            battery_cost: 0.5,
        }
    }
}

impl CostWeights {
    /// Creates a cost weighting.
    pub fn new(pv_cost: f64, battery_cost: f64) -> Self {
        Self {
            pv_cost,
            battery_cost,
        }
    }

    /// Scores a pair: `pv * pv_cost + battery * battery_cost`.
    pub fn cost(&self, pair: &SizingPair) -> f64 {
        pair.pv * self.pv_cost + pair.battery * self.battery_cost
    }

    /// Checks that both weights are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] naming the offending weight.
    pub fn validate(&self) -> Result<(), SizingError> {
        for (name, value) in [("pv_cost", self.pv_cost), ("battery_cost", self.battery_cost)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SizingError::InvalidInput(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Tuning knobs for the PV sweep and battery bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Number of evenly spaced PV candidates, both ends inclusive.
    pub sweep_points: usize,
    /// Sweep end as a multiple of the break-even PV size.
    pub sweep_span: f64,
    /// Battery bisection stops once the bracket is this narrow (kWh).
    pub tolerance_kwh: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            sweep_points: 100,
            sweep_span: 5.0,
            tolerance_kwh: 1.0,
        }
    }
}

impl SearchParams {
    /// Checks the parameters describe a terminating, non-empty search.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] for a zero-point sweep, a span
    /// below 1, or a non-positive tolerance.
    pub fn validate(&self) -> Result<(), SizingError> {
        if self.sweep_points == 0 {
            return Err(SizingError::InvalidInput(
                "sweep_points must be > 0".to_string(),
            ));
        }
        if !self.sweep_span.is_finite() || self.sweep_span < 1.0 {
            return Err(SizingError::InvalidInput(format!(
                "sweep_span must be a finite number >= 1, got {}",
                self.sweep_span
            )));
        }
        if !self.tolerance_kwh.is_finite() || self.tolerance_kwh <= 0.0 {
            return Err(SizingError::InvalidInput(format!(
                "tolerance_kwh must be a finite number > 0, got {}",
                self.tolerance_kwh
            )));
        }
        Ok(())
    }
}

/// A feasible `(pv, battery)` combination on the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingPair {
    /// Installed PV capacity (kW).
    pub pv: f64,
    /// Minimum battery capacity (kWh) that survives the year at this PV size.
    pub battery: f64,
}

/// Result of a sizing search.
///
/// `pv` and `battery` are `None` when no swept PV size survives; `pairs`
/// always holds the unrounded frontier in ascending PV order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingOutcome {
    /// Selected PV capacity, rounded to 2 decimals.
    pub pv: Option<f64>,
    /// Selected battery capacity, rounded to 2 decimals.
    pub battery: Option<f64>,
    /// Full feasible frontier.
    pub pairs: Vec<SizingPair>,
}

impl SizingOutcome {
    /// Returns `true` if a sizing was selected.
    pub fn is_feasible(&self) -> bool {
        self.pv.is_some() && self.battery.is_some()
    }
}

/// Checks the two hourly series before any simulation runs.
///
/// # Errors
///
/// Returns [`SizingError::InvalidInput`] if the series are empty, differ in
/// length, hold a negative or non-finite value, or sum past `f64::MAX`.
pub fn validate_series(load: &[f64], solar_per_kw: &[f64]) -> Result<(), SizingError> {
    if load.is_empty() || load.len() != solar_per_kw.len() {
        return Err(SizingError::InvalidInput(format!(
            "load and solar series must have equal, positive length (load: {}, solar: {})",
            load.len(),
            solar_per_kw.len()
        )));
    }
    check_values("load", load)?;
    check_values("solar_per_kw", solar_per_kw)
}

fn check_values(name: &str, series: &[f64]) -> Result<(), SizingError> {
    for (h, &v) in series.iter().enumerate() {
        if !v.is_finite() {
            return Err(SizingError::InvalidInput(format!(
                "{name}[{h}] is not finite ({v})"
            )));
        }
        if v < 0.0 {
            return Err(SizingError::InvalidInput(format!(
                "{name}[{h}] is negative ({v})"
            )));
        }
    }
    let total: f64 = series.iter().sum();
    if !total.is_finite() {
        return Err(SizingError::InvalidInput(format!(
            "{name} total overflows ({total})"
        )));
    }
    Ok(())
}
