//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::sizing::{SizingOutcome, SizingPair};

/// JSON body for `POST /api/size`: run the core on caller-supplied series.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeRequest {
    /// Hourly load (kW).
    pub load: Vec<f64>,
    /// Hourly output per installed PV kW.
    pub solar_per_kw: Vec<f64>,
    /// Cost per PV kW; configured default when absent.
    pub pv_cost: Option<f64>,
    /// Cost per battery kWh; configured default when absent.
    pub battery_cost: Option<f64>,
}

/// Sizing result without the input profiles.
#[derive(Debug, Serialize)]
pub struct SizeResponse {
    /// Selected PV capacity (kW), `null` if infeasible.
    pub pv_kw: Option<f64>,
    /// Selected battery capacity (kWh), `null` if infeasible.
    pub battery_kwh: Option<f64>,
    /// Feasible frontier in sweep order.
    pub pv_battery_curve: Vec<SizingPair>,
}

impl From<SizingOutcome> for SizeResponse {
    fn from(o: SizingOutcome) -> Self {
        Self {
            pv_kw: o.pv,
            battery_kwh: o.battery,
            pv_battery_curve: o.pairs,
        }
    }
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}
