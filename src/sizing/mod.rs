//! Sizing core: survivability simulation and capacity search.
//!
//! Everything here is a pure function over explicit inputs. No I/O, no
//! shared state; safe to call from any number of threads at once.

/// PV sweep, battery bisection, and selection.
pub mod search;
/// Hourly energy balance against a finite battery.
pub mod survivability;
pub mod types;

pub use search::{find_sizing, find_sizing_with, min_battery_for_pv, pv_candidates, select_cheapest};
pub use survivability::{net_energy_total, survives};
pub use types::{
    CostWeights, HOURS_PER_YEAR, SearchParams, SizingOutcome, SizingPair, validate_series,
};
