//! Off-grid PV + battery sizing.
//!
//! Finds the cheapest PV capacity and battery capacity that carry an hourly
//! load through a full year without grid import.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
#[cfg(feature = "api")]
pub mod pipeline;
/// Survivability simulation and capacity search.
pub mod sizing;
pub mod solar;
