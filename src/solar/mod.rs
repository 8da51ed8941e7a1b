//! Per-kW solar output series: remote resource data and local files.

pub mod nasa_power;

use std::path::Path;

use crate::error::SolarError;
use crate::io::series::read_series_file;

#[cfg(feature = "api")]
pub use nasa_power::NasaPowerClient;

/// Provides one year of hourly output per installed PV kW for a location.
#[cfg(feature = "api")]
#[async_trait::async_trait]
pub trait SolarSource: Send + Sync {
    /// Returns the per-kW output series for the given coordinates.
    async fn solar_per_kw(&self, lat: f64, lon: f64) -> Result<Vec<f64>, SolarError>;
}

/// A fixed series returned for every location.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct StaticSource {
    series: Vec<f64>,
}

#[cfg(feature = "api")]
impl StaticSource {
    pub fn new(series: Vec<f64>) -> Self {
        Self { series }
    }
}

#[cfg(feature = "api")]
#[async_trait::async_trait]
impl SolarSource for StaticSource {
    async fn solar_per_kw(&self, lat: f64, lon: f64) -> Result<Vec<f64>, SolarError> {
        validate_coordinates(lat, lon)?;
        Ok(self.series.clone())
    }
}

/// Checks latitude and longitude ranges.
///
/// # Errors
///
/// Returns [`SolarError::InvalidCoordinates`] outside `[-90, 90]` x
/// `[-180, 180]` or for non-finite values.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), SolarError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(SolarError::InvalidCoordinates(format!(
            "latitude must be within [-90, 90], got {lat}"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(SolarError::InvalidCoordinates(format!(
            "longitude must be within [-180, 180], got {lon}"
        )));
    }
    Ok(())
}

/// Reads a per-kW solar series from a one-column CSV file.
///
/// # Errors
///
/// Returns [`SolarError::File`] if the file cannot be read or parsed.
pub fn load_solar_file(path: &Path) -> Result<Vec<f64>, SolarError> {
    Ok(read_series_file(path)?)
}
