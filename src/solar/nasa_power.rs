//! NASA POWER hourly irradiance client.
//!
//! Fetches all-sky surface shortwave irradiance (W/m²) for one year at a
//! point and converts it to AC output per installed PV kW.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::SolarError;
use crate::sizing::HOURS_PER_YEAR;

/// Public NASA POWER endpoint.
pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov";

/// Irradiance parameter requested from the API.
const PARAMETER: &str = "ALLSKY_SFC_SW_DWN";

/// Irradiance at standard test conditions (W/m²) producing 1 kW per kW.
const STC_IRRADIANCE_W_M2: f64 = 1000.0;

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: PowerParameters,
}

#[derive(Debug, Deserialize)]
struct PowerParameters {
    // Keys are `YYYYMMDDHH`, so map order is chronological.
    #[serde(rename = "ALLSKY_SFC_SW_DWN")]
    allsky_sfc_sw_dwn: BTreeMap<String, f64>,
}

/// Builds the hourly point query URL for one calendar year.
pub fn request_url(base_url: &str, lat: f64, lon: f64, year: i32) -> String {
    format!(
        "{}/api/temporal/hourly/point?latitude={lat}&longitude={lon}&start={year}&end={year}\
         &community=RE&parameters={PARAMETER}&format=JSON&time-standard=UTC",
        base_url.trim_end_matches('/')
    )
}

/// Converts a NASA POWER JSON body into an hourly per-kW output series.
///
/// Each irradiance value becomes `value / 1000 * derate`; negative fill
/// values (the API uses `-999` for missing hours) count as no output.
///
/// # Errors
///
/// Returns [`SolarError::Malformed`] if the body does not have the expected
/// shape and [`SolarError::UnexpectedLength`] unless exactly
/// [`HOURS_PER_YEAR`] values are present.
pub fn parse_power_response(body: &[u8], derate: f64) -> Result<Vec<f64>, SolarError> {
    let response: PowerResponse =
        serde_json::from_slice(body).map_err(|e| SolarError::Malformed(e.to_string()))?;

    let series: Vec<f64> = response
        .properties
        .parameter
        .allsky_sfc_sw_dwn
        .values()
        .map(|&w_m2| (w_m2.max(0.0) / STC_IRRADIANCE_W_M2) * derate)
        .collect();

    if series.len() != HOURS_PER_YEAR {
        return Err(SolarError::UnexpectedLength {
            expected: HOURS_PER_YEAR,
            actual: series.len(),
        });
    }
    Ok(series)
}

#[cfg(feature = "api")]
pub use client::NasaPowerClient;

#[cfg(feature = "api")]
mod client {
    use std::time::Duration;

    use async_trait::async_trait;
    use tracing::{debug, info};

    use super::{parse_power_response, request_url};
    use crate::config::SolarConfig;
    use crate::error::SolarError;
    use crate::solar::{SolarSource, validate_coordinates};

    const USER_AGENT: &str = concat!("offgrid-sizer/", env!("CARGO_PKG_VERSION"));

    /// HTTP-backed [`SolarSource`] for the NASA POWER API.
    #[derive(Debug, Clone)]
    pub struct NasaPowerClient {
        client: reqwest::Client,
        base_url: String,
        year: i32,
        derate: f64,
    }

    impl NasaPowerClient {
        /// Creates a client from the `[solar]` configuration section.
        ///
        /// # Errors
        ///
        /// Returns [`SolarError::Request`] if the HTTP client cannot be built.
        pub fn new(config: &SolarConfig) -> Result<Self, SolarError> {
            let client = reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| SolarError::Request(format!("failed to build HTTP client: {e}")))?;
            Ok(Self {
                client,
                base_url: config.base_url.clone(),
                year: config.year,
                derate: config.derate,
            })
        }
    }

    #[async_trait]
    impl SolarSource for NasaPowerClient {
        async fn solar_per_kw(&self, lat: f64, lon: f64) -> Result<Vec<f64>, SolarError> {
            validate_coordinates(lat, lon)?;
            let url = request_url(&self.base_url, lat, lon, self.year);
            debug!(%url, "requesting solar resource");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| SolarError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(SolarError::Request(format!("HTTP {status}: {body}")));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| SolarError::Request(e.to_string()))?;
            let series = parse_power_response(&body, self.derate)?;
            info!(lat, lon, year = self.year, "fetched solar resource");
            Ok(series)
        }
    }
}
