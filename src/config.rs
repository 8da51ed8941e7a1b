//! TOML-based sizer configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sizing::{CostWeights, SearchParams};
use crate::solar::nasa_power::DEFAULT_BASE_URL;

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and falls back to its defaults. Load from TOML
/// with [`SizerConfig::from_toml_file`] or start from
/// [`SizerConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizerConfig {
    /// PV sweep and battery bisection parameters.
    #[serde(default)]
    pub search: SearchConfig,
    /// Default cost weights when a request does not supply them.
    #[serde(default)]
    pub costs: CostConfig,
    /// Solar resource lookup.
    #[serde(default)]
    pub solar: SolarConfig,
    /// HTTP server binding.
    #[serde(default)]
    pub server: ServerConfig,
}

/// PV sweep and battery bisection parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Number of PV candidates (must be > 0).
    pub sweep_points: usize,
    /// Sweep end as a multiple of the break-even PV size (must be >= 1).
    pub sweep_span: f64,
    /// Bisection tolerance in kWh (must be > 0).
    pub tolerance_kwh: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let p = SearchParams::default();
        Self {
            sweep_points: p.sweep_points,
            sweep_span: p.sweep_span,
            tolerance_kwh: p.tolerance_kwh,
        }
    }
}

/// Default linear cost weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostConfig {
    /// Cost per PV kW.
    pub pv_cost: f64,
    /// Cost per battery kWh.
    pub battery_cost: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        let c = CostWeights::default();
        Self {
            pv_cost: c.pv_cost,
            battery_cost: c.battery_cost,
        }
    }
}

/// Solar resource lookup parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// NASA POWER base URL.
    pub base_url: String,
    /// Calendar year of irradiance data (must have 8760 hours).
    pub year: i32,
    /// Fraction of irradiance delivered as AC output (0.0–1.0].
    pub derate: f64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            year: 2022,
            derate: 0.75,
            timeout_secs: 20,
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface address to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"search.sweep_points"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl SizerConfig {
    /// Search parameters for the sizing core.
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            sweep_points: self.search.sweep_points,
            sweep_span: self.search.sweep_span,
            tolerance_kwh: self.search.tolerance_kwh,
        }
    }

    /// Default cost weights for requests that omit them.
    pub fn cost_weights(&self) -> CostWeights {
        CostWeights::new(self.costs.pv_cost, self.costs.battery_cost)
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.search;
        if s.sweep_points == 0 {
            errors.push(ConfigError {
                field: "search.sweep_points".into(),
                message: "must be > 0".into(),
            });
        }
        if !s.sweep_span.is_finite() || s.sweep_span < 1.0 {
            errors.push(ConfigError {
                field: "search.sweep_span".into(),
                message: "must be a finite number >= 1.0".into(),
            });
        }
        if !s.tolerance_kwh.is_finite() || s.tolerance_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "search.tolerance_kwh".into(),
                message: "must be a finite number > 0".into(),
            });
        }

        let c = &self.costs;
        if !c.pv_cost.is_finite() || c.pv_cost < 0.0 {
            errors.push(ConfigError {
                field: "costs.pv_cost".into(),
                message: "must be >= 0".into(),
            });
        }
        if !c.battery_cost.is_finite() || c.battery_cost < 0.0 {
            errors.push(ConfigError {
                field: "costs.battery_cost".into(),
                message: "must be >= 0".into(),
            });
        }

        let sol = &self.solar;
        if !(sol.derate > 0.0 && sol.derate <= 1.0) {
            errors.push(ConfigError {
                field: "solar.derate".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if sol.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "solar.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }
        if !sol.base_url.starts_with("http://") && !sol.base_url.starts_with("https://") {
            errors.push(ConfigError {
                field: "solar.base_url".into(),
                message: format!("must be an http(s) URL, got \"{}\"", sol.base_url),
            });
        }
        if chrono::NaiveDate::from_ymd_opt(sol.year, 2, 29).is_some() {
            errors.push(ConfigError {
                field: "solar.year".into(),
                message: format!("{} is a leap year; 8760 hourly values required", sol.year),
            });
        }

        errors
    }
}
