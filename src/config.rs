//! Configuration management for `AeroCast`
//!
//! Settings come from an optional TOML file overlaid with environment
//! variables prefixed `AEROCAST_` (sections separated by `__`, e.g.
//! `AEROCAST_PROVIDERS__TOMORROW_IO_KEY`).

use crate::AeroCastError;
use crate::units::{SpeedUnit, TemperatureUnit, TimeFormat};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AeroCastConfig {
    /// Upstream weather providers
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Presentation defaults handed to API callers
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Upstream provider endpoints and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Open-Meteo forecast API (base provider)
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo_url: String,
    /// Open-Meteo air-quality API
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Open-Meteo geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_weather_api_url")]
    pub weather_api_url: String,
    /// WeatherAPI.com key; the provider is disabled without one
    #[serde(default)]
    pub weather_api_key: Option<String>,
    #[serde(default = "default_tomorrow_io_url")]
    pub tomorrow_io_url: String,
    /// Tomorrow.io key; the provider is disabled without one
    #[serde(default)]
    pub tomorrow_io_key: Option<String>,
    /// Days requested from the base provider
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures (connect errors, 5xx, 429)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory of the built frontend, served as fallback
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Unit and clock preferences used when a request does not say otherwise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub speed_unit: SpeedUnit,
    #[serde(default)]
    pub time_format: TimeFormat,
    /// Altitude the flight view opens at
    #[serde(default)]
    pub last_altitude_ft: f64,
}

fn default_open_meteo_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_weather_api_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_tomorrow_io_url() -> String {
    "https://api.tomorrow.io/v4".to_string()
}

fn default_forecast_days() -> u32 {
    10
}

fn default_timeout() -> u32 {
    15
}

fn default_max_retries() -> u32 {
    2
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            open_meteo_url: default_open_meteo_url(),
            air_quality_url: default_air_quality_url(),
            geocoding_url: default_geocoding_url(),
            weather_api_url: default_weather_api_url(),
            weather_api_key: None,
            tomorrow_io_url: default_tomorrow_io_url(),
            tomorrow_io_key: None,
            forecast_days: default_forecast_days(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AeroCastConfig {
    /// Load configuration from `aerocast.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("aerocast.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("AEROCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AeroCastConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.normalize_keys();
        config.validate()?;

        Ok(config)
    }

    /// Treat blank credentials as absent so the provider is simply disabled
    pub fn normalize_keys(&mut self) {
        for key in [
            &mut self.providers.weather_api_key,
            &mut self.providers.tomorrow_io_key,
        ] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds == 0 || self.providers.timeout_seconds > 300 {
            return Err(AeroCastError::config(
                "Provider timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.providers.max_retries > 10 {
            return Err(AeroCastError::config("Provider max retries cannot exceed 10").into());
        }

        if !(1..=16).contains(&self.providers.forecast_days) {
            return Err(AeroCastError::config("Forecast days must be between 1 and 16").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AeroCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AeroCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("open_meteo_url", &self.providers.open_meteo_url),
            ("air_quality_url", &self.providers.air_quality_url),
            ("geocoding_url", &self.providers.geocoding_url),
            ("weather_api_url", &self.providers.weather_api_url),
            ("tomorrow_io_url", &self.providers.tomorrow_io_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AeroCastError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
