//! `AeroCast` - Multi-source weather for drone pilots and photographers
//!
//! This library fetches forecasts from a required base provider and optional
//! secondary providers, normalises them into one bundle, derives wind by
//! altitude for drone flights and computes sun times for photography.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod providers;
pub mod solar;
pub mod units;
pub mod web;
pub mod wind_interpolation;

// Re-export core types for public API
pub use aggregator::{WeatherAggregator, WeatherReport};
pub use config::AeroCastConfig;
pub use error::AeroCastError;
pub use geocoding::GeocodingClient;
pub use models::{
    AirQualityIndex, AltitudeSample, Coordinates, DroneConditions, WeatherBundle, WeatherSeries,
};
pub use providers::{ForecastProvider, LocalZone, ProviderOutcome, SkipReason, known_zone};
pub use solar::{HourWindow, SolarTimes};
pub use units::{SpeedUnit, TemperatureUnit, TimeFormat};
pub use wind_interpolation::{InterpolatedWind, interpolate_at_altitude};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AeroCastError>;
