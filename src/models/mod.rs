//! Data models for `AeroCast`
//!
//! - Location: named coordinates and favorites
//! - Weather: the canonical per-provider forecast and the bundle of all providers
//! - Air quality: AQI categories and the daylight reduction
//! - Drone: wind by altitude

pub mod air_quality;
pub mod drone;
pub mod location;
pub mod weather;

pub use air_quality::{AirQualityIndex, AqiCategory, daylight_aqi};
pub use drone::{AltitudeSample, DroneConditions, LadderRung};
pub use location::{Coordinates, FavoriteToggle, toggle_favorite};
pub use weather::{DailySample, HourlySample, WeatherBundle, WeatherCode, WeatherSeries};
