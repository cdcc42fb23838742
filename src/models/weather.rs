//! Canonical forecast model shared by every provider

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::air_quality::AirQualityIndex;
use crate::units::TemperatureUnit;

/// WMO-style weather condition code (0 = clear sky ... 99 = thunderstorm with hail)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct WeatherCode(pub u16);

impl WeatherCode {
    pub const CLEAR: Self = Self(0);

    /// Human-readable label, `None` for codes outside the labelled set
    #[must_use]
    pub fn known_label(self) -> Option<&'static str> {
        let label = match self.0 {
            0 => "Clear Sky",
            1 => "Mainly Clear",
            2 => "Partly Cloudy",
            3 => "Overcast",
            45 | 48 => "Foggy",
            51 | 53 | 55 => "Drizzle",
            61 | 63 | 65 => "Rain",
            71 | 73 | 75 => "Snow",
            80..=82 => "Rain Showers",
            85 | 86 => "Snow Showers",
            95 => "Thunderstorm",
            96 | 99 => "Thunderstorm with Hail",
            _ => return None,
        };
        Some(label)
    }

    #[must_use]
    pub fn label(self) -> String {
        self.known_label()
            .map_or_else(|| format!("Weather code: {}", self.0), str::to_string)
    }

    /// Map a Tomorrow.io condition code onto the WMO scale.
    ///
    /// Codes missing from the table map to [`WeatherCode::CLEAR`], the same
    /// value Tomorrow.io's own "unknown" code (0) maps to.
    #[must_use]
    pub fn from_tomorrow_io(code: u32) -> Self {
        let wmo = match code {
            1000 => 0,
            1100 => 1,
            1101 => 2,
            1102 | 1001 => 3,
            2000 | 2100 => 45,
            4000 => 51,
            4001 | 4200 | 6000 | 6001 | 6200 => 61,
            4201 | 6201 => 65,
            5000 | 5001 | 5100 | 7000 | 7102 => 71,
            5101 | 7101 => 75,
            8000 => 95,
            _ => 0,
        };
        Self(wmo)
    }
}

/// One hour of a provider's forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Wall-clock hour label, `"HH:00"`
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    /// Precipitation probability, clamped to 0-100
    pub precip_chance: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: f64,
    pub wind_speed_mph: f64,
    pub wind_speed_kph: f64,
    pub summary: String,
    #[serde(rename = "weathercode")]
    pub weather_code: WeatherCode,
}

impl HourlySample {
    #[must_use]
    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::C => self.temp_c,
            TemperatureUnit::F => self.temp_f,
        }
    }
}

/// One calendar day of a provider's forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub high_c: f64,
    pub high_f: f64,
    pub low_c: f64,
    pub low_f: f64,
    pub precip_chance: f64,
    pub summary: String,
    #[serde(rename = "weathercode")]
    pub weather_code: WeatherCode,
    /// Provider-local sunrise, as the provider wrote it
    pub sunrise: String,
    /// Provider-local sunset, as the provider wrote it
    pub sunset: String,
}

impl DailySample {
    #[must_use]
    pub fn high(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::C => self.high_c,
            TemperatureUnit::F => self.high_f,
        }
    }

    #[must_use]
    pub fn low(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::C => self.low_c,
            TemperatureUnit::F => self.low_f,
        }
    }
}

/// A single provider's forecast, normalised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    pub name: String,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<AirQualityIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

/// Every forecast obtained for one location fetch.
///
/// The base series always sits at index 0; optional providers follow in
/// their configured order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherBundle {
    sources: Vec<WeatherSeries>,
}

impl WeatherBundle {
    #[must_use]
    pub fn new(base: WeatherSeries, optional: impl IntoIterator<Item = WeatherSeries>) -> Self {
        let mut sources = vec![base];
        sources.extend(optional);
        Self { sources }
    }

    #[must_use]
    pub fn sources(&self) -> &[WeatherSeries] {
        &self.sources
    }

    /// The authoritative series (AQI and sun data come from here)
    #[must_use]
    pub fn base(&self) -> &WeatherSeries {
        &self.sources[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Always `false`; a bundle cannot exist without its base series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
