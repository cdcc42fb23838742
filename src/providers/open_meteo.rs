//! Open-Meteo forecast and air-quality client (the base provider)

use std::time::Instant;

use chrono_tz::Tz;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{HOURS_PER_SERIES, MAX_DAYS_PER_SERIES, clamp_percent, filled_at, get_json, local_hour_label, parse_date};
use crate::config::ProvidersConfig;
use crate::models::{
    AirQualityIndex, AltitudeSample, DailySample, DroneConditions, HourlySample, LadderRung,
    WeatherCode, WeatherSeries, daylight_aqi,
};
use crate::units;
use crate::{AeroCastError, Result};

const PROVIDER: &str = "Open-Meteo";
const AIR_QUALITY_PROVIDER: &str = "Open-Meteo air quality";

pub const SOURCE_NAME: &str = "AeroSource";
pub const DISCLAIMER: &str = "Based on Open-Meteo GFS/ECMWF models.";

/// Below this surface wind speed (m/s) the gust ratio is taken as 1
const CALM_WIND_MPS: f64 = 0.1;

const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weathercode,cloudcover,\
windspeed_10m,windgusts_10m,windspeed_80m,windspeed_120m,windspeed_180m,visibility,\
windspeed_50m,windspeed_100m,windspeed_150m,winddirection_10m,winddirection_80m,\
winddirection_120m,winddirection_180m";

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,uv_index_max,\
precipitation_probability_max,sunrise,sunset";

/// Forecast response; hourly and daily values are parallel arrays indexed by `time`
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoForecast {
    #[serde(default)]
    pub timezone: Option<String>,
    pub hourly: OpenMeteoHourly,
    pub daily: OpenMeteoDaily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub weathercode: Vec<Option<u16>>,
    pub cloudcover: Vec<Option<f64>>,
    pub windspeed_10m: Vec<Option<f64>>,
    pub windgusts_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_50m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_80m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_100m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_120m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_150m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_180m: Vec<Option<f64>>,
    #[serde(default)]
    pub winddirection_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub winddirection_80m: Vec<Option<f64>>,
    #[serde(default)]
    pub winddirection_120m: Vec<Option<f64>>,
    #[serde(default)]
    pub winddirection_180m: Vec<Option<f64>>,
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
}

impl OpenMeteoForecast {
    /// The location's zone as reported with `timezone=auto`, UTC if unknown
    #[must_use]
    pub fn zone(&self) -> Tz {
        match self.timezone.as_deref().map(str::parse::<Tz>) {
            Some(Ok(tz)) => tz,
            Some(Err(_)) => {
                warn!("Unrecognised time zone {:?} from Open-Meteo, using UTC", self.timezone);
                Tz::UTC
            }
            None => Tz::UTC,
        }
    }
}

impl OpenMeteoHourly {
    fn wind_speed(&self, rung: LadderRung) -> &[Option<f64>] {
        match rung {
            LadderRung::Surface => &self.windspeed_10m,
            LadderRung::M50 => &self.windspeed_50m,
            LadderRung::M80 => &self.windspeed_80m,
            LadderRung::M100 => &self.windspeed_100m,
            LadderRung::M120 => &self.windspeed_120m,
            LadderRung::M150 => &self.windspeed_150m,
            LadderRung::M180 => &self.windspeed_180m,
        }
    }

    /// Only the measured direction rungs have an array
    fn wind_direction(&self, rung: LadderRung) -> Option<&[Option<f64>]> {
        match rung {
            LadderRung::Surface => Some(&self.winddirection_10m),
            LadderRung::M80 => Some(&self.winddirection_80m),
            LadderRung::M120 => Some(&self.winddirection_120m),
            LadderRung::M180 => Some(&self.winddirection_180m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoDaily {
    pub time: Vec<String>,
    pub weathercode: Vec<Option<u16>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index_max: Vec<Option<f64>>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default)]
    pub hourly: Option<AirQualityHourly>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityHourly {
    #[serde(default)]
    pub us_aqi: Vec<Option<f64>>,
}

/// Normalise a forecast payload into the base [`WeatherSeries`].
///
/// Takes the first 24 hours and first 10 days. A null value is filled from
/// its neighbours; a short array fails the whole series.
pub fn map_forecast(
    forecast: &OpenMeteoForecast,
    aqi: Option<AirQualityIndex>,
) -> Result<WeatherSeries> {
    let h = &forecast.hourly;
    let hourly = h
        .time
        .iter()
        .take(HOURS_PER_SERIES)
        .enumerate()
        .map(|(i, time)| -> Result<HourlySample> {
            let temp_c = filled_at(PROVIDER, "temperature_2m", &h.temperature_2m, i)?;
            let wind_mps = filled_at(PROVIDER, "windspeed_10m", &h.windspeed_10m, i)?;
            let code = WeatherCode(filled_at(PROVIDER, "weathercode", &h.weathercode, i)?);
            Ok(HourlySample {
                time: local_hour_label(PROVIDER, time)?,
                temp_c,
                temp_f: units::c_to_f(temp_c),
                precip_chance: clamp_percent(filled_at(
                    PROVIDER,
                    "precipitation_probability",
                    &h.precipitation_probability,
                    i,
                )?),
                cloud_cover: filled_at(PROVIDER, "cloudcover", &h.cloudcover, i)?,
                wind_speed_mph: units::mps_to_mph(wind_mps),
                wind_speed_kph: units::mps_to_kph(wind_mps),
                summary: code.label(),
                weather_code: code,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let d = &forecast.daily;
    let daily = d
        .time
        .iter()
        .take(MAX_DAYS_PER_SERIES)
        .enumerate()
        .map(|(i, date)| -> Result<DailySample> {
            let high_c = filled_at(PROVIDER, "temperature_2m_max", &d.temperature_2m_max, i)?;
            let low_c = filled_at(PROVIDER, "temperature_2m_min", &d.temperature_2m_min, i)?;
            let code = WeatherCode(filled_at(PROVIDER, "daily weathercode", &d.weathercode, i)?);
            let sun = |values: &[String], field: &str| {
                values
                    .get(i)
                    .cloned()
                    .ok_or_else(|| AeroCastError::malformed(PROVIDER, format!("missing {field}[{i}]")))
            };
            Ok(DailySample {
                date: parse_date(PROVIDER, date)?,
                high_c,
                high_f: units::c_to_f(high_c),
                low_c,
                low_f: units::c_to_f(low_c),
                precip_chance: clamp_percent(filled_at(
                    PROVIDER,
                    "precipitation_probability_max",
                    &d.precipitation_probability_max,
                    i,
                )?),
                summary: code.label(),
                weather_code: code,
                sunrise: sun(&d.sunrise, "sunrise")?,
                sunset: sun(&d.sunset, "sunset")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WeatherSeries {
        name: SOURCE_NAME.to_string(),
        hourly,
        daily,
        aqi,
        disclaimer: Some(DISCLAIMER.to_string()),
    })
}

/// Wind ladder, UV and visibility from the first forecast hour.
///
/// A null rung speed is filled from the rung below it (or above, for the
/// surface). UV and visibility are left out when the provider has no value.
pub fn derive_drone_conditions(forecast: &OpenMeteoForecast) -> Result<DroneConditions> {
    let h = &forecast.hourly;
    let speeds: Vec<Option<f64>> = LadderRung::ALL
        .iter()
        .map(|&rung| first_value(h.wind_speed(rung)))
        .collect();
    let directions: Vec<Option<f64>> = LadderRung::ALL
        .iter()
        .filter_map(|&rung| h.wind_direction(rung))
        .map(first_value)
        .collect();
    let surface_direction = filled_at(PROVIDER, "winddirection", &directions, 0)?;

    let surface_wind = filled_at(PROVIDER, "windspeed", &speeds, 0)?;
    let surface_gust = first_value(&h.windgusts_10m).unwrap_or(surface_wind);
    let gust_ratio = if surface_wind > CALM_WIND_MPS {
        surface_gust / surface_wind
    } else {
        1.0
    };

    let altitudes = LadderRung::ALL
        .iter()
        .enumerate()
        .map(|(i, &rung)| -> Result<AltitudeSample> {
            let field = format!("windspeed_{}m", rung.meters());
            let wind_mps = filled_at(PROVIDER, &field, &speeds, i)?;
            let gust_mps = if rung == LadderRung::Surface {
                surface_gust
            } else {
                wind_mps * gust_ratio
            };
            let direction = h
                .wind_direction(rung.direction_source())
                .and_then(first_value)
                .unwrap_or(surface_direction);
            Ok(AltitudeSample::from_mps(rung.altitude_ft(), wind_mps, gust_mps, direction))
        })
        .collect::<Result<Vec<_>>>()?;

    let visibility_km = first_value(&h.visibility).map(|metres| metres / 1000.0);

    Ok(DroneConditions {
        altitudes,
        uv_index_max: first_value(&forecast.daily.uv_index_max),
        visibility_km,
        visibility_mi: visibility_km.map(units::km_to_mi),
        source_name: SOURCE_NAME.to_string(),
    })
}

fn first_value(values: &[Option<f64>]) -> Option<f64> {
    values.first().copied().flatten()
}

/// Client for the Open-Meteo forecast and air-quality endpoints
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    forecast_url: String,
    air_quality_url: String,
    forecast_days: u32,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &ProvidersConfig) -> Self {
        Self {
            client,
            forecast_url: config.open_meteo_url.trim_end_matches('/').to_string(),
            air_quality_url: config.air_quality_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        }
    }

    /// Fetch the raw forecast. Any failure here is fatal to the bundle.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<OpenMeteoForecast> {
        let start = Instant::now();
        let url = format!(
            "{}/forecast?latitude={lat}&longitude={lon}&forecast_days={}&hourly={HOURLY_FIELDS}\
             &daily={DAILY_FIELDS}&temperature_unit=celsius&windspeed_unit=ms\
             &timeformat=iso8601&timezone=auto",
            self.forecast_url, self.forecast_days
        );
        debug!("Requesting base forecast: {}", url);

        let forecast: OpenMeteoForecast = get_json(&self.client, PROVIDER, &url).await?;
        info!(
            "Fetched base forecast ({} hours, timezone {}) in {:.2}ms",
            forecast.hourly.time.len(),
            forecast.timezone.as_deref().unwrap_or("unknown"),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(forecast)
    }

    /// Daylight AQI for the location; `Ok(None)` when the endpoint has no data
    #[instrument(skip(self))]
    pub async fn fetch_air_quality(&self, lat: f64, lon: f64) -> Result<Option<AirQualityIndex>> {
        let url = format!(
            "{}/air-quality?latitude={lat}&longitude={lon}&hourly=us_aqi",
            self.air_quality_url
        );
        debug!("Requesting air quality: {}", url);

        let response: AirQualityResponse = get_json(&self.client, AIR_QUALITY_PROVIDER, &url).await?;
        Ok(response.hourly.and_then(|hourly| daylight_aqi(&hourly.us_aqi)))
    }
}
