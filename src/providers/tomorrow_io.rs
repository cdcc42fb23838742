//! Tomorrow.io client, published as the "MeteoPlus" series

use std::time::Instant;

use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{
    ForecastProvider, HOURS_PER_SERIES, LocalZone, MAX_DAYS_PER_SERIES, ProviderOutcome,
    SkipReason, clamp_percent, get_json, redact, zoned_hour_label, zoned_instant,
};
use crate::Result;
use crate::config::ProvidersConfig;
use crate::models::{DailySample, HourlySample, WeatherCode, WeatherSeries};
use crate::units;

const PROVIDER: &str = "Tomorrow.io";

pub const SOURCE_NAME: &str = "MeteoPlus";
pub const DISCLAIMER: &str = "Powered by Tomorrow.io";

#[derive(Debug, Clone, Deserialize)]
pub struct TomorrowIoResponse {
    pub timelines: TomorrowIoTimelines,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomorrowIoTimelines {
    #[serde(default)]
    pub hourly: Vec<TomorrowIoEntry<HourlyValues>>,
    #[serde(default)]
    pub daily: Vec<TomorrowIoEntry<DailyValues>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomorrowIoEntry<V> {
    /// RFC 3339 instant
    pub time: String,
    pub values: V,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyValues {
    pub temperature: f64,
    pub precipitation_probability: f64,
    pub cloud_cover: f64,
    /// Metres per second
    pub wind_speed: f64,
    pub weather_code: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyValues {
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation_probability_max: f64,
    pub weather_code_max: u32,
    pub sunrise_time: String,
    pub sunset_time: String,
}

/// Normalise a Tomorrow.io payload, translating its condition codes to WMO.
///
/// Tomorrow.io reports UTC instants; hour labels and dates are taken in `tz`.
pub fn map_forecast(response: &TomorrowIoResponse, tz: Tz) -> Result<WeatherSeries> {
    let timelines = &response.timelines;

    let hourly = timelines
        .hourly
        .iter()
        .take(HOURS_PER_SERIES)
        .map(|entry| -> Result<HourlySample> {
            let v = &entry.values;
            let local = zoned_instant(PROVIDER, &entry.time, tz)?;
            Ok(HourlySample {
                time: zoned_hour_label(&local),
                temp_c: v.temperature,
                temp_f: units::c_to_f(v.temperature),
                precip_chance: clamp_percent(v.precipitation_probability),
                cloud_cover: v.cloud_cover,
                wind_speed_mph: units::mps_to_mph(v.wind_speed),
                wind_speed_kph: units::mps_to_kph(v.wind_speed),
                summary: format!("Code: {}", v.weather_code),
                weather_code: WeatherCode::from_tomorrow_io(v.weather_code),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let daily = timelines
        .daily
        .iter()
        .take(MAX_DAYS_PER_SERIES)
        .map(|entry| -> Result<DailySample> {
            let v = &entry.values;
            Ok(DailySample {
                date: zoned_instant(PROVIDER, &entry.time, tz)?.date_naive(),
                high_c: v.temperature_max,
                high_f: units::c_to_f(v.temperature_max),
                low_c: v.temperature_min,
                low_f: units::c_to_f(v.temperature_min),
                precip_chance: clamp_percent(v.precipitation_probability_max),
                summary: format!("Code: {}", v.weather_code_max),
                weather_code: WeatherCode::from_tomorrow_io(v.weather_code_max),
                sunrise: v.sunrise_time.clone(),
                sunset: v.sunset_time.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WeatherSeries {
        name: SOURCE_NAME.to_string(),
        hourly,
        daily,
        aqi: None,
        disclaimer: Some(DISCLAIMER.to_string()),
    })
}

/// Optional provider, disabled without an API key
#[derive(Clone)]
pub struct TomorrowIoClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

impl TomorrowIoClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &ProvidersConfig) -> Self {
        Self {
            client,
            base_url: config.tomorrow_io_url.trim_end_matches('/').to_string(),
            api_key: config.tomorrow_io_key.clone(),
        }
    }

    async fn fetch_series(
        &self,
        api_key: &str,
        lat: f64,
        lon: f64,
        zone: LocalZone,
    ) -> Result<WeatherSeries> {
        let start = Instant::now();
        let url = format!(
            "{}/weather/forecast?location={lat},{lon}&apikey={}",
            self.base_url,
            urlencoding::encode(api_key)
        );
        debug!("Requesting Tomorrow.io forecast: {}", redact(&url, api_key));

        let response: TomorrowIoResponse = get_json(&self.client, PROVIDER, &url).await?;
        let series = map_forecast(&response, zone.await)?;
        info!(
            "Fetched {} forecast in {:.2}ms",
            SOURCE_NAME,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(series)
    }
}

#[async_trait]
impl ForecastProvider for TomorrowIoClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    #[instrument(skip(self, zone))]
    async fn fetch(&self, lat: f64, lon: f64, zone: LocalZone) -> ProviderOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Tomorrow.io key not configured, skipping");
            return ProviderOutcome::Skipped {
                provider: SOURCE_NAME,
                reason: SkipReason::NotConfigured,
            };
        };
        ProviderOutcome::from_result(SOURCE_NAME, self.fetch_series(api_key, lat, lon, zone).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn payload(hours: usize, days: usize) -> Value {
        json!({
            "timelines": {
                "hourly": (0..hours).map(|i| json!({
                    "time": format!("2024-06-{:02}T{:02}:00:00Z", 21 + i / 24, i % 24),
                    "values": {
                        "temperature": 25.0,
                        "precipitationProbability": 5,
                        "cloudCover": 12.5,
                        "windSpeed": 3.0,
                        "weatherCode": if i == 0 { 1101 } else { 4201 }
                    }
                })).collect::<Vec<_>>(),
                "daily": (0..days).map(|i| json!({
                    "time": format!("2024-06-{:02}T06:00:00Z", 10 + i),
                    "values": {
                        "temperatureMax": 30.0,
                        "temperatureMin": 15.0,
                        "precipitationProbabilityMax": 40,
                        "weatherCodeMax": 8000,
                        "sunriseTime": format!("2024-06-{:02}T03:41:00Z", 10 + i),
                        "sunsetTime": format!("2024-06-{:02}T19:12:00Z", 10 + i)
                    }
                })).collect::<Vec<_>>()
            }
        })
    }

    fn response(hours: usize, days: usize) -> TomorrowIoResponse {
        serde_json::from_value(payload(hours, days)).unwrap()
    }

    #[test]
    fn test_maps_hourly_values() {
        let series = map_forecast(&response(120, 6), Tz::UTC).unwrap();
        assert_eq!(series.name, "MeteoPlus");
        assert_eq!(series.hourly.len(), 24);

        let first = &series.hourly[0];
        assert_eq!(first.time, "00:00");
        assert_eq!(first.temp_f, 77.0);
        assert_eq!(first.weather_code, WeatherCode(2));
        assert_eq!(first.summary, "Code: 1101");
        assert!((first.wind_speed_mph - 6.71082).abs() < 1e-9);
        assert_eq!(series.hourly[1].weather_code, WeatherCode(65));
    }

    #[test]
    fn test_maps_daily_values() {
        let series = map_forecast(&response(24, 15), Tz::UTC).unwrap();
        assert_eq!(series.daily.len(), 10);

        let first = &series.daily[0];
        assert_eq!(first.date.to_string(), "2024-06-10");
        assert_eq!(first.high_f, 86.0);
        assert_eq!(first.low_f, 59.0);
        assert_eq!(first.weather_code, WeatherCode(95));
        assert_eq!(first.summary, "Code: 8000");
        assert_eq!(first.sunrise, "2024-06-10T03:41:00Z");
    }

    #[test]
    fn test_unmapped_code_is_clear() {
        let mut value = payload(1, 0);
        value["timelines"]["hourly"][0]["values"]["weatherCode"] = json!(3000);
        let series = map_forecast(&serde_json::from_value(value).unwrap(), Tz::UTC).unwrap();
        assert_eq!(series.hourly[0].weather_code, WeatherCode::CLEAR);
    }

    #[test]
    fn test_short_timelines_are_kept_as_is() {
        let series = map_forecast(&response(5, 2), Tz::UTC).unwrap();
        assert_eq!(series.hourly.len(), 5);
        assert_eq!(series.daily.len(), 2);
    }

    #[test]
    fn test_labels_follow_location_zone() {
        let mut value = payload(2, 1);
        value["timelines"]["hourly"][0]["time"] = json!("2024-07-01T00:00:00Z");
        value["timelines"]["hourly"][1]["time"] = json!("2024-07-01T01:00:00Z");
        value["timelines"]["daily"][0]["time"] = json!("2024-07-01T04:00:00Z");

        let series =
            map_forecast(&serde_json::from_value(value).unwrap(), chrono_tz::America::Denver).unwrap();

        assert_eq!(series.hourly[0].time, "18:00");
        assert_eq!(series.hourly[1].time, "19:00");
        assert_eq!(series.daily[0].date.to_string(), "2024-06-30");
    }
}
