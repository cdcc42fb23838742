//! WeatherAPI.com client, published as the "SkyLink" series

use std::time::Instant;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{
    ForecastProvider, HOURS_PER_SERIES, LocalZone, MAX_DAYS_PER_SERIES, ProviderOutcome,
    SkipReason, clamp_percent, get_json, local_hour_label, parse_date, redact,
};
use crate::Result;
use crate::config::ProvidersConfig;
use crate::models::{DailySample, HourlySample, WeatherCode, WeatherSeries};

const PROVIDER: &str = "WeatherAPI.com";

pub const SOURCE_NAME: &str = "SkyLink";
pub const DISCLAIMER: &str = "Powered by WeatherAPI.com";

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiResponse {
    pub forecast: WeatherApiForecast,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiForecast {
    pub forecastday: Vec<WeatherApiDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiDay {
    pub date: String,
    pub day: WeatherApiDaySummary,
    pub astro: WeatherApiAstro,
    #[serde(default)]
    pub hour: Vec<WeatherApiHour>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiDaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    #[serde(default)]
    pub daily_chance_of_rain: Option<f64>,
    #[serde(default)]
    pub daily_chance_of_snow: Option<f64>,
    pub condition: WeatherApiCondition,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiAstro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiHour {
    /// Local time, `2024-06-21 14:00`
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    #[serde(default)]
    pub chance_of_rain: Option<f64>,
    #[serde(default)]
    pub chance_of_snow: Option<f64>,
    pub cloud: f64,
    pub wind_mph: f64,
    pub wind_kph: f64,
    pub condition: WeatherApiCondition,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiCondition {
    pub text: String,
}

/// Rain chance, else snow chance, else 0. A zero rain chance defers to snow.
fn precipitation_chance(rain: Option<f64>, snow: Option<f64>) -> f64 {
    [rain, snow]
        .into_iter()
        .flatten()
        .find(|chance| *chance != 0.0)
        .unwrap_or(0.0)
}

/// Normalise a WeatherAPI.com payload.
///
/// Hours are flattened across days and cut at 24. The payload has no
/// condition code, so every sample reports [`WeatherCode::CLEAR`].
pub fn map_forecast(response: &WeatherApiResponse) -> Result<WeatherSeries> {
    let days = &response.forecast.forecastday;

    let hourly = days
        .iter()
        .flat_map(|day| day.hour.iter())
        .take(HOURS_PER_SERIES)
        .map(|h| -> Result<HourlySample> {
            Ok(HourlySample {
                time: local_hour_label(PROVIDER, &h.time)?,
                temp_c: h.temp_c,
                temp_f: h.temp_f,
                precip_chance: clamp_percent(precipitation_chance(h.chance_of_rain, h.chance_of_snow)),
                cloud_cover: h.cloud,
                wind_speed_mph: h.wind_mph,
                wind_speed_kph: h.wind_kph,
                summary: h.condition.text.clone(),
                weather_code: WeatherCode::CLEAR,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let daily = days
        .iter()
        .take(MAX_DAYS_PER_SERIES)
        .map(|d| -> Result<DailySample> {
            Ok(DailySample {
                date: parse_date(PROVIDER, &d.date)?,
                high_c: d.day.maxtemp_c,
                high_f: d.day.maxtemp_f,
                low_c: d.day.mintemp_c,
                low_f: d.day.mintemp_f,
                precip_chance: clamp_percent(precipitation_chance(
                    d.day.daily_chance_of_rain,
                    d.day.daily_chance_of_snow,
                )),
                summary: d.day.condition.text.clone(),
                weather_code: WeatherCode::CLEAR,
                sunrise: d.astro.sunrise.clone(),
                sunset: d.astro.sunset.clone(),
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
pub struct WeatherApiClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &ProvidersConfig) -> Self {
        Self {
            client,
            base_url: config.weather_api_url.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone(),
        }
    }

    async fn fetch_series(&self, api_key: &str, lat: f64, lon: f64) -> Result<WeatherSeries> {
        let start = Instant::now();
        let url = format!(
            "{}/forecast.json?key={}&q={lat},{lon}&days=10&aqi=yes",
            self.base_url,
            urlencoding::encode(api_key)
        );
        debug!("Requesting WeatherAPI.com forecast: {}", redact(&url, api_key));

        let response: WeatherApiResponse = get_json(&self.client, PROVIDER, &url).await?;
        let series = map_forecast(&response)?;
        info!(
            "Fetched {} forecast in {:.2}ms",
            SOURCE_NAME,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(series)
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    /// Timestamps already arrive in location-local time, so `_zone` is unused
    #[instrument(skip(self, _zone))]
    async fn fetch(&self, lat: f64, lon: f64, _zone: LocalZone) -> ProviderOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("WeatherAPI.com key not configured, skipping");
            return ProviderOutcome::Skipped {
                provider: SOURCE_NAME,
                reason: SkipReason::NotConfigured,
            };
        };
        ProviderOutcome::from_result(SOURCE_NAME, self.fetch_series(api_key, lat, lon).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn hour(date: &str, h: u32, rain: Value, snow: Value) -> Value {
        json!({
            "time": format!("{date} {h:02}:00"),
            "temp_c": 15.0,
            "temp_f": 59.0,
            "chance_of_rain": rain,
            "chance_of_snow": snow,
            "cloud": 40,
            "wind_mph": 8.1,
            "wind_kph": 13.0,
            "condition": { "text": "Partly cloudy" }
        })
    }

    fn day(date: &str) -> Value {
        json!({
            "date": date,
            "day": {
                "maxtemp_c": 21.0, "maxtemp_f": 69.8,
                "mintemp_c": 9.0, "mintemp_f": 48.2,
                "daily_chance_of_rain": 0, "daily_chance_of_snow": 35,
                "condition": { "text": "Light snow" }
            },
            "astro": { "sunrise": "05:43 AM", "sunset": "09:21 PM" },
            "hour": (0..24).map(|h| hour(date, h, json!(10 + h), json!(0))).collect::<Vec<_>>()
        })
    }

    fn response(days: usize) -> WeatherApiResponse {
        let days: Vec<Value> = (0..days).map(|i| day(&format!("2024-06-{:02}", 10 + i))).collect();
        serde_json::from_value(json!({ "forecast": { "forecastday": days } })).unwrap()
    }

    #[test]
    fn test_flattens_to_first_24_hours() {
        let series = map_forecast(&response(3)).unwrap();
        assert_eq!(series.name, "SkyLink");
        assert_eq!(series.hourly.len(), 24);
        assert_eq!(series.hourly[0].time, "00:00");
        assert_eq!(series.hourly[23].time, "23:00");
        assert_eq!(series.hourly[5].precip_chance, 15.0);
        assert_eq!(series.hourly[0].summary, "Partly cloudy");
        assert!(series.hourly.iter().all(|h| h.weather_code == WeatherCode::CLEAR));
        assert_eq!(series.daily.len(), 3);
    }

    #[test]
    fn test_hours_span_days_when_first_day_is_short() {
        let mut value = json!({ "forecast": { "forecastday": [day("2024-06-10"), day("2024-06-11")] } });
        let first_day_hours = value["forecast"]["forecastday"][0]["hour"].as_array_mut().unwrap();
        first_day_hours.drain(0..20);
        let response: WeatherApiResponse = serde_json::from_value(value).unwrap();

        let series = map_forecast(&response).unwrap();
        assert_eq!(series.hourly.len(), 24);
        assert_eq!(series.hourly[0].time, "20:00");
        assert_eq!(series.hourly[4].time, "00:00");
    }

    #[test]
    fn test_daily_uses_snow_when_rain_is_zero() {
        let series = map_forecast(&response(1)).unwrap();
        let first = &series.daily[0];
        assert_eq!(first.precip_chance, 35.0);
        assert_eq!(first.high_f, 69.8);
        assert_eq!(first.sunrise, "05:43 AM");
        assert_eq!(first.summary, "Light snow");
    }

    #[test]
    fn test_daily_capped_at_ten() {
        assert_eq!(map_forecast(&response(14)).unwrap().daily.len(), 10);
    }

    #[rstest]
    #[case(Some(30.0), Some(80.0), 30.0)]
    #[case(Some(0.0), Some(80.0), 80.0)]
    #[case(None, Some(15.0), 15.0)]
    #[case(None, None, 0.0)]
    #[case(Some(0.0), Some(0.0), 0.0)]
    fn test_precipitation_priority(
        #[case] rain: Option<f64>,
        #[case] snow: Option<f64>,
        #[case] expected: f64,
    ) {
        assert_eq!(precipitation_chance(rain, snow), expected);
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let config = ProvidersConfig::default();
        let client = WeatherApiClient::new(crate::providers::build_http_client(&config).unwrap(), &config);
        let outcome = client
            .fetch(40.0, -105.0, crate::providers::known_zone(chrono_tz::UTC))
            .await;
        assert_eq!(
            outcome,
            ProviderOutcome::Skipped {
                provider: SOURCE_NAME,
                reason: SkipReason::NotConfigured
            }
        );
    }
}
