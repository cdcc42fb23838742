//! Shared fixtures for the mock-server integration tests
#![allow(dead_code)]

use aerocast::config::ProvidersConfig;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Every provider pointed at the mock server, keys set, no retries
pub fn providers_config(server: &MockServer) -> ProvidersConfig {
    ProvidersConfig {
        open_meteo_url: server.uri(),
        air_quality_url: server.uri(),
        geocoding_url: server.uri(),
        weather_api_url: server.uri(),
        weather_api_key: Some("weather-key".to_string()),
        tomorrow_io_url: server.uri(),
        tomorrow_io_key: Some("tomorrow-key".to_string()),
        forecast_days: 10,
        timeout_seconds: 5,
        max_retries: 0,
    }
}

/// Nothing listens here; requests fail with a connection error
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn open_meteo_forecast() -> Value {
    let hours = 48;
    let series = |value: f64| vec![value; hours];
    let days: Vec<String> = (1..=10).map(|d| format!("2024-07-{d:02}")).collect();
    json!({
        "timezone": "America/Denver",
        "hourly": {
            "time": (0..hours).map(|i| format!("2024-07-{:02}T{:02}:00", 1 + i / 24, i % 24)).collect::<Vec<_>>(),
            "temperature_2m": series(21.0),
            "precipitation_probability": series(10.0),
            "weathercode": vec![1; hours],
            "cloudcover": series(20.0),
            "windspeed_10m": series(5.0),
            "windgusts_10m": series(7.5),
            "windspeed_50m": series(6.0),
            "windspeed_80m": series(7.0),
            "windspeed_100m": series(7.5),
            "windspeed_120m": series(8.0),
            "windspeed_150m": series(9.0),
            "windspeed_180m": series(10.0),
            "winddirection_10m": series(350.0),
            "winddirection_80m": series(5.0),
            "winddirection_120m": series(15.0),
            "winddirection_180m": series(25.0),
            "visibility": series(30000.0)
        },
        "daily": {
            "time": days,
            "weathercode": vec![2; 10],
            "temperature_2m_max": [20.0, 22.0, 23.0, 21.0, 19.0, 18.0, 20.0, 24.0, 25.0, 22.0],
            "temperature_2m_min": vec![8.0; 10],
            "uv_index_max": vec![7.2; 10],
            "precipitation_probability_max": vec![30.0; 10],
            "sunrise": vec!["2024-07-01T05:35"; 10],
            "sunset": vec!["2024-07-01T20:31"; 10]
        }
    })
}

/// Daylight hours hold 40 and 60 among gaps; night hours are higher but ignored
pub fn air_quality() -> Value {
    let mut us_aqi = vec![Value::Null; 24];
    us_aqi[2] = json!(150);
    us_aqi[9] = json!(40);
    us_aqi[14] = json!(60);
    us_aqi[22] = json!(120);
    json!({ "hourly": { "us_aqi": us_aqi } })
}

pub fn weather_api_forecast() -> Value {
    let day = |date: &str| {
        json!({
            "date": date,
            "day": {
                "maxtemp_c": 22.0, "maxtemp_f": 71.6,
                "mintemp_c": 9.0, "mintemp_f": 48.2,
                "daily_chance_of_rain": 20, "daily_chance_of_snow": 0,
                "condition": { "text": "Sunny" }
            },
            "astro": { "sunrise": "05:35 AM", "sunset": "08:31 PM" },
            "hour": (0..24).map(|h| json!({
                "time": format!("{date} {h:02}:00"),
                "temp_c": 18.0, "temp_f": 64.4,
                "chance_of_rain": 0, "chance_of_snow": 0,
                "cloud": 10, "wind_mph": 6.0, "wind_kph": 9.7,
                "condition": { "text": "Sunny" }
            })).collect::<Vec<_>>()
        })
    };
    json!({ "forecast": { "forecastday": [day("2024-07-01"), day("2024-07-02"), day("2024-07-03")] } })
}

pub fn tomorrow_io_forecast() -> Value {
    json!({
        "timelines": {
            "hourly": (0..30).map(|i| json!({
                "time": format!("2024-07-{:02}T{:02}:00:00Z", 1 + i / 24, i % 24),
                "values": {
                    "temperature": 19.0,
                    "precipitationProbability": 0,
                    "cloudCover": 5,
                    "windSpeed": 2.5,
                    "weatherCode": 1000
                }
            })).collect::<Vec<_>>(),
            "daily": (1..=5).map(|d| json!({
                "time": format!("2024-07-{d:02}T06:00:00Z"),
                "values": {
                    "temperatureMax": 23.0,
                    "temperatureMin": 10.0,
                    "precipitationProbabilityMax": 15,
                    "weatherCodeMax": 1100,
                    "sunriseTime": format!("2024-07-{d:02}T11:35:00Z"),
                    "sunsetTime": format!("2024-07-{d:02}T02:31:00Z")
                }
            })).collect::<Vec<_>>()
        }
    })
}

pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Base, air quality and both optional providers all answering 200
pub async fn mount_all_providers(server: &MockServer) {
    mount_json(server, "/forecast", open_meteo_forecast()).await;
    mount_json(server, "/air-quality", air_quality()).await;
    mount_json(server, "/forecast.json", weather_api_forecast()).await;
    mount_json(server, "/weather/forecast", tomorrow_io_forecast()).await;
}
