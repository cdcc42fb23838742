//! JSON API consumed by the dashboard frontend

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::aggregator::{WeatherAggregator, WeatherReport};
use crate::config::DisplayConfig;
use crate::geocoding::GeocodingClient;
use crate::models::{AltitudeSample, Coordinates, FavoriteToggle, toggle_favorite};
use crate::solar::{self, HourWindow, SolarTimes};
use crate::units::{SpeedUnit, TimeFormat};
use crate::wind_interpolation::{InterpolatedWind, interpolate_at_altitude};
use crate::AeroCastError;

/// Shared handler state
pub struct AppState {
    pub aggregator: WeatherAggregator,
    pub geocoder: GeocodingClient,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn validate_position(lat: f64, lon: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            AeroCastError::validation(format!("Position out of range: {lat}, {lon}")).user_message(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub lat: f64,
    pub lon: f64,
}

#[instrument(skip(state))]
async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PositionQuery>,
) -> ApiResult<WeatherReport> {
    validate_position(query.lat, query.lon)?;
    let start = Instant::now();

    match state.aggregator.fetch_weather_bundle(query.lat, query.lon).await {
        Ok(report) => {
            info!(
                "Served weather for ({}, {}) in {:.2}ms",
                query.lat,
                query.lon,
                start.elapsed().as_secs_f64() * 1000.0
            );
            Ok(Json(report))
        }
        Err(e) => {
            warn!("Weather fetch failed: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InterpolateRequest {
    pub altitudes: Vec<AltitudeSample>,
    pub altitude_ft: f64,
    #[serde(default)]
    pub unit: Option<SpeedUnit>,
}

async fn interpolate_wind(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InterpolateRequest>,
) -> Json<InterpolatedWind> {
    let unit = request.unit.unwrap_or(state.display.speed_unit);
    Json(interpolate_at_altitude(&request.altitudes, request.altitude_ft, unit))
}

#[derive(Debug, Deserialize)]
pub struct SunQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// IANA zone name, e.g. `America/Denver`
    #[serde(default)]
    pub tz: Option<String>,
    #[serde(default)]
    pub time_format: Option<TimeFormat>,
}

#[derive(Debug, Serialize)]
pub struct SunReport {
    pub date: NaiveDate,
    pub timezone: String,
    pub times: SolarTimes,
    pub sunrise: String,
    pub sunset: String,
    pub golden_hour: HourWindow,
    pub blue_hour: HourWindow,
}

async fn get_sun(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SunQuery>,
) -> ApiResult<SunReport> {
    validate_position(query.lat, query.lon)?;

    let tz: Tz = match query.tz.as_deref() {
        Some(name) => name.parse().map_err(|_| {
            api_error(StatusCode::BAD_REQUEST, format!("Unknown time zone: {name}"))
        })?,
        None => Tz::UTC,
    };
    let format = query.time_format.unwrap_or(state.display.time_format);
    let date = query
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());

    let times = solar::solar_times(date, query.lat, query.lon);

    Ok(Json(SunReport {
        date,
        timezone: tz.name().to_string(),
        times,
        sunrise: solar::format_time(times.sunrise, tz, format),
        sunset: solar::format_time(times.sunset, tz, format),
        golden_hour: times.golden_hour_window(tz, format),
        blue_hour: times.blue_hour_window(tz, format),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

async fn search_places(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Coordinates>> {
    Json(state.geocoder.autocomplete(&query.q).await)
}

async fn resolve_place(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Coordinates> {
    state
        .geocoder
        .resolve(&query.q)
        .await
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Location not found: {}", query.q)))
}

#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    #[serde(default)]
    pub favorites: Vec<Coordinates>,
    pub current: Coordinates,
}

async fn toggle_favorite_handler(Json(request): Json<ToggleFavoriteRequest>) -> Json<FavoriteToggle> {
    Json(toggle_favorite(&request.favorites, &request.current))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<DisplayConfig> {
    Json(state.display)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/wind/interpolate", post(interpolate_wind))
        .route("/sun", get(get_sun))
        .route("/geocode/search", get(search_places))
        .route("/geocode/resolve", get(resolve_place))
        .route("/favorites/toggle", post(toggle_favorite_handler))
        .route("/settings", get(get_settings))
        .with_state(state)
}
