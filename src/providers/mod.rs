//! Upstream forecast providers
//!
//! The base provider (Open-Meteo) is required and its failures propagate.
//! Every other provider implements [`ForecastProvider`] and reports failure
//! as a [`ProviderOutcome::Skipped`] value instead of an error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use chrono_tz::Tz;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ProvidersConfig;
use crate::models::WeatherSeries;
use crate::{AeroCastError, Result};

pub mod open_meteo;
pub mod tomorrow_io;
pub mod weather_api;

pub use open_meteo::OpenMeteoClient;
pub use tomorrow_io::TomorrowIoClient;
pub use weather_api::WeatherApiClient;

/// Hourly samples kept per series
pub const HOURS_PER_SERIES: usize = 24;
/// Daily samples kept per series
pub const MAX_DAYS_PER_SERIES: usize = 10;

/// Why an optional provider contributed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No credential configured
    NotConfigured,
    /// Network error, non-2xx status or unreadable payload
    Failed(String),
}

/// Result of asking an optional provider for a forecast
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Fetched(WeatherSeries),
    Skipped {
        provider: &'static str,
        reason: SkipReason,
    },
}

impl ProviderOutcome {
    #[must_use]
    pub fn into_series(self) -> Option<WeatherSeries> {
        match self {
            Self::Fetched(series) => Some(series),
            Self::Skipped { .. } => None,
        }
    }

    /// Convert a fetch result, logging and swallowing the error
    pub(crate) fn from_result(provider: &'static str, result: Result<WeatherSeries>) -> Self {
        match result {
            Ok(series) => Self::Fetched(series),
            Err(e) => {
                warn!(provider, error = %e, "Optional provider failed, leaving it out");
                Self::Skipped {
                    provider,
                    reason: SkipReason::Failed(e.to_string()),
                }
            }
        }
    }
}

/// The location's IANA zone, resolved once the base forecast arrives
pub type LocalZone = Shared<BoxFuture<'static, Tz>>;

/// A [`LocalZone`] that is already known
#[must_use]
pub fn known_zone(tz: Tz) -> LocalZone {
    futures::future::ready(tz).boxed().shared()
}

/// A best-effort forecast source. Implementations never return errors.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Providers that report UTC instants await `zone` before labelling hours
    async fn fetch(&self, lat: f64, lon: f64, zone: LocalZone) -> ProviderOutcome;
}

/// Shared HTTP client with timeout and retry of transient failures
pub fn build_http_client(config: &ProvidersConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
        .user_agent(format!("aerocast/{}", crate::VERSION))
        .build()
        .map_err(|e| AeroCastError::config(format!("Failed to create HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// GET `url` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    provider: &str,
    url: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AeroCastError::network(provider, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AeroCastError::status(provider, status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| AeroCastError::network(provider, e.to_string()))?;

    serde_json::from_slice(&body).map_err(|e| AeroCastError::malformed(provider, e.to_string()))
}

/// Replace a credential in a URL before it is logged
pub(crate) fn redact(url: &str, secret: &str) -> String {
    if secret.is_empty() {
        url.to_string()
    } else {
        url.replace(secret, "***")
    }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn format_hour(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// `"HH:00"` from a zone-less local timestamp (`2024-06-21T14:00` or `2024-06-21 14:00`)
pub(crate) fn local_hour_label(provider: &str, timestamp: &str) -> Result<String> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .map(|t| format_hour(t.hour()))
        .ok_or_else(|| AeroCastError::malformed(provider, format!("bad timestamp '{timestamp}'")))
}

/// An RFC 3339 instant as wall-clock time in `tz`
pub(crate) fn zoned_instant(provider: &str, timestamp: &str, tz: Tz) -> Result<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&tz))
        .map_err(|e| AeroCastError::malformed(provider, format!("bad timestamp '{timestamp}': {e}")))
}

pub(crate) fn zoned_hour_label(instant: &DateTime<Tz>) -> String {
    format_hour(instant.hour())
}

/// Calendar date from `2024-06-21` or the date part of `2024-06-21T06:00:00Z`
pub(crate) fn parse_date(provider: &str, value: &str) -> Result<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| AeroCastError::malformed(provider, format!("bad date '{value}': {e}")))
}

/// Entry `index` of a parallel array.
///
/// A null entry takes the previous non-null value in the array, or failing
/// that the next one. Only a short or all-null array is malformed.
pub(crate) fn filled_at<T: Copy>(
    provider: &str,
    field: &str,
    values: &[Option<T>],
    index: usize,
) -> Result<T> {
    match values.get(index) {
        Some(Some(value)) => Ok(*value),
        Some(None) => {
            let earlier = values[..index].iter().rev().flatten().next();
            let later = values[index + 1..].iter().flatten().next();
            debug!("{} sent null {}[{}], filling from a neighbour", provider, field, index);
            earlier
                .or(later)
                .copied()
                .ok_or_else(|| AeroCastError::malformed(provider, format!("no values for {field}")))
        }
        None => Err(AeroCastError::malformed(provider, format!("missing {field}[{index}]"))),
    }
}
