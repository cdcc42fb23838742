//! Fan-out of one location fetch across every provider
//!
//! All requests run concurrently and each outcome is collected on its own:
//! a slow or failing optional provider never cancels the others. Only the
//! base forecast can fail the whole fetch. Optional providers that need the
//! location's time zone wait for the base response to supply it.

use std::sync::Arc;
use std::time::Instant;

use chrono_tz::Tz;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::ProvidersConfig;
use crate::models::{DroneConditions, WeatherBundle};
use crate::providers::{
    self, ForecastProvider, LocalZone, OpenMeteoClient, ProviderOutcome, SkipReason,
    TomorrowIoClient, WeatherApiClient, open_meteo,
};
use crate::{AeroCastError, Result};

/// Everything the dashboard needs for one location
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub bundle: WeatherBundle,
    pub drone: DroneConditions,
}

/// Fetches and merges forecasts from the base and optional providers
#[derive(Clone)]
pub struct WeatherAggregator {
    base: OpenMeteoClient,
    optional: Vec<Arc<dyn ForecastProvider>>,
}

impl WeatherAggregator {
    /// Base provider plus WeatherAPI.com and Tomorrow.io, in that order
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let client = providers::build_http_client(config)?;
        let optional: Vec<Arc<dyn ForecastProvider>> = vec![
            Arc::new(WeatherApiClient::new(client.clone(), config)),
            Arc::new(TomorrowIoClient::new(client.clone(), config)),
        ];
        Ok(Self::new(OpenMeteoClient::new(client, config), optional))
    }

    /// Optional providers are appended to the bundle in the order given here
    #[must_use]
    pub fn new(base: OpenMeteoClient, optional: Vec<Arc<dyn ForecastProvider>>) -> Self {
        Self { base, optional }
    }

    #[instrument(skip(self))]
    pub async fn fetch_weather_bundle(&self, lat: f64, lon: f64) -> Result<WeatherReport> {
        let start = Instant::now();

        let (zone_tx, zone_rx) = oneshot::channel::<Tz>();
        let zone: LocalZone = zone_rx.map(|tz| tz.unwrap_or(Tz::UTC)).boxed().shared();
        let base_forecast = async {
            let forecast = self.base.fetch_forecast(lat, lon).await;
            let tz = forecast.as_ref().map_or(Tz::UTC, open_meteo::OpenMeteoForecast::zone);
            // A dropped receiver only means no provider is waiting
            let _ = zone_tx.send(tz);
            forecast
        };

        let (forecast, air_quality, optional) = tokio::join!(
            base_forecast,
            self.base.fetch_air_quality(lat, lon),
            join_all(
                self.optional
                    .iter()
                    .map(|provider| provider.fetch(lat, lon, zone.clone()))
            ),
        );

        let forecast = forecast.map_err(|e| {
            warn!("Base forecast unavailable: {}", e);
            AeroCastError::base_unavailable(e)
        })?;

        let aqi = air_quality.unwrap_or_else(|e| {
            warn!("Air quality unavailable, omitting AQI: {}", e);
            None
        });

        let base = open_meteo::map_forecast(&forecast, aqi).map_err(AeroCastError::base_unavailable)?;
        let drone =
            open_meteo::derive_drone_conditions(&forecast).map_err(AeroCastError::base_unavailable)?;

        for outcome in &optional {
            if let ProviderOutcome::Skipped {
                provider,
                reason: SkipReason::NotConfigured,
            } = outcome
            {
                info!("{} not configured, skipping", provider);
            }
        }

        let bundle = WeatherBundle::new(base, optional.into_iter().filter_map(ProviderOutcome::into_series));

        info!(
            "Weather bundle for ({:.4}, {:.4}) with {} source(s) in {:.2}ms",
            lat,
            lon,
            bundle.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(WeatherReport { bundle, drone })
    }
}
