//! Place search and location resolution against the Open-Meteo geocoder
//!
//! Both operations are best-effort: lookup failures are logged and come back
//! as an empty list or `None`.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::ProvidersConfig;
use crate::models::Coordinates;
use crate::providers::{self, get_json};
use crate::{AeroCastError, Result};

const PROVIDER: &str = "Open-Meteo geocoding";

/// Inputs shorter than this (after trimming) are not searched
pub const MIN_AUTOCOMPLETE_CHARS: usize = 3;
const AUTOCOMPLETE_LIMIT: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<GeocodingResult> for Coordinates {
    fn from(result: GeocodingResult) -> Self {
        let label = [Some(result.name), result.admin1, result.country]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Coordinates::new(result.latitude, result.longitude, label)
    }
}

/// Parse `"lat,lon"`, validating both ranges
pub fn parse_coordinates(input: &str) -> Result<(f64, f64)> {
    let Some((lat, lon)) = input.split_once(',') else {
        return Err(AeroCastError::validation("Coordinates must be in format 'lat,lon'"));
    };

    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| AeroCastError::validation(format!("Invalid latitude: {}", lat.trim())))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|_| AeroCastError::validation(format!("Invalid longitude: {}", lon.trim())))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(AeroCastError::validation(format!(
            "Latitude must be between -90 and 90, got: {lat}"
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(AeroCastError::validation(format!(
            "Longitude must be between -180 and 180, got: {lon}"
        )));
    }

    Ok((lat, lon))
}

#[derive(Clone)]
pub struct GeocodingClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl GeocodingClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &ProvidersConfig) -> Self {
        Self {
            client,
            base_url: config.geocoding_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::new(providers::build_http_client(config)?, config))
    }

    async fn search(&self, name: &str, count: u32) -> Result<Vec<GeocodingResult>> {
        let url = format!(
            "{}/search?name={}&count={count}&language=en&format=json",
            self.base_url,
            urlencoding::encode(name)
        );
        debug!("Geocoding request: {}", url);
        let response: GeocodingResponse = get_json(&self.client, PROVIDER, &url).await?;
        Ok(response.results.unwrap_or_default())
    }

    /// Up to five place suggestions for a partially typed name
    #[instrument(skip(self))]
    pub async fn autocomplete(&self, input: &str) -> Vec<Coordinates> {
        if input.trim().chars().count() < MIN_AUTOCOMPLETE_CHARS {
            return Vec::new();
        }

        match self.search(input, AUTOCOMPLETE_LIMIT).await {
            Ok(results) => results.into_iter().map(Coordinates::from).collect(),
            Err(e) => {
                warn!("Place autocomplete failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Resolve free text or a raw `lat,lon` pair to a single location.
    ///
    /// When a comma-separated name ("Detroit, Michigan, US") finds nothing,
    /// the part before the first comma is tried on its own.
    #[instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Option<Coordinates> {
        let input = input.trim();
        if let Ok((lat, lon)) = parse_coordinates(input) {
            return Some(Coordinates::from_raw_position(lat, lon));
        }

        match self.resolve_name(input).await {
            Ok(found) => {
                if found.is_none() {
                    debug!("No geocoding results for '{}'", input);
                }
                found
            }
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", input, e);
                None
            }
        }
    }

    async fn resolve_name(&self, input: &str) -> Result<Option<Coordinates>> {
        let mut results = self.search(input, 1).await?;

        if results.is_empty() && input.contains(',') {
            let simple_name = input.split(',').next().unwrap_or(input).trim();
            if simple_name.chars().count() > 1 {
                debug!("Retrying geocoding with '{}'", simple_name);
                results = self.search(simple_name, 1).await?;
            }
        }

        Ok(results.into_iter().next().map(Coordinates::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("46.8182,8.2275", 46.8182, 8.2275)]
    #[case("-33.86, 151.21", -33.86, 151.21)]
    #[case("90,-180", 90.0, -180.0)]
    fn test_parse_coordinates(#[case] input: &str, #[case] lat: f64, #[case] lon: f64) {
        assert_eq!(parse_coordinates(input).unwrap(), (lat, lon));
    }

    #[rstest]
    #[case("Denver")]
    #[case("91,0")]
    #[case("0,181")]
    #[case("abc,def")]
    #[case("Detroit, Michigan")]
    fn test_parse_coordinates_rejects(#[case] input: &str) {
        assert!(matches!(
            parse_coordinates(input),
            Err(AeroCastError::Validation { .. })
        ));
    }

    #[test]
    fn test_label_skips_missing_parts() {
        let full = GeocodingResult {
            name: "Denver".to_string(),
            latitude: 39.74,
            longitude: -104.98,
            admin1: Some("Colorado".to_string()),
            country: Some("United States".to_string()),
        };
        assert_eq!(Coordinates::from(full).name, "Denver, Colorado, United States");

        let partial = GeocodingResult {
            name: "Monaco".to_string(),
            latitude: 43.73,
            longitude: 7.42,
            admin1: None,
            country: Some("Monaco".to_string()),
        };
        assert_eq!(Coordinates::from(partial).name, "Monaco, Monaco");
    }

    #[tokio::test]
    async fn test_short_input_skips_request() {
        let mut config = ProvidersConfig::default();
        config.geocoding_url = "http://127.0.0.1:1".to_string();
        config.max_retries = 0;
        let client = GeocodingClient::from_config(&config).unwrap();
        assert!(client.autocomplete(" de ").await.is_empty());
    }

    #[tokio::test]
    async fn test_raw_coordinates_resolve_locally() {
        let mut config = ProvidersConfig::default();
        config.geocoding_url = "http://127.0.0.1:1".to_string();
        let client = GeocodingClient::from_config(&config).unwrap();
        let location = client.resolve("39.7392,-104.9903").await.unwrap();
        assert_eq!(location.name, "Coordinates (39.74, -104.99)");
        assert_eq!(location.lat, 39.7392);
    }
}
