//! Place resolution against a mock geocoding endpoint

mod common;

use aerocast::geocoding::GeocodingClient;
use common::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn detroit() -> serde_json::Value {
    json!({ "results": [
        { "name": "Detroit", "latitude": 42.33, "longitude": -83.05, "admin1": "Michigan", "country": "United States" }
    ]})
}

#[tokio::test]
async fn test_resolve_retries_with_name_before_comma() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Detroit, Michigan, US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Detroit"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detroit()))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = GeocodingClient::from_config(&providers_config(&server)).unwrap();
    let place = geocoder.resolve("Detroit, Michigan, US").await.unwrap();

    assert_eq!(place.name, "Detroit, Michigan, United States");
    assert_eq!(place.lat, 42.33);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_resolve_does_not_retry_single_letter_prefix() {
    let server = MockServer::start().await;
    mount_json(&server, "/search", json!({})).await;

    let geocoder = GeocodingClient::from_config(&providers_config(&server)).unwrap();
    assert!(geocoder.resolve("D, Michigan").await.is_none());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().unwrap().contains("name=D%2C%20Michigan"));
}

#[tokio::test]
async fn test_resolve_without_comma_searches_once() {
    let server = MockServer::start().await;
    mount_json(&server, "/search", json!({})).await;

    let geocoder = GeocodingClient::from_config(&providers_config(&server)).unwrap();
    assert!(geocoder.resolve("Nowhereville").await.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
