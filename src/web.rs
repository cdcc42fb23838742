use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::aggregator::WeatherAggregator;
use crate::api::{self, AppState};
use crate::config::AeroCastConfig;
use crate::geocoding::GeocodingClient;
use crate::providers;

/// API under `/api`, the built frontend for everything else
pub fn app(state: Arc<AppState>, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub fn build_state(config: &AeroCastConfig) -> Result<Arc<AppState>> {
    let client = providers::build_http_client(&config.providers)?;
    Ok(Arc::new(AppState {
        aggregator: WeatherAggregator::from_config(&config.providers)?,
        geocoder: GeocodingClient::new(client, &config.providers),
        display: config.display,
    }))
}

pub async fn run(config: &AeroCastConfig) -> Result<()> {
    let app = app(build_state(config)?, &config.server.static_dir);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);
    axum::serve(listener, app).await?;
    Ok(())
}
