//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::{AeroCastError, Result};

/// Filter from `RUST_LOG`, else the configured level for this crate and tower-http
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "aerocast={level},tower_http={level},warn",
            level = config.level
        ))
    })
}

/// Install the global subscriber, pretty or JSON per `logging.format`
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| AeroCastError::config(format!("Failed to initialise logging: {e}")))
}
