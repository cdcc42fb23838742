use std::path::PathBuf;

use aerocast::{AeroCastConfig, VERSION, logging, web};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config file path as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AeroCastConfig::load_from_path(config_path)?;

    logging::init_tracing(&config.logging)?;
    tracing::info!("Starting AeroCast {}", VERSION);

    web::run(&config).await.context("Web server failed")?;
    Ok(())
}
