//! Shoptalk API - Main entry point.

use anyhow::Result;
use shoptalk_common::config::Config;
use shoptalk_common::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Shoptalk API v{}", env!("CARGO_PKG_VERSION"));

    // Start the chat service
    shoptalk_api::start_server(&config).await
}
