//! Migration advisor service
//!
//! Serves inventory analysis and follow-up questions over HTTP, alongside
//! health probes and Prometheus metrics.

use advisor_lib::{
    health::{ComponentStatus, HealthRegistry},
    narrative::build_narrator,
    observability::StructuredLogger,
    Analyzer,
};
use advisor_server::{api, config::ServerConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ServerConfig::load()?;
    info!(instance = %config.instance_name, port = config.port, "Advisor configured");

    let health_registry = HealthRegistry::new();

    let analyzer = Analyzer::new(config.engine()?).context("Engine configuration rejected")?;
    if health_registry.observe_engine(&analyzer).await != ComponentStatus::Healthy {
        warn!("Engine self-check failed, serving as not ready");
    }

    let narrator = build_narrator(config.narrator.as_ref())
        .context("Failed to configure narrative generator")?;
    health_registry.observe_narrator(narrator.as_ref()).await;

    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(SERVICE_VERSION, narrator.name());

    let app_state = Arc::new(
        api::AppState::new(analyzer, narrator, health_registry.clone(), logger.clone())
            .with_max_body_bytes(config.max_body_bytes),
    );

    health_registry.set_ready(true).await;

    api::serve(config.port, app_state).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
