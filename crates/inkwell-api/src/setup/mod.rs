//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use inkwell_core::Config;
use inkwell_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    inkwell_infra::init_telemetry(LogFormat::parse(config.log_format()))
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    build_app(config).await
}

/// Storage, components and routes, without touching global telemetry.
pub async fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let config = Arc::new(config);

    let storage = storage::setup_storage(&config).await?;

    let state = services::build_state(config.clone(), storage)?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
