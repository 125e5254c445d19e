//! Application setup and initialization

pub mod database;
pub mod extraction;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use receipt_core::Config;
use receipt_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let log_format: LogFormat = config.log_format.parse()?;
    receipt_infra::init_telemetry(log_format).context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let extractor = extraction::setup_extractor(&config)?;

    let state = services::initialize_services(&config, pool, storage, extractor);

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
