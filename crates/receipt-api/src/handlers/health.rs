//! Health check handler and response type.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const HEALTHY: &str = "healthy";

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => HEALTHY.to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    /// `healthy`, `degraded` (storage failing) or `unhealthy` (database failing)
    pub status: String,
    pub database: String,
    pub storage: String,
}

/// Health check (database and storage)
///
/// A failing database makes the service unavailable; a failing storage
/// backend only degrades it.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy or degraded", body = HealthCheckResponse),
        (status = 503, description = "Database unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let receipts = state.receipts.clone();
    let database = run_check(
        CHECK_TIMEOUT,
        async move { receipts.ping().await },
        "unhealthy",
    )
    .await;

    let storage = state.storage.clone();
    let storage = run_check(
        CHECK_TIMEOUT,
        async move {
            storage
                .exists("health-check-non-existent-key")
                .await
                .map(drop)
        },
        "degraded",
    )
    .await;

    let (status_code, status) = if database != HEALTHY {
        tracing::error!(database = %database, "Health check failed");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if storage != HEALTHY {
        tracing::warn!(storage = %storage, "Storage health check failed");
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, HEALTHY)
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
            storage,
        }),
    )
}
