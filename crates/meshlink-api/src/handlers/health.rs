//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub scratch_storage: String,
    /// Live download tokens.
    pub downloads: usize,
}

/// Liveness plus scratch directory status and the number of live downloads.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthCheckResponse),
        (status = 503, description = "Scratch directory unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(2);

    let scratch = state.storage.base_path();
    let scratch_storage =
        match tokio::time::timeout(TIMEOUT, tokio::fs::metadata(scratch)).await {
            Ok(Ok(meta)) if meta.is_dir() => "healthy".to_string(),
            Ok(Ok(_)) => "unhealthy: not a directory".to_string(),
            Ok(Err(e)) => {
                tracing::error!(error = %e, path = %scratch.display(), "Scratch directory check failed");
                format!("unhealthy: {}", e)
            }
            Err(_) => "timeout".to_string(),
        };

    let healthy = scratch_storage == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            scratch_storage,
            downloads: state.registry.len(),
        }),
    )
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is running"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
