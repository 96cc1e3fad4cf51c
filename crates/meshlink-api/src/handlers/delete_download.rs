use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/download/{token}",
    tag = "downloads",
    params(
        ("token" = String, Path, description = "Download token")
    ),
    responses(
        (status = 204, description = "Token revoked and file deleted"),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 410, description = "Token expired", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_download"))]
pub async fn delete_download(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let entry = state.registry.consume(&token)?;
    tracing::info!(token = %entry.token, "Download revoked");
    Ok(StatusCode::NO_CONTENT)
}
