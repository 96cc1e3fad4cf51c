use super::requested_format;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use meshlink_core::models::DownloadInfoResponse;
use meshlink_core::MeshFormat;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct FormatQuery {
    /// One of `obj`, `stl`, `3mf`. Defaults to `obj`.
    pub format: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/download-info/{token}",
    tag = "downloads",
    params(
        ("token" = String, Path, description = "Download token"),
        FormatQuery
    ),
    responses(
        (status = 200, description = "Download details", body = DownloadInfoResponse),
        (status = 400, description = "Unsupported format", body = ErrorResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 410, description = "Token expired", body = ErrorResponse),
        (status = 500, description = "Stored file missing", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_info"))]
pub async fn get_download_info(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let format = requested_format(query.format.as_deref())?;
    let entry = state.registry.get(&token)?;

    let obj = state.storage.read(&entry.file_path).await?;

    Ok(Json(DownloadInfoResponse {
        file_name: entry.file_name(format),
        available_formats: MeshFormat::ALL.to_vec(),
        expires_at: entry.expires_at,
        obj_content: String::from_utf8_lossy(&obj).into_owned(),
    }))
}
