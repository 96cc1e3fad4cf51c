use crate::error::{ErrorResponse, HttpAppError};
use crate::services::pipeline::repair_upload;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use crate::utils::url::{download_page_url, public_base_url};
use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use meshlink_core::models::GenerateLinkResponse;
use meshlink_processing::RepairOptions;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct GenerateLinkQuery {
    /// Rotate the model from Y-up to Z-up. Defaults to the server's `AUTO_REORIENT`.
    #[serde(default)]
    pub reorient: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/generate-link",
    tag = "downloads",
    params(GenerateLinkQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Mesh repaired and download link issued", body = GenerateLinkResponse),
        (status = 400, description = "No file or wrong extension", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Unreadable mesh, storage or conversion failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "generate_link"))]
pub async fn generate_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<GenerateLinkQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_multipart_file(multipart).await?;
    let options = RepairOptions {
        reorient: query.reorient.unwrap_or(state.config.auto_reorient),
    };

    let repaired = repair_upload(&state, upload, options).await?;

    let ttl = state.config.download_ttl;
    let final_faces = repaired.summary.final_faces;
    let token = state
        .registry
        .create(repaired.canonical.keep(), repaired.base_name, ttl);

    let download_url = download_page_url(&public_base_url(&state.config, &headers), &token);
    tracing::info!(
        token = %token,
        ttl_secs = ttl.as_secs(),
        final_faces,
        "Download link generated"
    );

    Ok((
        StatusCode::OK,
        Json(GenerateLinkResponse {
            success: true,
            download_url,
            expires_in: format!("{} seconds", ttl.as_secs()),
        }),
    ))
}
