//! Legacy one-shot repair endpoint. Kept for existing clients; new clients use
//! `/api/generate-link`.

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::pipeline::repair_upload;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use meshlink_core::{AppError, MeshFormat};
use meshlink_processing::RepairOptions;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/repair",
    tag = "repair",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Repaired OBJ file", content_type = "model/obj"),
        (status = 400, description = "No file or wrong extension", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Unreadable mesh or repair failure", body = ErrorResponse)
    )
)]
#[deprecated(note = "use /api/generate-link")]
#[tracing::instrument(skip(state, multipart), fields(operation = "repair_mesh"))]
pub async fn repair_mesh(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_multipart_file(multipart).await?;
    let repaired = repair_upload(&state, upload, RepairOptions { reorient: false }).await?;

    let file_name = format!(
        "{}.{}",
        repaired.base_name,
        MeshFormat::CANONICAL.extension()
    );
    let path = repaired.canonical.path().to_path_buf();
    let (stream, length) = state
        .storage
        .open_stream(&path, Some(repaired.canonical))
        .await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, MeshFormat::CANONICAL.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .header(header::CONTENT_LENGTH, length)
        .header("Deprecation", "true")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
