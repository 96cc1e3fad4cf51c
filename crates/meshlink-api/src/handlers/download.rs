//! File download, converting on demand.
//!
//! The canonical OBJ is streamed straight from the registry's file. Any other
//! format is converted into a fresh scratch file whose guard rides inside the
//! response body, so the derived file is deleted when streaming ends or the
//! client goes away. The canonical file is never touched here.

use super::download_info::FormatQuery;
use super::requested_format;
use crate::error::{PlainTextError, MSG_CONVERSION_FAILED};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use meshlink_core::{AppError, MeshFormat};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/download/{token}",
    tag = "downloads",
    params(
        ("token" = String, Path, description = "Download token"),
        FormatQuery
    ),
    responses(
        (status = 200, description = "Mesh file", content_type = "application/octet-stream"),
        (status = 400, description = "Unsupported format", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown token", body = String, content_type = "text/plain"),
        (status = 410, description = "Token expired", body = String, content_type = "text/plain"),
        (status = 500, description = "Stored file missing or conversion failed", body = String, content_type = "text/plain")
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, PlainTextError> {
    // Rejected before the registry is consulted.
    let format = requested_format(query.format.as_deref())?;
    let entry = state.registry.get(&token)?;

    let (stream, length) = if format == MeshFormat::CANONICAL {
        state.storage.open_stream(&entry.file_path, None).await?
    } else {
        let source = state.storage.read(&entry.file_path).await?;

        let converter = state.converter.clone();
        let converted = tokio::task::spawn_blocking(move || {
            converter.convert(&source, MeshFormat::CANONICAL, format)
        })
        .await?
        .map_err(|e| {
            tracing::warn!(error = %e, format = %format, "Download conversion failed");
            AppError::Conversion(MSG_CONVERSION_FAILED.to_string())
        })?;

        let derived = state
            .storage
            .write(state.storage.allocate(format.extension()), &converted)
            .await?;
        let path = derived.path().to_path_buf();
        state.storage.open_stream(&path, Some(derived)).await?
    };

    let file_name = entry.file_name(format);
    tracing::info!(
        token = %token,
        format = %format,
        bytes = length,
        file_name = %file_name,
        "Streaming download"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .header(header::CONTENT_LENGTH, length)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
