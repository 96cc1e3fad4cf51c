//! OpenAPI documentation.

#![allow(deprecated)]

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use meshlink_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "meshlink API",
        version = "0.1.0",
        description = "Upload an OBJ mesh, have it repaired and re-oriented, and download it as OBJ, STL or 3MF through a link that expires after a fixed time."
    ),
    paths(
        // Downloads
        handlers::generate_link::generate_link,
        handlers::download_info::get_download_info,
        handlers::download::download_file,
        handlers::delete_download::delete_download,
        // Legacy
        handlers::repair::repair_mesh,
        // Health
        handlers::health::health_check,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::GenerateLinkResponse,
            models::DownloadInfoResponse,
            models::MeshFormat,
            handlers::generate_link::GenerateLinkQuery,
            handlers::download_info::FormatQuery,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "downloads", description = "Upload, link issuing and format conversion on download"),
        (name = "repair", description = "Deprecated one-shot repair"),
        (name = "health", description = "Health checks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_endpoint() {
        let spec = get_openapi_spec();
        for path in [
            "/api/generate-link",
            "/api/download-info/{token}",
            "/api/download/{token}",
            "/api/repair",
            "/health",
            "/live",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
