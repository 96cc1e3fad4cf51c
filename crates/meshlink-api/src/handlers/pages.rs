//! Static HTML pages served alongside the API.

use axum::{extract::Path, response::Html};

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const DOWNLOAD_HTML: &str = include_str!("../../assets/download.html");

/// Upload form.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Format picker for a download link. The page reads the token from its own URL
/// and asks `/api/download-info/{token}` whether it is still valid.
pub async fn download_page(Path(token): Path<String>) -> Html<&'static str> {
    tracing::trace!(token = %token, "Serving download page");
    Html(DOWNLOAD_HTML)
}
