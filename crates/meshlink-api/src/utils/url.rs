//! Public URL construction for download links

use axum::http::{header, HeaderMap};
use meshlink_core::Config;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Base URL clients reach this service on, without a trailing slash.
///
/// `PUBLIC_BASE_URL` wins when configured; otherwise the request's scheme
/// (`X-Forwarded-Proto`, default `http`) and `Host` header are used.
pub fn public_base_url(config: &Config, headers: &HeaderMap) -> String {
    if let Some(base) = &config.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| *v == "http" || *v == "https")
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty() && !h.contains(['/', ' ']))
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", config.server_port));

    format!("{}://{}", scheme, host)
}

pub fn download_page_url(base: &str, token: &str) -> String {
    format!("{}/download/{}", base, token)
}
