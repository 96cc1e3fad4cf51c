//! Health, docs, pages and middleware integration tests.
//!
//! Run with: `cargo test -p meshlink-api --test service_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_health_reports_downloads() {
    let app = setup_test_app().await;
    app.upload_token("bracket.obj").await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["scratch_storage"], "healthy");
    assert_eq!(body["downloads"], 1);
}

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app().await;

    let response = app.client().get("/live").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_pages_are_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("/api/generate-link"));

    let response = app.client().get("/download/sometoken").await;
    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("/api/download-info/"));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"].get("/api/generate-link").is_some());
}

#[tokio::test]
async fn test_request_id_and_security_headers() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/live")
        .add_header("X-Request-ID", "test-request-1")
        .await;
    assert_eq!(response.header("x-request-id"), "test-request-1");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}
