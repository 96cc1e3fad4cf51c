//! Download link integration tests: info, streaming, conversion, expiry, revocation.
//!
//! Run with: `cargo test -p meshlink-api --test downloads_test`

mod helpers;

use helpers::{setup_test_app, wait_until_gone};
use meshlink_processing::formats::{obj, stl};
use std::io::Read;
use std::time::Duration;

#[tokio::test]
async fn test_unknown_token_is_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/download-info/doesnotexist").await;
    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or expired download link.");

    let response = app.client().get("/api/download/doesnotexist").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), "Invalid or expired download link.");
}

#[tokio::test]
async fn test_download_info_describes_entry() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;

    let response = app
        .client()
        .get(&format!("/api/download-info/{}", token))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["fileName"], "bracket_repaired.obj");
    assert_eq!(body["availableFormats"], serde_json::json!(["obj", "stl", "3mf"]));
    assert!(body["expiresAt"].is_string());
    assert!(body["objContent"].as_str().unwrap().contains("\nf "));

    let response = app
        .client()
        .get(&format!("/api/download-info/{}?format=3mf", token))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["fileName"], "bracket_repaired.3mf");
}

#[tokio::test]
async fn test_download_info_rejects_unknown_format() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;

    let response = app
        .client()
        .get(&format!("/api/download-info/{}?format=fbx", token))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid format. Use obj, stl, or 3mf.");
}

#[tokio::test]
async fn test_link_expires_after_ttl() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;
    let path = app.registry.get(&token).unwrap().file_path;
    let info = format!("/api/download-info/{}", token);

    app.clock.advance(Duration::from_millis(500));
    assert_eq!(app.client().get(&info).await.status_code(), 200);

    app.clock.advance(Duration::from_millis(1000));
    let response = app.client().get(&info).await;
    assert_eq!(response.status_code(), 410);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Download link has expired.");
    assert!(wait_until_gone(&path).await);

    // Never revived.
    assert_eq!(app.client().get(&info).await.status_code(), 404);
    assert_eq!(
        app.client()
            .get(&format!("/api/download/{}", token))
            .await
            .status_code(),
        404
    );
}

#[tokio::test]
async fn test_expired_download_is_410_plain_text() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;

    app.clock.advance(Duration::from_millis(1000));
    let response = app
        .client()
        .get(&format!("/api/download/{}?format=stl", token))
        .await;
    assert_eq!(response.status_code(), 410);
    assert_eq!(response.text(), "Download link has expired.");
    assert!(response.header("content-type").to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_unsupported_format_is_400_without_touching_registry() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;

    // Once expired, any registry lookup would remove the entry.
    app.clock.advance(Duration::from_secs(5));

    let response = app
        .client()
        .get(&format!("/api/download/{}?format=fbx", token))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "Invalid format. Use obj, stl, or 3mf.");
    assert_eq!(app.registry.len(), 1);
}

#[tokio::test]
async fn test_canonical_download_streams_stored_file() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;
    let path = app.registry.get(&token).unwrap().file_path;
    let stored = std::fs::read(&path).unwrap();

    for _ in 0..2 {
        let response = app
            .client()
            .get(&format!("/api/download/{}", token))
            .await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header("content-type"), "model/obj");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"bracket_repaired.obj\""
        );
        assert_eq!(response.as_bytes().as_ref(), stored.as_slice());
    }

    // Downloads are not destructive.
    assert!(path.exists());
    assert!(app.registry.get(&token).is_ok());
}

#[tokio::test]
async fn test_stl_then_3mf_leave_no_derived_files() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;
    let canonical = app.registry.get(&token).unwrap().file_path;

    let response = app
        .client()
        .get(&format!("/api/download/{}?format=stl", token))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "model/stl");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"bracket_repaired.stl\""
    );
    let mesh = stl::read(response.as_bytes()).unwrap();
    assert_eq!(mesh.faces.len(), 2);
    assert!(app.wait_for_no_files_with_extension("stl").await);

    let response = app
        .client()
        .get(&format!("/api/download/{}?format=3mf", token))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"bracket_repaired.3mf\""
    );
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(response.as_bytes().to_vec())).unwrap();
    let mut model = String::new();
    archive
        .by_name("3D/3dmodel.model")
        .unwrap()
        .read_to_string(&mut model)
        .unwrap();
    assert!(model.contains("<triangle "));
    assert!(app.wait_for_no_files_with_extension("3mf").await);

    // The canonical file and the token are untouched.
    assert!(canonical.exists());
    assert!(app.registry.get(&token).is_ok());
    assert!(app.wait_for_file_count(1).await);
    assert_eq!(app.scratch_files(), vec![canonical]);
}

#[tokio::test]
async fn test_missing_stored_file_is_500() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;
    std::fs::remove_file(app.registry.get(&token).unwrap().file_path).unwrap();

    for format in ["obj", "stl"] {
        let response = app
            .client()
            .get(&format!("/api/download/{}?format={}", token, format))
            .await;
        assert_eq!(response.status_code(), 500);
        assert_eq!(response.text(), "File not found on the server.");
    }

    let response = app
        .client()
        .get(&format!("/api/download-info/{}", token))
        .await;
    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "FILE_MISSING");
    assert_eq!(body["error"], "File not found on the server.");
}

#[tokio::test]
async fn test_delete_revokes_link() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;
    let path = app.registry.get(&token).unwrap().file_path;
    let url = format!("/api/download/{}", token);

    let response = app.client().delete(&url).await;
    assert_eq!(response.status_code(), 204);
    assert!(wait_until_gone(&path).await);

    assert_eq!(app.client().get(&url).await.status_code(), 404);
    assert_eq!(app.client().delete(&url).await.status_code(), 404);
}

#[tokio::test]
async fn test_downloaded_obj_parses() {
    let app = setup_test_app().await;
    let token = app.upload_token("bracket.obj").await;

    let response = app
        .client()
        .get(&format!("/api/download/{}?format=OBJ", token))
        .await;
    assert_eq!(response.status_code(), 200);
    let mesh = obj::read(response.as_bytes()).unwrap();
    assert_eq!(mesh.vertices.len(), 4);
}
