use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use portfolio_cms::{
    AppConfig, AppState, InMemoryRepository, MockStorageService,
    auth::create_token,
    create_router,
    storage::StorageState,
    upload::MAX_UPLOAD_BYTES,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

const BOUNDARY: &str = "----portfolio-test-boundary";

fn app_with_storage(storage: StorageState) -> (Router, AppConfig) {
    let config = AppConfig::default();
    let state = AppState {
        repo: Arc::new(InMemoryRepository::new()),
        storage,
        config: config.clone(),
    };
    (create_router(state), config)
}

/// Builds a `multipart/form-data` body with one part.
fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(
    router: &Router,
    config: &AppConfig,
    body: Vec<u8>,
    authed: bool,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if authed {
        let token = create_token(&config.jwt_secret).unwrap();
        builder = builder.header(header::COOKIE, format!("admin-token={token}"));
    }

    let response = router
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_upload_accepts_png_and_returns_public_url() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new()));
    let body = multipart_body("file", "shot.PNG", "image/png", &vec![7u8; 1024 * 1024]);

    let (status, json) = upload(&router, &config, body, true).await;

    assert_eq!(status, StatusCode::OK);
    let filename = json["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert_eq!(
        json["url"].as_str().unwrap(),
        format!("{}/{}", config.upload_url_prefix, filename)
    );
}

#[tokio::test]
async fn test_upload_rejects_oversized_image() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new()));
    let body = multipart_body("file", "big.jpg", "image/jpeg", &vec![0u8; 6 * 1024 * 1024]);

    let (status, json) = upload(&router, &config, body, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "File too large. Max size: 5MB");
}

#[tokio::test]
async fn test_upload_accepts_exactly_the_limit() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new()));
    let body = multipart_body("file", "edge.webp", "image/webp", &vec![1u8; MAX_UPLOAD_BYTES]);

    let (status, _) = upload(&router, &config, body, true).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_type() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new()));
    let body = multipart_body("file", "notes.txt", "text/plain", b"hello");

    let (status, json) = upload(&router, &config, body, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid file type. Allowed: JPG, PNG, WebP, GIF");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new()));
    let body = multipart_body("avatar", "a.png", "image/png", b"\x89PNG");

    let (status, json) = upload(&router, &config, body, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_requires_session() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new()));
    let body = multipart_body("file", "shot.png", "image/png", b"\x89PNG");

    let (status, json) = upload(&router, &config, body, false).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn test_upload_storage_failure_is_generic() {
    let (router, config) = app_with_storage(Arc::new(MockStorageService::new_failing()));
    let body = multipart_body("file", "shot.gif", "image/gif", b"GIF89a");

    let (status, json) = upload(&router, &config, body, true).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to upload file");
}
