use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use hostwatch_common::config::Config;
use serde_json::json;

use crate::util::{FakeScanner, ScanBehaviour, app, app_with, get, on_premise, send, send_raw, test_config};

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn missing_index_is_not_found() {
    let (status, body) = send_raw(app(), get("/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Application not found");
}

#[tokio::test]
async fn index_and_static_files_are_served_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("index.html");
    let static_dir = dir.path().join("static");
    std::fs::write(&index, "<h1>hostwatch</h1>").unwrap();
    std::fs::create_dir(&static_dir).unwrap();
    std::fs::write(static_dir.join("app.js"), "console.log('ok');").unwrap();

    let config = Config {
        index_path: index,
        static_dir,
        ..test_config()
    };
    let app = app_with(config, FakeScanner::new(ScanBehaviour::Print("")), on_premise());

    let (status, body) = send_raw(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>hostwatch</h1>");

    let (status, body) = send_raw(app.clone(), get("/static/app.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('ok');");

    let (status, _) = send_raw(app, get("/static/missing.js")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/network-scan")
        .header(header::ORIGIN, "http://dashboard.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
