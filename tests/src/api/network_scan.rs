use axum::http::StatusCode;
use hostwatch_common::config::{Config, ScanConfig};
use hostwatch_core::scanner::CommandScanner;
use hostwatch_server::api;
use hostwatch_server::state::AppState;
use serde_json::json;
use std::sync::Arc;

use crate::util::{FakeScanner, FakeSystem, ScanBehaviour, app_with, on_premise, post_json, send, test_config};

const SCAN: &str = "/api/network-scan";

#[tokio::test]
async fn allowed_target_returns_raw_tool_output() {
    let scanner = FakeScanner::new(ScanBehaviour::Print("22/tcp open ssh\n"));
    let app = app_with(test_config(), scanner.clone(), on_premise());

    let (status, body) = send(app, post_json(SCAN, r#"{"target": "192.168.1.10"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"target": "192.168.1.10", "output": "22/tcp open ssh\n", "error": ""})
    );
    assert_eq!(scanner.calls(), vec!["192.168.1.10"]);
}

#[tokio::test]
async fn missing_target_defaults_to_localhost() {
    let scanner = FakeScanner::new(ScanBehaviour::Print(""));
    let app = app_with(test_config(), scanner.clone(), on_premise());

    let (status, body) = send(app, post_json(SCAN, r#"{"profile": "fast"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "localhost");
    assert_eq!(scanner.calls(), vec!["localhost"]);
}

#[tokio::test]
async fn rejected_targets_are_bad_requests_and_never_scanned() {
    let cases = [
        (r#"{"target": "8.8.8.8"}"#, "Invalid target: Scanning of external IP addresses is not allowed"),
        (r#"{"target": "example.com"}"#, "Invalid target: Invalid hostname format or external hostname not allowed"),
        (r#"{"target": "host; rm -rf /"}"#, "Invalid target: Invalid characters in target"),
        (r#"{"target": "$(reboot)"}"#, "Invalid target: Invalid characters in target"),
        (r#"{"target": "   "}"#, "Invalid target: Target cannot be empty"),
        (r#"{"target": null}"#, "Invalid target: Target cannot be empty"),
        (r#"{"target": 10}"#, "Invalid target: Target must be a string"),
    ];

    for (request, expected) in cases {
        let scanner = FakeScanner::new(ScanBehaviour::Print("should not run"));
        let app = app_with(test_config(), scanner.clone(), on_premise());

        let (status, body) = send(app, post_json(SCAN, request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
        assert_eq!(body, json!({"error": expected}), "{request}");
        assert!(scanner.calls().is_empty(), "{request}");
    }
}

#[tokio::test]
async fn overlong_target_is_rejected() {
    let app = app_with(test_config(), FakeScanner::new(ScanBehaviour::Print("")), on_premise());
    let request = json!({ "target": "a".repeat(256) }).to_string();

    let (status, body) = send(app, post_json(SCAN, &request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid target: Target name too long");
}

#[tokio::test]
async fn timeout_is_a_gateway_timeout() {
    let app = app_with(test_config(), FakeScanner::new(ScanBehaviour::Hang), on_premise());

    let (status, body) = send(app, post_json(SCAN, r#"{"target": "10.0.0.5"}"#)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"error": "Network scan timed out"}));
}

#[tokio::test]
async fn tool_failure_is_a_server_error_without_details() {
    let app = app_with(test_config(), FakeScanner::new(ScanBehaviour::Crash), on_premise());

    let (status, body) = send(app, post_json(SCAN, r#"{"target": "db.internal"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Network scan failed"}));
}

#[tokio::test]
async fn missing_or_malformed_body_is_rejected() {
    for raw in ["", "{", "{}", "[\"localhost\"]"] {
        let (status, body) = send(crate::util::app(), post_json(SCAN, raw)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw:?}");
        assert_eq!(body, json!({"error": "No JSON data provided"}), "{raw:?}");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn real_runner_passes_target_as_last_argument() {
    let config = Config {
        scan: ScanConfig {
            program: "echo".to_string(),
            args: vec!["-n".to_string()],
            host_timeout_secs: 10,
            total_timeout_secs: 5,
        },
        ..test_config()
    };
    let scanner = Arc::new(CommandScanner::new(config.scan.clone()));
    let state = AppState::new(config, scanner, Arc::new(FakeSystem), on_premise(), tracing::Span::none());

    let (status, body) = send(api::router(state), post_json(SCAN, r#"{"target": " web-01.local "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "web-01.local");
    assert_eq!(body["output"], "--host-timeout 10s -- web-01.local");
}
