use axum::http::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;

use crate::util::{app, post_json, send};

const CHECK: &str = "/api/check-service";

#[tokio::test]
async fn listening_port_is_online() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let request = json!({"host": "127.0.0.1", "port": port, "type": "tcp"}).to_string();

    let (status, body) = send(app(), post_json(CHECK, &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "host": "127.0.0.1",
            "port": port,
            "type": "tcp",
            "status": "online",
            "message": format!("Successfully connected to 127.0.0.1:{port}"),
        })
    );
}

#[tokio::test]
async fn closed_port_given_as_string_is_offline() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let request = json!({"host": "127.0.0.1", "port": port.to_string()}).to_string();

    let (status, body) = send(app(), post_json(CHECK, &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "offline");
    assert_eq!(body["port"], port);
    assert_eq!(body["type"], "tcp");
    assert_eq!(body["message"], format!("Cannot connect to 127.0.0.1:{port}"));
}

#[tokio::test]
async fn invalid_ports_echo_the_raw_value() {
    let cases = [json!(0), json!(65536), json!("abc"), json!(-1), json!(true)];

    for port in cases {
        let request = json!({"host": "redis", "port": port, "type": "tcp"}).to_string();

        let (status, body) = send(app(), post_json(CHECK, &request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{port}");
        assert_eq!(body["status"], "error", "{port}");
        assert_eq!(body["port"], port, "{port}");
        assert_eq!(body["host"], "redis");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Invalid port number: "), "{message}");
    }
}

#[tokio::test]
async fn out_of_range_message_names_the_range() {
    let (_, body) = send(app(), post_json(CHECK, r#"{"host": "redis", "port": 70000}"#)).await;
    assert_eq!(
        body["message"],
        "Invalid port number: Port must be between 1 and 65535"
    );
}

#[tokio::test]
async fn defaults_apply_to_missing_fields() {
    // port 80 on an unresolvable name: valid request, offline result
    let (status, body) = send(app(), post_json(CHECK, r#"{"host": "nothing-here.invalid"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["port"], 80);
    assert_eq!(body["type"], "tcp");
    assert_eq!(body["status"], "offline");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let (status, body) = send(app(), post_json(CHECK, "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No JSON data provided"}));
}
