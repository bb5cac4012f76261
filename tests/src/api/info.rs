use std::collections::BTreeMap;
use std::io::Write;

use axum::http::StatusCode;
use hostwatch_common::config::Config;
use serde_json::json;
use std::sync::Arc;

use crate::util::{FakeMetadata, FakeScanner, ScanBehaviour, app_with, get, on_premise, send, test_config};

fn scanner() -> Arc<FakeScanner> {
    FakeScanner::new(ScanBehaviour::Print(""))
}

#[tokio::test]
async fn instance_info_on_premise() {
    let app = app_with(test_config(), scanner(), on_premise());

    let (status, body) = send(app, get("/api/instance-info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hostname"], "web-01");
    assert_eq!(body["cpu_cores"], 2);
    assert_eq!(body["memory_total"], "Unknown");
    assert_eq!(body["network_interfaces"], json!(["eth0: 10.0.1.5"]));
    assert_eq!(body["cloud_provider"], "Unknown/On-Premise");
    assert!(body.get("instance_id").is_none());
}

#[tokio::test]
async fn instance_info_merges_aws_fields() {
    let metadata = Arc::new(FakeMetadata(BTreeMap::from([
        ("instance_id".to_string(), "i-0abc123".to_string()),
        ("availability_zone".to_string(), "eu-west-1a".to_string()),
    ])));
    let app = app_with(test_config(), scanner(), metadata);

    let (status, body) = send(app, get("/api/instance-info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["instance_id"], "i-0abc123");
    assert_eq!(body["availability_zone"], "eu-west-1a");
    assert_eq!(body["cloud_provider"], "AWS");
    assert!(body.get("public_ip").is_none());
}

#[tokio::test]
async fn services_reads_the_catalogue() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"services": [{{"name": "redis", "host": "redis", "port": 6379, "type": "tcp"}}]}}"#
    )
    .unwrap();
    let config = Config {
        services_path: file.path().to_path_buf(),
        ..test_config()
    };

    let (status, body) = send(app_with(config, scanner(), on_premise()), get("/api/services")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"services": [{"name": "redis", "host": "redis", "port": 6379, "type": "tcp"}]})
    );
}

#[tokio::test]
async fn services_without_catalogue_is_empty() {
    let (status, body) = send(crate::util::app(), get("/api/services")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"services": []}));
}

#[tokio::test]
async fn missing_system_info_script_is_a_server_error() {
    let (status, body) = send(crate::util::app(), get("/api/system-info")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("system-info.sh"));
}

#[cfg(unix)]
mod script {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("system-info.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn system_info_returns_script_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            system_info_script: write_script(dir.path(), "echo 'load: 0.10'; echo 'warn' >&2"),
            ..test_config()
        };

        let (status, body) = send(app_with(config, scanner(), on_premise()), get("/api/system-info")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"output": "load: 0.10\n", "error": "warn\n"}));
    }

    #[tokio::test]
    async fn slow_script_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            system_info_script: write_script(dir.path(), "sleep 5"),
            script_timeout_secs: 0,
            ..test_config()
        };

        let (status, body) = send(app_with(config, scanner(), on_premise()), get("/api/system-info")).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body, json!({"error": "System info script timed out"}));
    }
}
