use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use hostwatch_common::config::Config;
use hostwatch_common::network::target::ValidatedTarget;
use hostwatch_core::cloud::{CloudInfo, MetadataSource};
use hostwatch_core::scanner::{PortScanner, ScanError, ScanOutput};
use hostwatch_core::system::{Reading, SystemReport, SystemRepository};
use hostwatch_server::api;
use hostwatch_server::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// What the fake scan tool does when invoked.
#[derive(Debug, Clone)]
pub enum ScanBehaviour {
    Print(&'static str),
    Hang,
    Crash,
}

pub struct FakeScanner {
    behaviour: ScanBehaviour,
    pub calls: Mutex<Vec<String>>,
}

impl FakeScanner {
    pub fn new(behaviour: ScanBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortScanner for FakeScanner {
    async fn scan(&self, target: &ValidatedTarget) -> Result<ScanOutput, ScanError> {
        self.calls.lock().unwrap().push(target.to_string());
        match self.behaviour {
            ScanBehaviour::Print(stdout) => Ok(ScanOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: Some(0),
            }),
            ScanBehaviour::Hang => Err(ScanError::Timeout {
                program: "nmap".to_string(),
                limit: Duration::from_secs(30),
            }),
            ScanBehaviour::Crash => Err(ScanError::Failure {
                program: "nmap".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

pub struct FakeSystem;

impl SystemRepository for FakeSystem {
    fn collect(&self) -> SystemReport {
        SystemReport {
            hostname: Reading::Known("web-01".to_string()),
            cpu_cores: Reading::Known(2),
            network_interfaces: vec!["eth0: 10.0.1.5".to_string()],
            ..SystemReport::unknown()
        }
    }
}

pub struct FakeMetadata(pub BTreeMap<String, String>);

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn fetch(&self) -> CloudInfo {
        CloudInfo {
            fields: self.0.clone(),
        }
    }
}

pub fn on_premise() -> Arc<FakeMetadata> {
    Arc::new(FakeMetadata(BTreeMap::new()))
}

pub fn test_config() -> Config {
    Config {
        probe_timeout_ms: 500,
        services_path: "/nonexistent/services.json".into(),
        index_path: "/nonexistent/index.html".into(),
        static_dir: "/nonexistent/static".into(),
        system_info_script: "/nonexistent/system-info.sh".into(),
        ..Config::default()
    }
}

pub fn app_with(config: Config, scanner: Arc<FakeScanner>, metadata: Arc<FakeMetadata>) -> Router {
    let state = AppState::new(
        config,
        scanner,
        Arc::new(FakeSystem),
        metadata,
        tracing::Span::none(),
    );
    api::router(state)
}

pub fn app() -> Router {
    app_with(test_config(), FakeScanner::new(ScanBehaviour::Print("")), on_premise())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends `request` and returns the status with the raw body.
pub async fn send_raw(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Sends `request` and parses the body as JSON.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(router, request).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}
