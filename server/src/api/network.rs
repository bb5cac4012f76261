use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hostwatch_common::network::port::{PortInput, validate_port};
use hostwatch_core::checks::{ScanReport, ServiceStatus};
use serde_json::{Value, json};
use tracing::info;

use super::body::{JsonBody, text_field};
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_TYPE: &str = "tcp";
const DEFAULT_TARGET: &str = "localhost";

/// `POST /api/check-service`
pub async fn check_service(State(state): State<AppState>, body: JsonBody) -> Response {
    let host: String = text_field(&body, "host", DEFAULT_HOST);
    let kind: String = text_field(&body, "type", DEFAULT_TYPE);
    let raw_port: Value = body.get("port").cloned().unwrap_or_else(|| json!(80));

    let input: PortInput =
        serde_json::from_value(raw_port.clone()).unwrap_or_else(|_| PortInput::Other(raw_port.clone()));

    let port = match validate_port(input) {
        Ok(port) => port,
        Err(e) => {
            info!(host = %host, port = %raw_port, reason = e.reason(), "service check rejected");
            let body = json!({
                "host": host,
                "port": raw_port,
                "type": kind,
                "status": ServiceStatus::Error,
                "message": e.to_string(),
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    Json(state.checks.check_service(&host, port, &kind).await).into_response()
}

/// `POST /api/network-scan`
pub async fn network_scan(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, ApiError> {
    let raw_target: String = match body.get("target") {
        None => DEFAULT_TARGET.to_string(),
        Some(Value::Null) => String::new(),
        Some(Value::String(target)) => target.clone(),
        Some(_) => return Err(ApiError::TargetNotText),
    };

    let ScanReport { target, output } = state.checks.network_scan(&raw_target).await?;

    Ok(Json(json!({
        "target": target.as_str(),
        "output": output.stdout,
        "error": output.stderr,
    })))
}
