use axum::Json;
use axum::extract::State;
use hostwatch_core::scanner::{ScanError, run_script};
use hostwatch_core::services::{ServicesConfig, load_services};
use hostwatch_core::system::collect_report;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/instance-info`: host telemetry merged with cloud metadata.
pub async fn instance_info(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (report, cloud) = tokio::join!(collect_report(state.system.clone()), state.metadata.fetch());

    let mut info: Value = serde_json::to_value(report?).map_err(anyhow::Error::from)?;
    if let Value::Object(map) = &mut info {
        for (key, value) in &cloud.fields {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        map.insert("cloud_provider".to_string(), json!(cloud.cloud_provider()));
    }

    Ok(Json(info))
}

/// `GET /api/services`
pub async fn services(State(state): State<AppState>) -> Json<ServicesConfig> {
    Json(load_services(&state.config.services_path).await)
}

/// `GET /api/system-info`
pub async fn system_info(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let config = &state.config;

    match run_script(&config.system_info_script, config.script_timeout()).await {
        Ok(output) => Ok(Json(json!({
            "output": output.stdout,
            "error": output.stderr,
        }))),
        Err(ScanError::Timeout { .. }) => Err(ApiError::ScriptTimeout),
        Err(e @ ScanError::Failure { .. }) => Err(ApiError::ScriptFailed(e.to_string())),
    }
}
