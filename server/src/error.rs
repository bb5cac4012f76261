use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hostwatch_common::network::target::TargetError;
use hostwatch_core::checks::ScanRequestError;
use hostwatch_core::scanner::ScanError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures surfaced to API clients as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No JSON data provided")]
    MissingBody,
    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] TargetError),
    #[error("Invalid target: Target must be a string")]
    TargetNotText,
    #[error("Network scan timed out")]
    ScanTimeout,
    #[error("Network scan failed")]
    ScanFailed,
    #[error("System info script timed out")]
    ScriptTimeout,
    #[error("{0}")]
    ScriptFailed(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingBody | ApiError::InvalidTarget(_) | ApiError::TargetNotText => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ScanTimeout | ApiError::ScriptTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::ScanFailed | ApiError::ScriptFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ScanRequestError> for ApiError {
    fn from(e: ScanRequestError) -> Self {
        match e {
            ScanRequestError::Rejected(reason) => ApiError::InvalidTarget(reason),
            ScanRequestError::Scan(ScanError::Timeout { .. }) => ApiError::ScanTimeout,
            // the cause is already logged by the scan service
            ScanRequestError::Scan(ScanError::Failure { .. }) => ApiError::ScanFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
