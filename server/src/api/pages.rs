use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::{Value, json};
use tracing::debug;

use crate::state::AppState;

/// `GET /`: the dashboard page, read from disk on every request.
pub async fn index(State(state): State<AppState>) -> Response {
    let path = &state.config.index_path;
    match tokio::fs::read_to_string(path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "index page unavailable");
            (StatusCode::NOT_FOUND, "Application not found").into_response()
        }
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
