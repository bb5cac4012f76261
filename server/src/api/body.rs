use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A JSON object request body.
///
/// A missing body, malformed JSON, or a value that is not a non-empty object are all
/// rejected with [`ApiError::MissingBody`]. The content type is not inspected.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Map<String, Value>);

impl JsonBody {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::MissingBody)?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) if !map.is_empty() => Ok(JsonBody(map)),
            _ => Err(ApiError::MissingBody),
        }
    }
}

/// Reads a text field, falling back to `default` when absent.
/// Non-string values are rendered as JSON.
pub fn text_field(body: &JsonBody, key: &str, default: &str) -> String {
    match body.get(key) {
        None => default.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
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
