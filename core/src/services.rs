//! Services catalogue shown on the dashboard.
//!
//! The catalogue is operator supplied and read on every request, so edits to the file
//! show up without a restart. Hosts listed here are not subject to scan-target policy.

use std::io::ErrorKind;
use std::path::Path;

use hostwatch_common::network::port::PortInput;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub services: Vec<ServiceEntry>,
    /// Any other top level keys, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortInput>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads the catalogue at `path`.
///
/// Never fails: a missing, unreadable or malformed file yields an empty catalogue.
pub async fn load_services(path: &Path) -> ServicesConfig {
    let bytes: Vec<u8> = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "services file not found");
            return ServicesConfig::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read services file");
            return ServicesConfig::default();
        }
    };

    parse_services(&bytes).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring malformed services file");
        ServicesConfig::default()
    })
}

fn parse_services(bytes: &[u8]) -> Result<ServicesConfig, String> {
    let text: &str = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;

    match value {
        Value::Object(ref map) if map.contains_key("services") => {
            serde_json::from_value(value).map_err(|e| e.to_string())
        }
        Value::Object(_) => Err("missing 'services' key".to_string()),
        _ => Err("top level value is not an object".to_string()),
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
