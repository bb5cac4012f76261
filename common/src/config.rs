//! # Configuration
//!
//! Runtime settings for the service. Values are resolved in three layers:
//! built-in defaults, an optional TOML file, then `HOSTWATCH_*` environment variables.
//! Command line flags are applied on top by the server binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "HOSTWATCH_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Symbol prefixed, colored lines for a terminal.
    #[default]
    Pretty,
    /// One JSON object per event, for log collectors.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// JSON file describing the services shown on the dashboard.
    pub services_path: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Page served at `/`.
    pub index_path: PathBuf,
    /// Script executed by `/api/system-info`.
    pub system_info_script: PathBuf,
    pub script_timeout_secs: u64,
    /// Ceiling for a single TCP connect probe.
    pub probe_timeout_ms: u64,
    /// Base URL of the EC2 instance metadata service. Empty disables the lookup.
    pub metadata_url: String,
    pub metadata_timeout_ms: u64,
    pub scan: ScanConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

/// The fixed profile used for `/api/network-scan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Scan tool executable.
    pub program: String,
    /// Flags passed before the per-host timeout and the target.
    pub args: Vec<String>,
    /// Per-host timeout handed to the scan tool.
    pub host_timeout_secs: u64,
    /// Hard ceiling for the whole scan process. The process is killed past it.
    pub total_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 80)),
            services_path: PathBuf::from("/app/config/services.json"),
            static_dir: PathBuf::from("/app/static"),
            index_path: PathBuf::from("/app/index.html"),
            system_info_script: PathBuf::from("/app/scripts/system-info.sh"),
            script_timeout_secs: 10,
            probe_timeout_ms: 3_000,
            metadata_url: "http://169.254.169.254/latest/meta-data/".to_string(),
            metadata_timeout_ms: 2_000,
            scan: ScanConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            program: "nmap".to_string(),
            args: vec!["-sT".to_string(), "-F".to_string()],
            host_timeout_secs: 10,
            total_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `HOSTWATCH_*` variables from the process environment.
    ///
    /// `LOG_LEVEL` is honoured as well for compatibility with existing deployments.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(val) = var("BIND") {
            self.bind = parse_value("BIND", &val)?;
        }
        if let Some(val) = var("SERVICES_PATH") {
            self.services_path = PathBuf::from(val);
        }
        if let Some(val) = var("STATIC_DIR") {
            self.static_dir = PathBuf::from(val);
        }
        if let Some(val) = var("INDEX_PATH") {
            self.index_path = PathBuf::from(val);
        }
        if let Some(val) = var("SYSTEM_INFO_SCRIPT") {
            self.system_info_script = PathBuf::from(val);
        }
        if let Some(val) = var("PROBE_TIMEOUT_MS") {
            self.probe_timeout_ms = parse_value("PROBE_TIMEOUT_MS", &val)?;
        }
        if let Some(val) = var("METADATA_URL") {
            self.metadata_url = val;
        }
        if let Some(val) = var("SCAN_PROGRAM") {
            self.scan.program = val;
        }
        if let Some(val) = var("SCAN_TIMEOUT_SECS") {
            self.scan.total_timeout_secs = parse_value("SCAN_TIMEOUT_SECS", &val)?;
        }
        if let Some(val) = lookup("LOG_LEVEL").or_else(|| var("LOG_LEVEL")) {
            self.log_level = val.to_ascii_lowercase();
        }
        if let Some(val) = var("LOG_FORMAT") {
            self.log_format = parse_value("LOG_FORMAT", &val)?;
        }

        Ok(self)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}

impl ScanConfig {
    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: format!("{ENV_PREFIX}{key}"),
        message: e.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
