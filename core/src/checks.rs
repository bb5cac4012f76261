//! # Connectivity Checks
//!
//! Implements the two connectivity use cases exposed by the API.
//!
//! The two paths deliberately follow different trust policies:
//! * [`NetworkChecks::check_service`] probes operator configured hosts and applies no
//!   target policy to the host, only port validation (done by the caller through [`Port`]).
//! * [`NetworkChecks::network_scan`] shells out to an external tool, so every target goes
//!   through full scan-target validation first.

use std::sync::Arc;
use std::time::Duration;

use hostwatch_common::network::port::Port;
use hostwatch_common::network::target::{self, TargetError, ValidatedTarget};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::probe;
use crate::scanner::{PortScanner, ScanError, ScanOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Online,
    Offline,
    Error,
}

/// Outcome of a service connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCheck {
    pub host: String,
    pub port: Port,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ServiceStatus,
    pub message: String,
}

/// Outcome of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub target: ValidatedTarget,
    pub output: ScanOutput,
}

/// Terminal failure states of a scan request.
#[derive(Debug, Error)]
pub enum ScanRequestError {
    /// The target was denied by validation; nothing was executed.
    #[error("Invalid target: {0}")]
    Rejected(#[from] TargetError),
    /// The scan tool ran too long or could not be run.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Application service for connectivity checks.
pub struct NetworkChecks {
    scanner: Arc<dyn PortScanner>,
    probe_timeout: Duration,
}

impl NetworkChecks {
    pub fn new(scanner: Arc<dyn PortScanner>, probe_timeout: Duration) -> Self {
        Self {
            scanner,
            probe_timeout,
        }
    }

    /// Probes `host:port` once over TCP.
    ///
    /// Only TCP is implemented; `kind` is reported back as given.
    pub async fn check_service(&self, host: &str, port: Port, kind: &str) -> ServiceCheck {
        let is_online: bool = probe::probe_tcp(host, port, self.probe_timeout).await;

        let (status, message) = if is_online {
            (ServiceStatus::Online, format!("Successfully connected to {host}:{port}"))
        } else {
            (ServiceStatus::Offline, format!("Cannot connect to {host}:{port}"))
        };

        info!(host, port = port.get(), status = ?status, "service check finished");

        ServiceCheck {
            host: host.to_string(),
            port,
            kind: kind.to_string(),
            status,
            message,
        }
    }

    /// Validates `raw_target` and, if allowed, scans it.
    ///
    /// `Received → Validating → {Rejected | Validated} → Scanning → {Completed | TimedOut | Failed}`.
    /// Every terminal state is final: nothing is retried.
    pub async fn network_scan(&self, raw_target: &str) -> Result<ScanReport, ScanRequestError> {
        let validated: ValidatedTarget = match target::check(raw_target) {
            Ok(validated) => validated,
            Err(reason) => {
                warn!(scan_target = raw_target, %reason, "scan target rejected");
                return Err(reason.into());
            }
        };

        info!(scan_target = %validated, kind = ?validated.kind(), "scan started");

        match self.scanner.scan(&validated).await {
            Ok(output) => {
                info!(
                    scan_target = %validated,
                    exit_code = ?output.exit_code,
                    stdout_len = output.stdout.len(),
                    "scan completed"
                );
                Ok(ScanReport {
                    target: validated,
                    output,
                })
            }
            Err(e) => {
                match &e {
                    ScanError::Timeout { .. } => warn!(scan_target = %validated, error = %e, "scan timed out"),
                    ScanError::Failure { .. } => warn!(scan_target = %validated, error = %e, "scan failed"),
                }
                Err(e.into())
            }
        }
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
