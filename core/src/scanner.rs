//! Bounded execution of external tools.
//!
//! Every program is started from a fixed argument vector, never through a shell, and
//! is killed if it outlives its time limit. Output is returned untouched.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use hostwatch_common::config::ScanConfig;
use hostwatch_common::network::target::ValidatedTarget;
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Raw result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl From<Output> for ScanOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// The process exceeded its total time limit and was killed.
    #[error("{program} did not finish within {secs}s", secs = .limit.as_secs_f64())]
    Timeout { program: String, limit: Duration },
    /// The process could not be started or awaited.
    #[error("failed to run {program}: {source}")]
    Failure {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs `program` with `args` and waits at most `limit` for it to exit.
///
/// The child is spawned with `kill_on_drop`, so when the limit is hit the pending wait is
/// dropped and the process is killed rather than left running in the background.
pub async fn run_bounded(program: &str, args: &[String], limit: Duration) -> Result<ScanOutput, ScanError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ScanError::Failure {
            program: program.to_string(),
            source,
        })?;

    debug!(program, ?args, pid = child.id(), "process started");

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ScanOutput::from(output)),
        Ok(Err(source)) => Err(ScanError::Failure {
            program: program.to_string(),
            source,
        }),
        Err(_elapsed) => {
            warn!(program, limit_secs = limit.as_secs_f64(), "process killed after time limit");
            Err(ScanError::Timeout {
                program: program.to_string(),
                limit,
            })
        }
    }
}

/// Runs a helper script without arguments under `limit`.
pub async fn run_script(path: &Path, limit: Duration) -> Result<ScanOutput, ScanError> {
    let program = path.to_string_lossy();
    run_bounded(&program, &[], limit).await
}

/// Performs a port scan of an already validated target.
#[async_trait]
pub trait PortScanner: Send + Sync {
    async fn scan(&self, target: &ValidatedTarget) -> Result<ScanOutput, ScanError>;
}

/// [`PortScanner`] backed by an external tool (nmap by default).
///
/// The argument vector is `<args> --host-timeout <n>s -- <target>`; the target is always the
/// last element, after `--`, and is never interpolated into a larger string. A bare label
/// such as `-sU` is therefore read as a host name rather than an option.
#[derive(Debug, Clone)]
pub struct CommandScanner {
    profile: ScanConfig,
}

impl CommandScanner {
    pub fn new(profile: ScanConfig) -> Self {
        Self { profile }
    }

    pub fn argv(&self, target: &ValidatedTarget) -> Vec<String> {
        let mut argv: Vec<String> = self.profile.args.clone();
        if self.profile.host_timeout_secs > 0 {
            argv.push("--host-timeout".to_string());
            argv.push(format!("{}s", self.profile.host_timeout_secs));
        }
        argv.push("--".to_string());
        argv.push(target.as_str().to_string());
        argv
    }
}

#[async_trait]
impl PortScanner for CommandScanner {
    async fn scan(&self, target: &ValidatedTarget) -> Result<ScanOutput, ScanError> {
        let argv: Vec<String> = self.argv(target);
        run_bounded(&self.profile.program, &argv, self.profile.total_timeout()).await
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
