//! # Host Telemetry
//!
//! Collects the machine description served by `/api/instance-info`.
//!
//! Every field is read on its own. A field that cannot be read becomes
//! [`Reading::Unknown`] and is reported as the string `"Unknown"`; it never hides the
//! fields that could be read.

pub mod container;

use std::net::{IpAddr, ToSocketAddrs};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use hostwatch_common::network::interface::{REPORTED_INTERFACE_LIMIT, local_ipv4_addresses};
use serde::{Serialize, Serializer};
use sysinfo::{CpuExt, CpuRefreshKind, DiskExt, RefreshKind, System, SystemExt};

pub use container::ContainerType;

pub const CPU_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);
const UNKNOWN: &str = "Unknown";
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A single telemetry value that may not be available on this host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reading<T> {
    Known(T),
    #[default]
    Unknown,
}

impl<T> Reading<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Reading::Known(_))
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reading::Unknown, Reading::Known)
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Known(value) => value.serialize(serializer),
            Reading::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemReport {
    pub hostname: Reading<String>,
    pub platform: Reading<String>,
    pub platform_release: Reading<String>,
    pub platform_version: Reading<String>,
    pub architecture: Reading<String>,
    pub processor: Reading<String>,
    pub private_ip: Reading<IpAddr>,
    pub uptime: Reading<String>,
    pub boot_time: Reading<String>,
    pub cpu_cores: Reading<usize>,
    pub cpu_threads: Reading<usize>,
    pub cpu_usage: Reading<String>,
    pub cpu_frequency: Reading<String>,
    pub memory_total: Reading<String>,
    pub memory_used: Reading<String>,
    pub memory_available: Reading<String>,
    pub memory_usage: Reading<String>,
    pub disk_total: Reading<String>,
    pub disk_used: Reading<String>,
    pub disk_free: Reading<String>,
    pub disk_usage: Reading<String>,
    pub network_interfaces: Vec<String>,
    pub container_type: ContainerType,
}

impl SystemReport {
    /// A report where nothing could be read.
    pub fn unknown() -> Self {
        Self {
            hostname: Reading::Unknown,
            platform: Reading::Unknown,
            platform_release: Reading::Unknown,
            platform_version: Reading::Unknown,
            architecture: Reading::Unknown,
            processor: Reading::Unknown,
            private_ip: Reading::Unknown,
            uptime: Reading::Unknown,
            boot_time: Reading::Unknown,
            cpu_cores: Reading::Unknown,
            cpu_threads: Reading::Unknown,
            cpu_usage: Reading::Unknown,
            cpu_frequency: Reading::Unknown,
            memory_total: Reading::Unknown,
            memory_used: Reading::Unknown,
            memory_available: Reading::Unknown,
            memory_usage: Reading::Unknown,
            disk_total: Reading::Unknown,
            disk_used: Reading::Unknown,
            disk_free: Reading::Unknown,
            disk_usage: Reading::Unknown,
            network_interfaces: Vec::new(),
            container_type: ContainerType::Unknown,
        }
    }
}

/// Source of host telemetry. Implementations may block.
pub trait SystemRepository: Send + Sync {
    fn collect(&self) -> SystemReport;
}

/// [`SystemRepository`] backed by `sysinfo` and the local interface table.
pub struct SystemRepo {
    cpu_sample: Duration,
}

impl Default for SystemRepo {
    fn default() -> Self {
        Self {
            cpu_sample: CPU_SAMPLE_INTERVAL,
        }
    }
}

impl SystemRepo {
    pub fn with_cpu_sample(cpu_sample: Duration) -> Self {
        Self { cpu_sample }
    }
}

impl SystemRepository for SystemRepo {
    fn collect(&self) -> SystemReport {
        let mut sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory()
                .with_disks_list(),
        );

        // cpu usage is a delta between two refreshes
        std::thread::sleep(self.cpu_sample);
        sys.refresh_cpu();

        let hostname: Option<String> = sys.host_name();
        let boot_secs: u64 = sys.boot_time();

        let (cpu_usage, cpu_frequency, processor): (Reading<String>, Reading<String>, Reading<String>) = match sys.cpus().first() {
            Some(cpu) => (
                Reading::Known(format_percent(f64::from(sys.global_cpu_info().cpu_usage()))),
                non_zero(cpu.frequency()).map(|mhz| format!("{mhz} MHz")).into(),
                non_empty(cpu.brand().trim().to_string()).into(),
            ),
            None => (Reading::Unknown, Reading::Unknown, Reading::Unknown),
        };

        let mut report = SystemReport {
            private_ip: hostname.as_deref().and_then(resolve_private_ip).into(),
            hostname: hostname.into(),
            platform: Reading::Known(platform_name(std::env::consts::OS)),
            platform_release: sys.kernel_version().into(),
            platform_version: sys.long_os_version().or_else(|| sys.os_version()).into(),
            architecture: non_empty(std::env::consts::ARCH.to_string()).into(),
            processor,
            uptime: non_zero(sys.uptime()).map(format_uptime).into(),
            boot_time: non_zero(boot_secs).and_then(format_boot_time).into(),
            cpu_cores: sys.physical_core_count().into(),
            cpu_threads: non_zero(sys.cpus().len()).into(),
            cpu_usage,
            cpu_frequency,
            network_interfaces: local_ipv4_addresses(REPORTED_INTERFACE_LIMIT),
            container_type: container::detect(),
            ..SystemReport::unknown()
        };

        let total_memory: u64 = sys.total_memory();
        if total_memory > 0 {
            let available: u64 = sys.available_memory();
            report.memory_total = Reading::Known(format_gigabytes(total_memory));
            report.memory_used = Reading::Known(format_gigabytes(sys.used_memory()));
            report.memory_available = Reading::Known(format_gigabytes(available));
            report.memory_usage = Reading::Known(format_percent(usage_percent(
                total_memory.saturating_sub(available),
                total_memory,
            )));
        }

        let root_disk = sys
            .disks()
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"));
        if let Some(disk) = root_disk.filter(|disk| disk.total_space() > 0) {
            let total: u64 = disk.total_space();
            let free: u64 = disk.available_space();
            let used: u64 = total.saturating_sub(free);
            report.disk_total = Reading::Known(format_gigabytes(total));
            report.disk_used = Reading::Known(format_gigabytes(used));
            report.disk_free = Reading::Known(format_gigabytes(free));
            report.disk_usage = Reading::Known(format_percent(usage_percent(used, total)));
        }

        report
    }
}

/// Runs a blocking collection off the async worker threads.
pub async fn collect_report(repo: Arc<dyn SystemRepository>) -> anyhow::Result<SystemReport> {
    let report = tokio::task::spawn_blocking(move || repo.collect()).await?;
    Ok(report)
}

/// Maps a Rust target OS name to the usual kernel family name.
pub fn platform_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}

pub fn format_gigabytes(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / GIB)
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_uptime(secs: u64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

pub fn format_boot_time(epoch_secs: u64) -> Option<String> {
    let secs = i64::try_from(epoch_secs).ok()?;
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn usage_percent(used: u64, total: u64) -> f64 {
    used as f64 / total as f64 * 100.0
}

fn resolve_private_ip(hostname: &str) -> Option<IpAddr> {
    (hostname, 0)
        .to_socket_addrs()
        .ok()?
        .map(|addr| addr.ip())
        .find(IpAddr::is_ipv4)
}

fn non_zero<T: Default + PartialEq>(value: T) -> Option<T> {
    (value != T::default()).then_some(value)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
