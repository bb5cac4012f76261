use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

/// Container runtime the service is running under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Docker,
    Kubernetes,
    Lxc,
    Native,
    Unknown,
}

impl ContainerType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerType::Docker => "Docker",
            ContainerType::Kubernetes => "Kubernetes",
            ContainerType::Lxc => "LXC",
            ContainerType::Native => "Native",
            ContainerType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContainerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

type Detector = fn(&Path) -> Option<ContainerType>;

/// Tried in order, first hit wins.
const DETECTORS: &[Detector] = &[docker_marker, init_cgroup];

pub fn detect() -> ContainerType {
    detect_in(Path::new("/"))
}

/// Runs the detectors against a filesystem rooted at `root`.
pub fn detect_in(root: &Path) -> ContainerType {
    DETECTORS
        .iter()
        .find_map(|detector| detector(root))
        .unwrap_or(ContainerType::Unknown)
}

fn docker_marker(root: &Path) -> Option<ContainerType> {
    root.join(".dockerenv").exists().then_some(ContainerType::Docker)
}

fn init_cgroup(root: &Path) -> Option<ContainerType> {
    let content: String = std::fs::read_to_string(root.join("proc/1/cgroup")).ok()?;

    let kind = if content.contains("docker") {
        ContainerType::Docker
    } else if content.contains("kubepods") {
        ContainerType::Kubernetes
    } else if content.contains("lxc") {
        ContainerType::Lxc
    } else {
        ContainerType::Native
    };
    Some(kind)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
