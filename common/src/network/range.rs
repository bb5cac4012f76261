//! # Allowed Networks
//!
//! The private IPv4 networks that may be handed to the scan tool.
//! Anything outside this list is denied.

use std::net::Ipv4Addr;
use std::sync::OnceLock;

/// Networks accepted as scan targets, in evaluation order.
pub const ALLOWED_NETWORKS: [(Ipv4Addr, u8); 4] = [
    (Ipv4Addr::new(10, 0, 0, 0), 8),
    (Ipv4Addr::new(172, 16, 0, 0), 12),
    (Ipv4Addr::new(192, 168, 0, 0), 16),
    (Ipv4Addr::new(127, 0, 0, 0), 8),
];

static ALLOWED_RANGES: OnceLock<Vec<Ipv4Range>> = OnceLock::new();

/// An inclusive range of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let value: u32 = addr.into();
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).contains(&value)
    }
}

pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = pnet::ipnetwork::Ipv4Network::new(ip, prefix)?;
    let start = network.network();
    let end = network.broadcast();

    Ok(Ipv4Range::new(start, end))
}

/// The allow list expanded into address ranges, built once per process.
pub fn allowed_ranges() -> &'static [Ipv4Range] {
    ALLOWED_RANGES.get_or_init(|| {
        ALLOWED_NETWORKS
            .iter()
            .filter_map(|&(ip, prefix)| cidr_range(ip, prefix).ok())
            .collect()
    })
}

/// Returns `true` when `addr` falls inside one of the [`ALLOWED_NETWORKS`].
pub fn is_allowed(addr: Ipv4Addr) -> bool {
    allowed_ranges().iter().any(|range| range.contains(addr))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
