use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

/// Number of interface entries reported by the instance info endpoint.
pub const REPORTED_INTERFACE_LIMIT: usize = 3;

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Lists `"<name>: <ipv4>"` entries for every IPv4 address, in interface order,
/// keeping at most `limit` of them.
pub fn describe_ipv4_addresses(interfaces: &[NetworkInterface], limit: usize) -> Vec<String> {
    interfaces
        .iter()
        .flat_map(|interface| {
            interface
                .get_ipv4_nets()
                .into_iter()
                .map(move |net| format!("{}: {}", interface.name, net.ip()))
        })
        .take(limit)
        .collect()
}

/// [`describe_ipv4_addresses`] over the interfaces of this machine.
pub fn local_ipv4_addresses(limit: usize) -> Vec<String> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces();
    describe_ipv4_addresses(&interfaces, limit)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
