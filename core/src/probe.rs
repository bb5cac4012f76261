use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use hostwatch_common::network::port::Port;
use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;
use tracing::debug;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Attempts a single TCP connection to `host:port`.
///
/// Returns `true` only if the handshake completes within `probe_timeout`. Refused
/// connections, unreachable hosts, resolution failures and timeouts all yield `false`.
/// The timeout covers name resolution and the connect together, and no retry is made.
pub async fn probe_tcp(host: &str, port: Port, probe_timeout: Duration) -> bool {
    match timeout(probe_timeout, connect_once(host, port)).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            debug!(host, port = port.get(), error = %e, "tcp probe failed");
            false
        }
        Err(_elapsed) => {
            debug!(host, port = port.get(), timeout_ms = probe_timeout.as_millis() as u64, "tcp probe timed out");
            false
        }
    }
}

async fn connect_once(host: &str, port: Port) -> io::Result<TcpStream> {
    let socket_addr: SocketAddr = resolve_ipv4(host, port).await?;
    TcpStream::connect(socket_addr).await
}

/// Resolves `host` to its first IPv4 socket address.
async fn resolve_ipv4(host: &str, port: Port) -> io::Result<SocketAddr> {
    lookup_host((host, port.get()))
        .await?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no IPv4 address found for {host}"),
            )
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
