//! Bounded-time TCP connect prober.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use lenscan_common::probing::PortConnector;

pub struct TcpProber;

#[async_trait]
impl PortConnector for TcpProber {
    async fn try_connect(&self, host: Ipv4Addr, port: u16, limit: Duration) -> bool {
        let addr = SocketAddr::new(IpAddr::V4(host), port);
        matches!(timeout(limit, TcpStream::connect(addr)).await, Ok(Ok(_)))
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
