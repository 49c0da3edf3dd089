//! The central **abstractions** for network probing operations.
//!
//! The engine depends strictly on these traits rather than concrete
//! probers, so every I/O seam (reachability, TCP connect, HTTP
//! fingerprinting, broadcast discovery) can be swapped for a fake in
//! tests and for a live implementation in production wiring.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::network::device::DiscoveryResult;

/// Resolves the host's own place in the network.
pub trait LocalNetworkContext: Send + Sync {
    /// The primary local IPv4 address, or `None` when no usable IPv4
    /// interface exists. Absence is a normal condition, not an error:
    /// a scan without context completes empty.
    fn local_ipv4(&self) -> Option<Ipv4Addr>;
}

/// Cheap liveness check used to skip dead hosts before port probing.
#[async_trait]
pub trait ReachabilityProber: Send + Sync {
    async fn is_reachable(&self, host: Ipv4Addr, timeout: Duration) -> bool;
}

/// Bounded-time TCP connect attempts.
#[async_trait]
pub trait PortConnector: Send + Sync {
    /// `true` iff a connection was established within `timeout`.
    /// Refused and timed-out connects are indistinguishable on purpose;
    /// both mean "skip this port silently".
    async fn try_connect(&self, host: Ipv4Addr, port: u16, timeout: Duration) -> bool;
}

/// Plain-HTTP fetches against probed endpoints.
///
/// Always speaks `http://` regardless of port; the devices this engine
/// cares about expose their banners there.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET `http://{host}:{port}/` and return the body.
    async fn get(&self, host: Ipv4Addr, port: u16, timeout: Duration) -> Result<String, ProbeError>;

    /// POST a JSON payload to `http://{host}:{port}{path}` and return
    /// the body.
    async fn post_json(
        &self,
        host: Ipv4Addr,
        port: u16,
        path: &str,
        body: &str,
        timeout: Duration,
    ) -> Result<String, ProbeError>;
}

/// WS-Discovery broadcast pass for ONVIF-compliant cameras.
///
/// Extension point: the stock wiring installs a disabled implementation
/// that contributes nothing, so callers must not assume this pass adds
/// results.
#[async_trait]
pub trait OnvifProbe: Send + Sync {
    async fn discover(&self, timeout: Duration) -> Vec<DiscoveryResult>;
}

/// SSDP/mDNS multicast pass for smart-home devices. Same extension-point
/// contract as [`OnvifProbe`].
#[async_trait]
pub trait SsdpProbe: Send + Sync {
    async fn discover(&self, timeout: Duration) -> Vec<DiscoveryResult>;
}
