use std::time::Duration;

/// Candidate ports probed on every reachable host, in priority order.
///
/// 554 first-classifies as a camera without any banner fetch, so keeping
/// it early in the list short-circuits the expensive HTTP path.
pub const DEFAULT_PORTS: [u16; 7] = [80, 443, 554, 8000, 8080, 9000, 2020];

/// Ports where a failed or inconclusive HTTP banner still warrants a
/// JSON-RPC handshake attempt (Kodi listens on these by default).
pub const JSONRPC_FALLBACK_PORTS: [u16; 2] = [8080, 9090];

/// Tunables for one discovery pass.
///
/// Every timeout the engine waits on is lifted in here so tests can run
/// with fake probers and never depend on wall-clock delays.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Candidate port set, probed in listed order.
    pub ports: Vec<u16>,
    /// Reachability (ICMP echo) timeout per host.
    pub ping_timeout: Duration,
    /// TCP connect timeout per port.
    pub connect_timeout: Duration,
    /// HTTP banner fetch timeout.
    pub http_timeout: Duration,
    /// JSON-RPC handshake timeout.
    pub rpc_timeout: Duration,
    /// Budget for each best-effort broadcast pass (ONVIF, SSDP).
    pub broadcast_timeout: Duration,
    /// Upper bound on concurrently probed hosts.
    pub max_in_flight: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            ping_timeout: Duration::from_millis(100),
            connect_timeout: Duration::from_millis(200),
            http_timeout: Duration::from_secs(2),
            rpc_timeout: Duration::from_secs(1),
            broadcast_timeout: Duration::from_millis(500),
            max_in_flight: 64,
        }
    }
}

impl ScanConfig {
    /// Scales every probe timeout by `factor`. Useful on slow or lossy
    /// networks where the stock timeouts miss devices.
    pub fn scale_timeouts(mut self, factor: u32) -> Self {
        self.ping_timeout *= factor;
        self.connect_timeout *= factor;
        self.http_timeout *= factor;
        self.rpc_timeout *= factor;
        self
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
