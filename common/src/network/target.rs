//! # Scan Target Model
//!
//! One candidate host plus the ordered port set it will be probed on.
//! Targets are built per scan and never mutated afterwards.

use std::net::Ipv4Addr;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub host: Ipv4Addr,
    /// Shared across all targets of a scan; order is the probe order.
    pub ports: Arc<[u16]>,
}

impl ScanTarget {
    pub fn new(host: Ipv4Addr, ports: Arc<[u16]>) -> Self {
        Self { host, ports }
    }
}
