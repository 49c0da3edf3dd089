//! SSDP/mDNS multicast pass for smart-home devices.
//!
//! Extension point with a disabled default, mirroring
//! [`onvif`](crate::onvif): a real implementation would send an SSDP
//! `M-SEARCH` (and optionally browse mDNS service records) and map
//! responders to smart-home device results.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lenscan_common::network::device::DiscoveryResult;
use lenscan_common::probing::SsdpProbe;

pub struct DisabledSsdpProbe;

#[async_trait]
impl SsdpProbe for DisabledSsdpProbe {
    async fn discover(&self, _timeout: Duration) -> Vec<DiscoveryResult> {
        debug!("ssdp broadcast pass disabled, contributing no results");
        Vec::new()
    }
}
