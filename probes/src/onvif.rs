//! WS-Discovery broadcast pass for ONVIF-compliant cameras.
//!
//! Extension point only: no WS-Discovery implementation ships yet, and
//! the disabled default keeps the pass wired into the engine without
//! inventing protocol behavior. A real implementation would multicast a
//! SOAP `Probe` to 239.255.255.250:3702 and classify responders as
//! [`DeviceKind::OnvifCamera`](lenscan_common::network::device::DeviceKind).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lenscan_common::network::device::DiscoveryResult;
use lenscan_common::probing::OnvifProbe;

pub struct DisabledOnvifProbe;

#[async_trait]
impl OnvifProbe for DisabledOnvifProbe {
    async fn discover(&self, _timeout: Duration) -> Vec<DiscoveryResult> {
        debug!("onvif broadcast pass disabled, contributing no results");
        Vec::new()
    }
}
