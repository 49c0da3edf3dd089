//! ICMP echo reachability prober.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, PingIdentifier, PingSequence};

use lenscan_common::probing::ReachabilityProber;

const ECHO_PAYLOAD: [u8; 56] = [0u8; 56];

pub struct IcmpProber {
    client: Client,
}

impl IcmpProber {
    /// Opens the ICMP socket. Requires CAP_NET_RAW or a kernel allowing
    /// unprivileged ICMP (`net.ipv4.ping_group_range`).
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::new(&Config::default())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReachabilityProber for IcmpProber {
    async fn is_reachable(&self, host: Ipv4Addr, timeout: Duration) -> bool {
        let ident = PingIdentifier(rand::random());
        let mut pinger = self.client.pinger(IpAddr::V4(host), ident).await;
        pinger.timeout(timeout);
        pinger.ping(PingSequence(0), &ECHO_PAYLOAD).await.is_ok()
    }
}
