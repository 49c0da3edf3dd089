//! Local network context resolved from the datalink interface table.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

use lenscan_common::probing::LocalNetworkContext;

/// Context provider backed by the OS interface table.
#[derive(Default)]
pub struct InterfaceContext;

impl InterfaceContext {
    pub fn new() -> Self {
        Self
    }

    /// First running, non-loopback interface carrying an IPv4 address.
    pub fn primary_interface() -> Option<NetworkInterface> {
        datalink::interfaces()
            .into_iter()
            .filter(|intf| intf.is_up() && !intf.is_loopback())
            .find(|intf| first_ipv4(intf).is_some())
    }
}

impl LocalNetworkContext for InterfaceContext {
    fn local_ipv4(&self) -> Option<Ipv4Addr> {
        Self::primary_interface().as_ref().and_then(first_ipv4)
    }
}

pub fn first_ipv4(intf: &NetworkInterface) -> Option<Ipv4Addr> {
    intf.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if !v4.ip().is_loopback() => Some(v4.ip()),
        _ => None,
    })
}
