//! # Subnet Model
//!
//! `/24` prefix arithmetic for the discovery sweep: deriving the prefix
//! from the local address and enumerating the candidate hosts.

use std::fmt;
use std::net::Ipv4Addr;

/// The first three octets of a /24 IPv4 network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubnetPrefix([u8; 3]);

impl SubnetPrefix {
    /// Derives the prefix from any address inside the network.
    pub fn from_ipv4(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self([a, b, c])
    }

    /// Candidate hosts `.1` through `.254`, in address order.
    ///
    /// The network (`.0`) and broadcast (`.255`) addresses are excluded;
    /// the scanning host's own address is not special-cased.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let [a, b, c] = self.0;
        (1u8..=254).map(move |d| Ipv4Addr::new(a, b, c, d))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let [a, b, c, _] = addr.octets();
        [a, b, c] == self.0
    }
}

impl fmt::Display for SubnetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}.{b}.{c}")
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
