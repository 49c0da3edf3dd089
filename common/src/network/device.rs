//! # Device Model
//!
//! The closed set of device categories the engine can assign, the
//! transient per-port probe outcome, and the durable discovery result
//! handed to callers.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Device categories recognized by the classification chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Unknown,
    IpCamera,
    NasDevice,
    SmartHomeDevice,
    OnvifCamera,
    RtspCamera,
    MediaCenter,
}

impl DeviceKind {
    /// A device is compatible with the recorder iff it was classified at all.
    pub fn is_compatible(self) -> bool {
        self != DeviceKind::Unknown
    }

    /// Generic display-name template, `"<Kind> (<ip>)"`.
    pub fn generic_name(self, ip: Ipv4Addr) -> String {
        format!("{self} ({ip})")
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeviceKind::Unknown => "Device",
            DeviceKind::IpCamera => "IP Camera",
            DeviceKind::NasDevice => "NAS Device",
            DeviceKind::SmartHomeDevice => "Smart Home Device",
            DeviceKind::OnvifCamera => "ONVIF Camera",
            DeviceKind::RtspCamera => "RTSP Camera",
            DeviceKind::MediaCenter => "Media Center",
        };
        f.write_str(label)
    }
}

/// Transient result of probing one port on one host.
///
/// Created inside a host probe task, sent once over the aggregator
/// channel, and never retained. Outcomes for closed ports or unknown
/// services are discarded by the collector.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Whether the port accepted a TCP connection within the budget.
    pub reachable: bool,
    pub classification: DeviceKind,
    /// Resolved display name for classified ports.
    pub detail: Option<String>,
}

impl ProbeOutcome {
    /// Outcome for a port that accepted a connection.
    pub fn open(host: Ipv4Addr, port: u16, classification: DeviceKind, detail: Option<String>) -> Self {
        Self { host, port, reachable: true, classification, detail }
    }

    /// Outcome for a port that refused or timed out. Kept so the
    /// aggregator discards failures explicitly instead of the probe
    /// swallowing them.
    pub fn closed(host: Ipv4Addr, port: u16) -> Self {
        Self { host, port, reachable: false, classification: DeviceKind::Unknown, detail: None }
    }
}

/// One discovered, classified device endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub ip_address: Ipv4Addr,
    pub port: u16,
    pub device_type: DeviceKind,
    pub is_compatible: bool,
    pub device_name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware_version: Option<String>,
}

impl DiscoveryResult {
    /// Sole constructor; keeps `is_compatible` in lockstep with the kind.
    pub fn new(ip_address: Ipv4Addr, port: u16, device_type: DeviceKind, device_name: String) -> Self {
        Self {
            ip_address,
            port,
            device_type,
            is_compatible: device_type.is_compatible(),
            device_name,
            manufacturer: None,
            model: None,
            firmware_version: None,
        }
    }

    /// Builds a result from a classified probe outcome, falling back to
    /// the generic name template when the probe resolved none.
    pub fn from_outcome(outcome: &ProbeOutcome) -> Self {
        let name = outcome
            .detail
            .clone()
            .unwrap_or_else(|| outcome.classification.generic_name(outcome.host));
        Self::new(outcome.host, outcome.port, outcome.classification, name)
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_firmware_version(mut self, firmware: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware.into());
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
