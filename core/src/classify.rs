//! # Service Classification
//!
//! Turns one open port into a [`DeviceKind`], applying the fingerprint
//! chain in priority order: the RTSP port short-circuits, then the HTTP
//! banner heuristics, then the JSON-RPC handshake fallback. Each banner
//! heuristic is a named predicate so the priority chain can be tested
//! rule by rule.
//!
//! Matching is substring-based on purpose. Device front pages rarely
//! offer anything more structured, and a false negative only costs one
//! missing row in a best-effort scan.

use std::net::Ipv4Addr;

use tracing::debug;

use lenscan_common::config::{JSONRPC_FALLBACK_PORTS, ScanConfig};
use lenscan_common::network::device::DeviceKind;
use lenscan_common::probing::HttpFetcher;
use lenscan_probes::jsonrpc;

/// RTSP streaming port; anything listening here is treated as a camera
/// without further probing.
pub const RTSP_PORT: u16 = 554;

/// Plex's fixed port identifies a media center even with an empty banner.
const PLEX_PORT: u16 = 32400;

/// Classifies one open port. Expects the port to have already accepted
/// a TCP connection; never fails, unidentifiable services come back as
/// [`DeviceKind::Unknown`].
pub async fn classify_port(
    http: &dyn HttpFetcher,
    host: Ipv4Addr,
    port: u16,
    config: &ScanConfig,
) -> DeviceKind {
    if port == RTSP_PORT {
        return DeviceKind::IpCamera;
    }

    match http.get(host, port, config.http_timeout).await {
        Ok(body) => {
            let kind = classify_banner(&body, port);
            if kind != DeviceKind::Unknown {
                return kind;
            }
        }
        // No signal for this port; the JSON-RPC fallback below may
        // still identify it.
        Err(err) => debug!(%host, port, %err, "banner fetch failed"),
    }

    if JSONRPC_FALLBACK_PORTS.contains(&port) && answers_jsonrpc_ping(http, host, port, config).await {
        return DeviceKind::MediaCenter;
    }

    DeviceKind::Unknown
}

/// Applies the banner heuristics in priority order.
pub fn classify_banner(body: &str, port: u16) -> DeviceKind {
    let body = body.to_ascii_lowercase();

    if is_kodi_banner(&body, port) || is_plex_banner(&body, port) || is_emby_banner(&body) {
        DeviceKind::MediaCenter
    } else if is_camera_banner(&body) {
        DeviceKind::IpCamera
    } else if is_nas_banner(&body) {
        DeviceKind::NasDevice
    } else if is_smart_home_banner(&body) {
        DeviceKind::SmartHomeDevice
    } else {
        DeviceKind::Unknown
    }
}

fn is_kodi_banner(body: &str, port: u16) -> bool {
    body.contains("kodi") || body.contains("xbmc") || (port == 8080 && body.contains("jsonrpc"))
}

fn is_plex_banner(body: &str, port: u16) -> bool {
    body.contains("plex") || port == PLEX_PORT
}

fn is_emby_banner(body: &str) -> bool {
    body.contains("emby") || body.contains("jellyfin")
}

fn is_camera_banner(body: &str) -> bool {
    body.contains("camera") || body.contains("ipcam")
}

fn is_nas_banner(body: &str) -> bool {
    ["nas", "storage", "synology", "qnap"]
        .iter()
        .any(|needle| body.contains(needle))
}

fn is_smart_home_banner(body: &str) -> bool {
    body.contains("smart") && body.contains("home")
}

async fn answers_jsonrpc_ping(
    http: &dyn HttpFetcher,
    host: Ipv4Addr,
    port: u16,
    config: &ScanConfig,
) -> bool {
    let request = jsonrpc::ping_request();
    match http
        .post_json(host, port, jsonrpc::JSONRPC_PATH, &request, config.rpc_timeout)
        .await
    {
        Ok(body) => jsonrpc::is_pong(&body),
        Err(_) => false,
    }
}

/// Resolves the display name for a classified endpoint.
///
/// Media centers get one `System.GetProperties` call; everything else
/// (and every name-resolution failure) falls back to the generic
/// `"<Kind> (<ip>)"` template. Never aborts the scan.
pub async fn resolve_device_name(
    http: &dyn HttpFetcher,
    host: Ipv4Addr,
    port: u16,
    kind: DeviceKind,
    config: &ScanConfig,
) -> String {
    match kind {
        DeviceKind::MediaCenter => media_center_name(http, host, port, config).await,
        other => other.generic_name(host),
    }
}

async fn media_center_name(
    http: &dyn HttpFetcher,
    host: Ipv4Addr,
    port: u16,
    config: &ScanConfig,
) -> String {
    let request = jsonrpc::system_properties_request();
    match http
        .post_json(host, port, jsonrpc::JSONRPC_PATH, &request, config.rpc_timeout)
        .await
    {
        Ok(body) if jsonrpc::reports_system_name(&body) => format!("Kodi Media Center ({host})"),
        _ => DeviceKind::MediaCenter.generic_name(host),
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
