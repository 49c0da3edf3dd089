//! Kodi-style JSON-RPC handshake payloads and response heuristics.
//!
//! Media centers expose a JSON-RPC endpoint at `/jsonrpc`; a `Ping`
//! answered with `pong` identifies one even when the HTTP banner gave
//! nothing away. Responses are matched by substring, consistent with
//! the rest of the fingerprinting chain: the goal is classification,
//! not a faithful protocol client.

use serde_json::json;

/// Endpoint path the handshake POSTs to.
pub const JSONRPC_PATH: &str = "/jsonrpc";

/// `JSONRPC.Ping` request body.
pub fn ping_request() -> String {
    json!({
        "jsonrpc": "2.0",
        "method": "JSONRPC.Ping",
        "id": 1,
    })
    .to_string()
}

/// `System.GetProperties` request body asking for the system name and
/// version, used for display-name resolution.
pub fn system_properties_request() -> String {
    json!({
        "jsonrpc": "2.0",
        "method": "System.GetProperties",
        "params": { "properties": ["systemname", "version"] },
        "id": 1,
    })
    .to_string()
}

/// Whether a ping response identifies a live JSON-RPC media center.
pub fn is_pong(body: &str) -> bool {
    body.to_ascii_lowercase().contains("pong")
}

/// Whether a `System.GetProperties` response carries a system name.
pub fn reports_system_name(body: &str) -> bool {
    body.contains("systemname")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
