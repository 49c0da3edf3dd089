//! Fake implementations of the probe seams.
//!
//! State sits behind mutexes so a test can reshape the simulated
//! network between scans on the same engine instance, and the HTTP fake
//! counts its calls so tests can assert a path was never taken.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use lenscan_common::error::ProbeError;
use lenscan_common::probing::{HttpFetcher, LocalNetworkContext, PortConnector, ReachabilityProber};

pub struct FakeContext(pub Option<Ipv4Addr>);

impl LocalNetworkContext for FakeContext {
    fn local_ipv4(&self) -> Option<Ipv4Addr> {
        self.0
    }
}

pub struct FakePinger {
    reachable: Mutex<HashSet<Ipv4Addr>>,
    reach_all: bool,
}

impl FakePinger {
    pub fn reaching_none() -> Self {
        Self { reachable: Mutex::new(HashSet::new()), reach_all: false }
    }

    pub fn reaching_all() -> Self {
        Self { reachable: Mutex::new(HashSet::new()), reach_all: true }
    }

    pub fn reaching(hosts: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        Self {
            reachable: Mutex::new(hosts.into_iter().collect()),
            reach_all: false,
        }
    }
}

#[async_trait]
impl ReachabilityProber for FakePinger {
    async fn is_reachable(&self, host: Ipv4Addr, _timeout: Duration) -> bool {
        self.reach_all || self.reachable.lock().unwrap().contains(&host)
    }
}

/// Pinger that reports every host reachable after a short delay and
/// raises `started` on the first probe, so a test can cancel a scan
/// that is deterministically mid-flight.
pub struct GatedPinger {
    pub started: Arc<Notify>,
    delay: Duration,
}

impl GatedPinger {
    pub fn new(delay: Duration) -> Self {
        Self { started: Arc::new(Notify::new()), delay }
    }
}

#[async_trait]
impl ReachabilityProber for GatedPinger {
    async fn is_reachable(&self, _host: Ipv4Addr, _timeout: Duration) -> bool {
        self.started.notify_one();
        tokio::time::sleep(self.delay).await;
        true
    }
}

#[derive(Default)]
pub struct FakeConnector {
    open: Mutex<HashSet<(Ipv4Addr, u16)>>,
    open_everywhere: Mutex<Option<u16>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&self, host: Ipv4Addr, port: u16) {
        self.open.lock().unwrap().insert((host, port));
    }

    /// Opens `port` on every host of the simulated subnet.
    pub fn open_everywhere(&self, port: u16) {
        *self.open_everywhere.lock().unwrap() = Some(port);
    }

    pub fn close_all(&self) {
        self.open.lock().unwrap().clear();
        *self.open_everywhere.lock().unwrap() = None;
    }
}

#[async_trait]
impl PortConnector for FakeConnector {
    async fn try_connect(&self, host: Ipv4Addr, port: u16, _timeout: Duration) -> bool {
        if *self.open_everywhere.lock().unwrap() == Some(port) {
            return true;
        }
        self.open.lock().unwrap().contains(&(host, port))
    }
}

#[derive(Default)]
pub struct FakeHttp {
    get_bodies: Mutex<HashMap<(Ipv4Addr, u16), String>>,
    post_bodies: Mutex<HashMap<(Ipv4Addr, u16), String>>,
    get_calls: AtomicUsize,
    post_calls: AtomicUsize,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for GETs against this endpoint; endpoints without
    /// a banner fail the fetch.
    pub fn serve_banner(&self, host: Ipv4Addr, port: u16, body: &str) {
        self.get_bodies.lock().unwrap().insert((host, port), body.to_string());
    }

    /// Serves `body` for JSON POSTs against this endpoint.
    pub fn serve_rpc(&self, host: Ipv4Addr, port: u16, body: &str) {
        self.post_bodies.lock().unwrap().insert((host, port), body.to_string());
    }

    pub fn get_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn post_count(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpFetcher for FakeHttp {
    async fn get(&self, host: Ipv4Addr, port: u16, _timeout: Duration) -> Result<String, ProbeError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.get_bodies
            .lock()
            .unwrap()
            .get(&(host, port))
            .cloned()
            .ok_or(ProbeError::Http { status: 503 })
    }

    async fn post_json(
        &self,
        host: Ipv4Addr,
        port: u16,
        _path: &str,
        _body: &str,
        _timeout: Duration,
    ) -> Result<String, ProbeError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.post_bodies
            .lock()
            .unwrap()
            .get(&(host, port))
            .cloned()
            .ok_or(ProbeError::Timeout)
    }
}
