//! # Discovery Engine
//!
//! Runs one subnet-wide discovery pass on demand and exposes the
//! accumulated results.
//!
//! One tokio task per candidate host, bounded by a semaphore so a /24
//! sweep cannot exhaust sockets; every task reports its per-port
//! outcomes over a channel to a single collector, which owns all writes
//! into the keyed result map. Probe failures never leave their unit;
//! the only caller-visible failure is requesting a scan while one is
//! already running.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::Semaphore;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use lenscan_common::config::ScanConfig;
use lenscan_common::error::ScanError;
use lenscan_common::network::device::{DeviceKind, DiscoveryResult, ProbeOutcome};
use lenscan_common::network::subnet::SubnetPrefix;
use lenscan_common::network::target::ScanTarget;
use lenscan_common::probing::{
    HttpFetcher, LocalNetworkContext, OnvifProbe, PortConnector, ReachabilityProber, SsdpProbe,
};
use lenscan_probes::http::HttpProbeClient;
use lenscan_probes::onvif::DisabledOnvifProbe;
use lenscan_probes::ssdp::DisabledSsdpProbe;

use crate::classify;
use crate::context::InterfaceContext;
use crate::network::icmp::IcmpProber;
use crate::network::tcp::TcpProber;

type ResultMap = BTreeMap<(Ipv4Addr, u16), DiscoveryResult>;

pub struct DiscoveryEngine {
    context: Arc<dyn LocalNetworkContext>,
    probes: ProbeSet,
    onvif: Arc<dyn OnvifProbe>,
    ssdp: Arc<dyn SsdpProbe>,
    config: Arc<ScanConfig>,
    results: Arc<RwLock<ResultMap>>,
    scanning: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

/// Per-host probe dependencies, cloned into each spawned unit.
#[derive(Clone)]
struct ProbeSet {
    pinger: Arc<dyn ReachabilityProber>,
    connector: Arc<dyn PortConnector>,
    http: Arc<dyn HttpFetcher>,
    config: Arc<ScanConfig>,
    cancelled: Arc<AtomicBool>,
}

impl DiscoveryEngine {
    /// Wires the engine from explicit seams. The broadcast passes start
    /// disabled; install real ones with [`Self::with_onvif_probe`] and
    /// [`Self::with_ssdp_probe`].
    pub fn new(
        context: Arc<dyn LocalNetworkContext>,
        pinger: Arc<dyn ReachabilityProber>,
        connector: Arc<dyn PortConnector>,
        http: Arc<dyn HttpFetcher>,
        config: ScanConfig,
    ) -> Self {
        let config = Arc::new(config);
        let cancelled = Arc::new(AtomicBool::new(false));

        Self {
            context,
            probes: ProbeSet {
                pinger,
                connector,
                http,
                config: Arc::clone(&config),
                cancelled: Arc::clone(&cancelled),
            },
            onvif: Arc::new(DisabledOnvifProbe),
            ssdp: Arc::new(DisabledSsdpProbe),
            config,
            results: Arc::new(RwLock::new(BTreeMap::new())),
            scanning: Arc::new(AtomicBool::new(false)),
            cancelled,
        }
    }

    /// Production wiring: interface-table context, ICMP pinger, TCP
    /// connector and the reqwest banner fetcher.
    pub fn with_live_probes(config: ScanConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(InterfaceContext::new()),
            Arc::new(IcmpProber::new()?),
            Arc::new(TcpProber),
            Arc::new(HttpProbeClient::new()?),
            config,
        ))
    }

    pub fn with_onvif_probe(mut self, probe: Arc<dyn OnvifProbe>) -> Self {
        self.onvif = probe;
        self
    }

    pub fn with_ssdp_probe(mut self, probe: Arc<dyn SsdpProbe>) -> Self {
        self.ssdp = probe;
        self
    }

    /// Runs one full discovery pass against the local /24.
    ///
    /// The engine is `Idle` between scans and `Scanning` while one
    /// runs; a call during `Scanning` is rejected with
    /// [`ScanError::ScanInProgress`] rather than serialized. The result
    /// collection is cleared on entry, so stale entries never survive
    /// into a new pass.
    ///
    /// A missing local IPv4 context completes the scan successfully
    /// with an empty result set. Individual probe failures (ping
    /// timeouts, refused connects, HTTP errors, malformed payloads) are
    /// consumed inside their host unit and never surface here.
    pub async fn scan_network(&self) -> Result<Vec<DiscoveryResult>, ScanError> {
        if self.scanning.swap(true, Ordering::SeqCst) {
            return Err(ScanError::ScanInProgress);
        }
        let _state = ScanStateGuard(Arc::clone(&self.scanning));

        self.cancelled.store(false, Ordering::SeqCst);
        self.results.write().expect("result lock poisoned").clear();

        let Some(local) = self.context.local_ipv4() else {
            warn!("no usable IPv4 interface, completing scan empty");
            return Ok(Vec::new());
        };

        let prefix = SubnetPrefix::from_ipv4(local);
        info!(%prefix, %local, "starting subnet discovery");

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<ProbeOutcome>();

        // Single writer into the keyed map: dedup on (ip, port) and the
        // explicit discard of failed or unidentified probes both live here.
        let collector = {
            let results = Arc::clone(&self.results);
            tokio::spawn(async move {
                while let Some(outcome) = outcome_rx.recv().await {
                    if !outcome.reachable || outcome.classification == DeviceKind::Unknown {
                        continue;
                    }
                    let found = DiscoveryResult::from_outcome(&outcome);
                    results
                        .write()
                        .expect("result lock poisoned")
                        .insert((found.ip_address, found.port), found);
                }
            })
        };

        let ports: Arc<[u16]> = self.config.ports.clone().into();
        let limiter = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut units = Vec::with_capacity(254);

        for host in prefix.hosts() {
            if self.cancelled.load(Ordering::SeqCst) {
                debug!("cancelled, no further hosts issued");
                break;
            }
            let Ok(permit) = Arc::clone(&limiter).acquire_owned().await else {
                break;
            };

            let probes = self.probes.clone();
            let target = ScanTarget::new(host, Arc::clone(&ports));
            let tx = outcome_tx.clone();
            units.push(tokio::spawn(async move {
                let _permit = permit;
                probe_host(probes, target, tx).await;
            }));
        }

        for unit in units {
            if let Err(err) = unit.await {
                warn!(%err, "host probe unit failed");
            }
        }

        drop(outcome_tx);
        let _ = collector.await;

        if !self.cancelled.load(Ordering::SeqCst) {
            self.run_broadcast_passes().await;
        }

        let results = self.scan_results();
        info!(found = results.len(), "subnet discovery finished");
        Ok(results)
    }

    /// Best-effort ONVIF and SSDP passes. Whatever they return merges
    /// into the same collection, but never displaces an endpoint the
    /// unicast sweep already claimed.
    async fn run_broadcast_passes(&self) {
        let budget = self.config.broadcast_timeout;
        let onvif_found = self.onvif.discover(budget).await;
        let ssdp_found = self.ssdp.discover(budget).await;

        let mut results = self.results.write().expect("result lock poisoned");
        for found in onvif_found.into_iter().chain(ssdp_found) {
            results.entry((found.ip_address, found.port)).or_insert(found);
        }
    }

    /// Snapshot of the accumulated results, ordered by (address, port).
    /// Safe to call while a scan is running.
    pub fn scan_results(&self) -> Vec<DiscoveryResult> {
        self.results
            .read()
            .expect("result lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Cooperatively stops the running scan: no new host or port probes
    /// are issued, in-flight ones finish or time out naturally.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }
}

/// Restores `Idle` on every exit path, early returns and panics included.
struct ScanStateGuard(Arc<AtomicBool>);

impl Drop for ScanStateGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Probes one candidate host: a reachability check, then every
/// candidate port in listed order. All failures stay local to this
/// unit; dead hosts and closed ports produce no caller-visible signal.
async fn probe_host(probes: ProbeSet, target: ScanTarget, tx: UnboundedSender<ProbeOutcome>) {
    let ProbeSet { pinger, connector, http, config, cancelled } = probes;
    let host = target.host;

    if cancelled.load(Ordering::SeqCst) {
        return;
    }
    if !pinger.is_reachable(host, config.ping_timeout).await {
        return;
    }

    for &port in target.ports.iter() {
        if cancelled.load(Ordering::SeqCst) {
            return;
        }

        if !connector.try_connect(host, port, config.connect_timeout).await {
            let _ = tx.send(ProbeOutcome::closed(host, port));
            continue;
        }

        let kind = classify::classify_port(http.as_ref(), host, port, &config).await;
        let detail = if kind.is_compatible() {
            debug!(%host, port, ?kind, "classified device endpoint");
            Some(classify::resolve_device_name(http.as_ref(), host, port, kind, &config).await)
        } else {
            None
        };

        let _ = tx.send(ProbeOutcome::open(host, port, kind, detail));
    }
}
