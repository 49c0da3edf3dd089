use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use lenscan_common::config::ScanConfig;
use lenscan_common::error::ScanError;
use lenscan_common::network::device::{DeviceKind, DiscoveryResult};
use lenscan_core::engine::DiscoveryEngine;

use crate::fakes::{FakeConnector, FakeContext, FakeHttp, FakePinger, GatedPinger};

const LOCAL_ADDR: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 100);

fn host(d: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, d)
}

struct Harness {
    engine: Arc<DiscoveryEngine>,
    connector: Arc<FakeConnector>,
    http: Arc<FakeHttp>,
}

fn harness(pinger: FakePinger, config: ScanConfig) -> Harness {
    let connector = Arc::new(FakeConnector::new());
    let http = Arc::new(FakeHttp::new());
    let engine = Arc::new(DiscoveryEngine::new(
        Arc::new(FakeContext(Some(LOCAL_ADDR))),
        Arc::new(pinger),
        connector.clone(),
        http.clone(),
        config,
    ));
    Harness { engine, connector, http }
}

#[tokio::test]
async fn unreachable_hosts_produce_no_results() -> anyhow::Result<()> {
    let h = harness(FakePinger::reaching_none(), ScanConfig::default());
    h.connector.open_everywhere(554);
    h.http.serve_banner(host(10), 80, "ipcam viewer");

    let results = h.engine.scan_network().await?;

    assert!(results.is_empty());
    assert_eq!(h.http.get_count(), 0);
    Ok(())
}

#[tokio::test]
async fn rtsp_port_classifies_without_touching_http() -> anyhow::Result<()> {
    let h = harness(FakePinger::reaching([host(20)]), ScanConfig::default());
    h.connector.set_open(host(20), 554);

    let results = h.engine.scan_network().await?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].device_type, DeviceKind::IpCamera);
    assert_eq!(results[0].ip_address, host(20));
    assert_eq!(results[0].port, 554);
    assert_eq!(results[0].device_name, "IP Camera (192.168.1.20)");
    assert_eq!(h.http.get_count(), 0);
    assert_eq!(h.http.post_count(), 0);
    Ok(())
}

#[tokio::test]
async fn kodi_banner_yields_one_named_media_center() -> anyhow::Result<()> {
    let h = harness(FakePinger::reaching([host(30)]), ScanConfig::default());
    h.connector.set_open(host(30), 8080);
    h.http.serve_banner(host(30), 8080, "<title>Kodi web interface</title>");
    h.http.serve_rpc(host(30), 8080, r#"{"result":{"systemname":"htpc","version":{"major":21}}}"#);

    let results = h.engine.scan_network().await?;

    assert_eq!(results.len(), 1);
    let found = &results[0];
    assert_eq!(found.device_type, DeviceKind::MediaCenter);
    assert_eq!(found.device_name, "Kodi Media Center (192.168.1.30)");
    assert!(found.is_compatible);
    Ok(())
}

#[tokio::test]
async fn smart_home_banner_classifies_on_both_keywords() -> anyhow::Result<()> {
    let h = harness(FakePinger::reaching([host(40)]), ScanConfig::default());
    h.connector.set_open(host(40), 8000);
    h.http.serve_banner(host(40), 8000, "SmartThings Home Hub setup");

    let results = h.engine.scan_network().await?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].device_type, DeviceKind::SmartHomeDevice);
    assert_eq!(results[0].device_name, "Smart Home Device (192.168.1.40)");
    Ok(())
}

#[tokio::test]
async fn jsonrpc_fallback_identifies_media_center_on_9090() -> anyhow::Result<()> {
    let config = ScanConfig { ports: vec![9090], ..Default::default() };
    let h = harness(FakePinger::reaching([host(50)]), config);
    h.connector.set_open(host(50), 9090);
    // No banner served: the GET fails, the ping fallback answers.
    h.http.serve_rpc(host(50), 9090, r#"{"id":1,"jsonrpc":"2.0","result":"pong"}"#);

    let results = h.engine.scan_network().await?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].device_type, DeviceKind::MediaCenter);
    // The pong body carries no systemname, so the generic name sticks.
    assert_eq!(results[0].device_name, "Media Center (192.168.1.50)");
    Ok(())
}

#[tokio::test]
async fn repeat_scans_are_idempotent_and_clear_stale_results() -> anyhow::Result<()> {
    let h = harness(FakePinger::reaching([host(60)]), ScanConfig::default());
    h.connector.set_open(host(60), 554);

    let first: HashSet<DiscoveryResult> = hash_set(h.engine.scan_network().await?);
    let second: HashSet<DiscoveryResult> = hash_set(h.engine.scan_network().await?);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);

    // The device disappears from the network; a fresh scan must not
    // resurface it from the previous pass.
    h.connector.close_all();
    let third = h.engine.scan_network().await?;
    assert!(third.is_empty());
    assert!(h.engine.scan_results().is_empty());
    Ok(())
}

#[tokio::test]
async fn full_subnet_sweep_loses_and_duplicates_nothing() -> anyhow::Result<()> {
    let h = harness(FakePinger::reaching_all(), ScanConfig::default());
    h.connector.open_everywhere(554);

    let results = h.engine.scan_network().await?;

    assert_eq!(results.len(), 254);
    let addresses: HashSet<Ipv4Addr> = results.iter().map(|r| r.ip_address).collect();
    assert_eq!(addresses.len(), 254, "every host exactly once");
    assert!(results.iter().all(|r| r.device_type == DeviceKind::IpCamera));
    assert!(results.iter().all(|r| r.is_compatible));
    Ok(())
}

#[tokio::test]
async fn cancellation_returns_promptly_and_freezes_the_result_set() {
    let pinger = GatedPinger::new(Duration::from_millis(20));
    let started = Arc::clone(&pinger.started);

    let connector = Arc::new(FakeConnector::new());
    connector.open_everywhere(554);
    let engine = Arc::new(DiscoveryEngine::new(
        Arc::new(FakeContext(Some(LOCAL_ADDR))),
        Arc::new(pinger),
        connector.clone(),
        Arc::new(FakeHttp::new()),
        ScanConfig::default(),
    ));

    let scan = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.scan_network().await })
    };

    started.notified().await;
    engine.cancel();

    let results = tokio::time::timeout(Duration::from_secs(5), scan)
        .await
        .expect("cancelled scan must return, not hang")
        .expect("scan task must not panic")
        .expect("cancellation is not an error");

    assert!(results.len() < 254, "cancellation must stop the sweep early");
    assert!(!engine.is_scanning());

    // The set must not grow after the call returned.
    let frozen = engine.scan_results();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(engine.scan_results(), frozen);
}

#[tokio::test]
async fn concurrent_scan_requests_are_rejected() {
    let pinger = GatedPinger::new(Duration::from_millis(20));
    let started = Arc::clone(&pinger.started);

    let engine = Arc::new(DiscoveryEngine::new(
        Arc::new(FakeContext(Some(LOCAL_ADDR))),
        Arc::new(pinger),
        Arc::new(FakeConnector::new()),
        Arc::new(FakeHttp::new()),
        ScanConfig::default(),
    ));

    let scan = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.scan_network().await })
    };

    started.notified().await;
    assert!(engine.is_scanning());
    assert_eq!(engine.scan_network().await, Err(ScanError::ScanInProgress));

    engine.cancel();
    let outcome = tokio::time::timeout(Duration::from_secs(5), scan)
        .await
        .expect("scan must return after cancel")
        .expect("scan task must not panic");
    assert!(outcome.is_ok());
    assert!(!engine.is_scanning());
}

#[tokio::test]
async fn missing_local_context_completes_empty() -> anyhow::Result<()> {
    let connector = Arc::new(FakeConnector::new());
    connector.open_everywhere(554);
    let engine = DiscoveryEngine::new(
        Arc::new(FakeContext(None)),
        Arc::new(FakePinger::reaching_all()),
        connector,
        Arc::new(FakeHttp::new()),
        ScanConfig::default(),
    );

    let results = engine.scan_network().await?;

    assert!(results.is_empty());
    assert!(!engine.is_scanning());
    Ok(())
}

fn hash_set(results: Vec<DiscoveryResult>) -> HashSet<DiscoveryResult> {
    results.into_iter().collect()
}
