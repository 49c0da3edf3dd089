use std::time::{Duration, Instant};

use colored::*;

use lenscan_common::config::ScanConfig;
use lenscan_common::network::device::DiscoveryResult;
use lenscan_core::engine::DiscoveryEngine;

use crate::commands::ScanArgs;
use crate::terminal::{print, spinner};

pub async fn scan(args: ScanArgs) -> anyhow::Result<()> {
    let mut config = ScanConfig::default().scale_timeouts(args.timeout_scale);
    if let Some(ports) = args.ports {
        config.ports = ports;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_in_flight = concurrency;
    }

    let engine = DiscoveryEngine::with_live_probes(config)?;

    let spinner = spinner::start("Sweeping the local subnet...");
    let start = Instant::now();
    let results = engine.scan_network().await?;
    spinner.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    scan_ends(&results, start.elapsed());
    Ok(())
}

fn scan_ends(results: &[DiscoveryResult], total_time: Duration) {
    if results.is_empty() {
        print::header("ZERO DEVICES DETECTED");
        print::status("Nothing on this subnet answered a probe.");
        return;
    }

    print::header("Device Discovery");
    for (idx, found) in results.iter().enumerate() {
        print_device_tree(idx, found);
    }
    print_summary(results.len(), total_time);
}

fn print_device_tree(idx: usize, found: &DiscoveryResult) {
    print::tree_head(idx, &found.device_name);

    let compatible: ColoredString = if found.is_compatible {
        "yes".green()
    } else {
        "no".red()
    };

    let mut details: Vec<(String, ColoredString)> = vec![
        ("Address".to_string(), found.ip_address.to_string().normal()),
        ("Port".to_string(), found.port.to_string().normal()),
        ("Kind".to_string(), found.device_type.to_string().cyan()),
        ("Usable".to_string(), compatible),
    ];

    if let Some(manufacturer) = &found.manufacturer {
        details.push(("Vendor".to_string(), manufacturer.clone().normal()));
    }

    print::as_tree_one_level(details);
}

fn print_summary(device_count: usize, total_time: Duration) {
    let devices: ColoredString = format!("{device_count} devices").bold().green();
    let took: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    print::fat_separator();
    print::centerln(&format!("Discovery complete: {devices} identified in {took}"));
}
