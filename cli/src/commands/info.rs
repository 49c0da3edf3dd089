use colored::*;

use lenscan_common::network::subnet::SubnetPrefix;
use lenscan_core::context::{InterfaceContext, first_ipv4};

use crate::terminal::print;

pub fn info() -> anyhow::Result<()> {
    print::header("Local Network Context");

    let Some(intf) = InterfaceContext::primary_interface() else {
        print::status("No usable IPv4 interface found; a scan would complete empty.");
        return Ok(());
    };

    // primary_interface only returns interfaces with an IPv4 address
    let Some(addr) = first_ipv4(&intf) else {
        print::status("Interface lost its IPv4 address; a scan would complete empty.");
        return Ok(());
    };

    let prefix = SubnetPrefix::from_ipv4(addr);
    print::as_tree_one_level(vec![
        ("Iface".to_string(), intf.name.normal()),
        ("Address".to_string(), addr.to_string().cyan()),
        ("Subnet".to_string(), format!("{prefix}.0/24").normal()),
        ("Sweep".to_string(), format!("{prefix}.1 - {prefix}.254").normal()),
    ]);

    Ok(())
}
