//! Config command - show effective settings.

use std::path::Path;

use anyhow::Result;
use portsweep_core::PortSweeper;

use super::open_store;

pub fn show(config: Option<&Path>, json: bool) -> Result<bool> {
    let store = open_store(config)?;
    let sweeper = PortSweeper::from_config(&store)?;
    let settings = sweeper.settings();

    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(true);
    }

    let source = if store.path().exists() {
        store.path().display().to_string()
    } else {
        format!("{} (not found, using defaults)", store.path().display())
    };

    println!("Configuration");
    println!("  File:               {}", source);

    let ranges: Vec<String> = settings
        .dev_port_ranges
        .iter()
        .map(|r| r.to_string())
        .collect();
    println!("  Dev port ranges:    {}", ranges.join(", "));
    println!(
        "  Protected:          {}",
        settings.protected_processes.join(", ")
    );
    println!("  Grace period:       {} ms", settings.grace_period_ms);
    println!("  Poll interval:      {} ms", settings.poll_interval_ms);
    println!("  Command max length: {}", settings.command_max_length);
    Ok(true)
}
