//! Kill-dev command - terminate everything on development ports.

use std::path::Path;

use anyhow::Result;

use super::{confirm, sweeper};

pub fn run(config: Option<&Path>, force: bool, yes: bool) -> Result<bool> {
    let sweeper = sweeper(config)?;
    let ports = sweeper.get_development_ports()?;

    if ports.is_empty() {
        println!("No development ports to kill");
        return Ok(true);
    }

    println!("Found {} development ports", ports.len());

    if !yes {
        for port in &ports {
            let note = if port.is_protected() {
                " (protected, will be skipped)"
            } else {
                ""
            };
            println!("  - {}: {}{}", port.port(), port.process_name(), note);
        }

        if !confirm("\nKill all these processes?")? {
            println!("Cancelled");
            return Ok(true);
        }
    }

    let killed = sweeper.terminate_all_development_ports(force)?;
    println!("\nKilled {} processes", killed);
    Ok(true)
}
