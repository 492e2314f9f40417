//! List-dev command - show development ports only.

use std::path::Path;

use anyhow::Result;

use super::{sweeper, truncate};

pub fn run(config: Option<&Path>, json: bool) -> Result<bool> {
    let ports = sweeper(config)?.get_development_ports()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ports)?);
        return Ok(true);
    }

    if ports.is_empty() {
        println!("No development ports found.");
        return Ok(true);
    }

    println!(
        "{:<8} {:<8} {:<20} {:<40}",
        "PORT", "PID", "PROCESS", "COMMAND"
    );
    println!("{}", "-".repeat(90));

    for port in &ports {
        let protected = if port.is_protected() { "[PROTECTED]" } else { "" };
        println!(
            "{:<8} {:<8} {:<20} {:<40} {}",
            port.port(),
            port.pid(),
            truncate(port.process_name(), 20),
            truncate(port.command_line(), 40),
            protected
        );
    }

    println!("\nTotal: {} development ports", ports.len());
    Ok(true)
}
