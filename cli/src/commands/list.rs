//! List command - show all listening ports.

use std::path::Path;

use anyhow::Result;

use super::{sweeper, truncate};

pub fn run(config: Option<&Path>, filter: Option<String>, json: bool) -> Result<bool> {
    let sweeper = sweeper(config)?;
    let mut ports = sweeper.list_listening_ports()?;

    if let Some(ref query) = filter {
        ports.retain(|p| p.matches_search(query));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ports)?);
        return Ok(true);
    }

    if ports.is_empty() {
        println!("No listening ports found.");
        return Ok(true);
    }

    // Table header
    println!(
        "{:<8} {:<10} {:<8} {:<20} {:<40}",
        "PORT", "PROTOCOL", "PID", "PROCESS", "COMMAND"
    );
    println!("{}", "-".repeat(98));

    for port in &ports {
        let protected = if port.is_protected() { "[P]" } else { "   " };
        let dev = if sweeper.is_development_port(port.port()) {
            "[D]"
        } else {
            "   "
        };

        println!(
            "{:<8} {:<10} {:<8} {:<20} {:<40} {} {}",
            port.port(),
            port.protocol(),
            port.pid(),
            truncate(port.process_name(), 20),
            truncate(port.command_line(), 40),
            protected,
            dev
        );
    }

    println!("\nTotal: {} ports", ports.len());
    println!("[P] = Protected process");
    println!("[D] = Development port");
    Ok(true)
}
