//! Kill command - terminate the process on a port.

use std::path::Path;

use anyhow::Result;

use super::{confirm, sweeper};

pub fn run(config: Option<&Path>, port: u16, force: bool, yes: bool) -> Result<bool> {
    let sweeper = sweeper(config)?;

    let Some(target) = sweeper.get_port_info(port)? else {
        eprintln!("Error: No process found on port {}", port);
        return Ok(false);
    };

    if target.is_protected() && !yes {
        println!(
            "Warning: Process \"{}\" is marked as protected",
            target.process_name()
        );
        if !confirm("Continue?")? {
            println!("Cancelled");
            return Ok(true);
        }
    }

    println!(
        "Killing process {} (PID {}) on port {}...",
        target.process_name(),
        target.pid(),
        port
    );

    let outcome = sweeper.terminate_process_detailed(target.pid(), force);
    if outcome.is_success() {
        println!("Successfully killed process on port {}", port);
        Ok(true)
    } else {
        eprintln!("Error: Failed to kill process on port {}: {}", port, outcome);
        Ok(false)
    }
}
