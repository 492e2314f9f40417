//! Info command - show details for one port.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use portsweep_core::PortFinding;

use super::sweeper;

#[derive(Serialize)]
struct PortDetails<'a> {
    #[serde(flatten)]
    finding: &'a PortFinding,
    is_development_port: bool,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn run(config: Option<&Path>, port: u16, json: bool) -> Result<bool> {
    let sweeper = sweeper(config)?;

    let Some(finding) = sweeper.get_port_info(port)? else {
        eprintln!("No process found on port {}", port);
        return Ok(false);
    };
    let is_dev = sweeper.is_development_port(port);

    if json {
        let details = PortDetails {
            finding: &finding,
            is_development_port: is_dev,
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(true);
    }

    println!("Port Information:");
    println!("  Port:         {}", finding.port());
    println!("  Protocol:     {}", finding.protocol());
    println!("  Address:      {}", finding.endpoint());
    println!("  PID:          {}", finding.pid());
    println!("  Process:      {}", finding.process_name());
    println!("  Command:      {}", finding.command_line());
    println!("  Status:       {}", finding.status());
    println!("  Protected:    {}", yes_no(finding.is_protected()));
    println!("  Dev Port:     {}", yes_no(is_dev));
    Ok(true)
}
