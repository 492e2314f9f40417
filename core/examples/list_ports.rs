//! Example: Scan and display all listening ports.
//!
//! Usage:
//!   cargo run --example list_ports          # All listening ports
//!   cargo run --example list_ports -- dev   # Development ports only

use portsweep_core::{is_development_port, PortScanner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let dev_only = std::env::args().nth(1).as_deref() == Some("dev");

    println!("Scanning ports...\n");

    let scanner = PortScanner::new();

    match scanner.scan().await {
        Ok(mut ports) => {
            if dev_only {
                ports.retain(|p| is_development_port(p.port()));
            }

            if ports.is_empty() {
                println!("No listening ports found.");
                return;
            }

            println!(
                "{:<6} {:<8} {:<8} {:<20} {:<10} {}",
                "PORT", "PROTO", "PID", "PROCESS", "FLAGS", "COMMAND"
            );
            println!("{}", "-".repeat(100));

            for port in &ports {
                let mut flags = String::new();
                if port.is_protected() {
                    flags.push('P');
                }
                if is_development_port(port.port()) {
                    flags.push('D');
                }

                let name: String = port.process_name().chars().take(20).collect();
                let command: String = port.command_line().chars().take(50).collect();

                println!(
                    "{:<6} {:<8} {:<8} {:<20} {:<10} {}",
                    port.port(),
                    port.protocol(),
                    port.pid(),
                    name,
                    flags,
                    command
                );
            }

            println!("\nTotal: {} ports", ports.len());
        }
        Err(e) => {
            eprintln!("Error scanning ports: {}", e);
        }
    }
}
