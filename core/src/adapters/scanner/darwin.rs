//! macOS port scanner implementation using lsof and ps.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::domain::{ProcessDetails, Protocol, Resolution, SkipReason, SocketEntry, LISTEN};
use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// macOS-specific port scanner using lsof.
pub struct DarwinScanner;

impl DarwinScanner {
    /// Create a new macOS scanner.
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into socket rows.
    ///
    /// lsof is asked for LISTEN sockets only, so every parsed row is a
    /// listening TCP socket.
    fn parse_lsof_output(&self, output: &str) -> Vec<SocketEntry> {
        let mut sockets = Vec::new();

        for line in output.lines().skip(1) {
            if line.is_empty() {
                continue;
            }

            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            // NODE column
            let protocol = Protocol::parse(components[7]).unwrap_or(Protocol::Tcp);

            let mut address_part = "";
            for comp in components[8..].iter().rev() {
                if comp.contains(':') && !comp.starts_with("0x") && !comp.starts_with("0t") {
                    address_part = comp;
                    break;
                }
            }

            let (local_address, port) = match Utils::parse_address(address_part) {
                Some((a, p)) => (a, p),
                None => continue,
            };

            sockets.push(SocketEntry {
                protocol,
                local_address,
                port,
                status: LISTEN.to_string(),
                pid: Some(pid),
            });
        }

        sockets
    }

    /// Run `ps -p <pid> -o <field>=`; `None` when the process is gone.
    async fn ps_field(&self, pid: u32, field: &str) -> std::io::Result<Option<String>> {
        let output = Command::new("/bin/ps")
            .args(["-p", &pid.to_string(), "-o", &format!("{}=", field)])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }
}

impl Default for DarwinScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for DarwinScanner {
    async fn list_sockets(&self) -> Result<Vec<SocketEntry>> {
        let output = Command::new("/usr/sbin/lsof")
            .args(["-iTCP", "-sTCP:LISTEN", "-P", "-n", "+c", "0"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run lsof: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        Ok(self.parse_lsof_output(&stdout))
    }

    async fn resolve(&self, pid: u32) -> Resolution {
        let comm = match self.ps_field(pid, "comm").await {
            Ok(Some(comm)) => comm,
            Ok(None) => return Resolution::Skipped(SkipReason::Vanished),
            Err(e) => return Resolution::Skipped(e.into()),
        };
        let args = match self.ps_field(pid, "args").await {
            Ok(Some(args)) => args,
            Ok(None) => return Resolution::Skipped(SkipReason::Vanished),
            Err(e) => return Resolution::Skipped(e.into()),
        };

        // comm is the executable path on macOS.
        let name = Path::new(&comm)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&comm)
            .to_string();

        Resolution::Found(ProcessDetails::new(name, args))
    }
}
