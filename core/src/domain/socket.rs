//! Raw socket rows and per-PID resolution results.
//!
//! These are what a platform scanner produces before the rows are joined
//! into [`PortFinding`](super::PortFinding)s.

use serde::{Deserialize, Serialize};

/// Connection state of a listening TCP socket as reported by the OS.
pub const LISTEN: &str = "LISTEN";

/// Transport protocol of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Parse a protocol tag such as `tcp`, `TCP`, `tcp6` or `udp`.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.to_ascii_lowercase();
        if tag.starts_with("tcp") {
            Some(Protocol::Tcp)
        } else if tag.starts_with("udp") {
            Some(Protocol::Udp)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the OS socket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEntry {
    pub protocol: Protocol,
    /// Local address without the port (e.g. `127.0.0.1`, `*`, `[::1]`).
    pub local_address: String,
    pub port: u16,
    /// State column as the OS reports it (`LISTEN`, `UNCONN`, ...).
    pub status: String,
    /// Owning process, when the OS exposes it to the caller.
    pub pid: Option<u32>,
}

impl SocketEntry {
    /// Whether the row describes a listening socket on a real port.
    pub fn is_listening(&self) -> bool {
        self.status == LISTEN && self.port != 0
    }
}

/// Name and invocation of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDetails {
    pub name: String,
    pub command_line: String,
}

impl ProcessDetails {
    pub fn new(name: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_line: command_line.into(),
        }
    }
}

/// Why a socket row was left out of the scan results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The process exited between socket enumeration and lookup.
    Vanished,
    /// The caller may not inspect the process.
    AccessDenied,
    /// The process could not be read for another reason.
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Vanished => f.write_str("process vanished"),
            SkipReason::AccessDenied => f.write_str("access denied"),
            SkipReason::Unreadable(reason) => write!(f, "unreadable: {}", reason),
        }
    }
}

/// Outcome of resolving a PID to its process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ProcessDetails),
    Skipped(SkipReason),
}

impl From<std::io::Error> for SkipReason {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SkipReason::Vanished,
            std::io::ErrorKind::PermissionDenied => SkipReason::AccessDenied,
            _ => SkipReason::Unreadable(err.to_string()),
        }
    }
}
