//! Port and process classification.

use serde::{Deserialize, Serialize};

/// Process-name substrings that mark a process as protected.
///
/// Matching is a case-insensitive substring test, so `mysqld_safe` matches
/// `mysqld` and any name containing `mysql` matches `mysql`.
pub const DEFAULT_PROTECTED_PROCESSES: &[&str] = &[
    "postgres",
    "postgresql",
    "mysqld",
    "mysql",
    "redis-server",
    "mongod",
    "nginx",
    "apache2",
];

/// Port ranges conventionally used by local development servers.
pub const DEFAULT_DEV_PORT_RANGES: &[PortRange] = &[
    PortRange::new(3000, 3999), // Node.js, React, Vue, Next.js
    PortRange::new(4200, 4299), // Angular CLI
    PortRange::new(5000, 5999), // Flask, Django
    PortRange::new(8000, 8999), // Django, FastAPI, Go servers
    PortRange::new(5173, 5173), // Vite
    PortRange::new(8080, 8080), // Tomcat, Spring Boot
];

/// An inclusive range of port numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    /// First port in the range.
    pub start: u16,
    /// Last port in the range (inclusive).
    pub end: u16,
}

impl PortRange {
    /// Create a new inclusive range.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Check whether `port` lies within the range, bounds included.
    pub fn contains(&self, port: u16) -> bool {
        self.start <= port && port <= self.end
    }
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Immutable classification tables.
///
/// Built once at startup, either from the defaults above or from user
/// settings, and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    protected_names: Vec<String>,
    dev_port_ranges: Vec<PortRange>,
}

impl Classifier {
    /// Build a classifier from custom tables.
    ///
    /// Protected names are lower-cased so matching stays case-insensitive.
    pub fn new<I, S>(protected_names: I, dev_port_ranges: Vec<PortRange>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            protected_names: protected_names
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            dev_port_ranges,
        }
    }

    /// Check if a port falls within any development range.
    pub fn is_development_port(&self, port: u16) -> bool {
        self.dev_port_ranges.iter().any(|r| r.contains(port))
    }

    /// Check if a process name contains any protected substring.
    pub fn is_protected(&self, process_name: &str) -> bool {
        let name = process_name.to_lowercase();
        self.protected_names.iter().any(|p| name.contains(p.as_str()))
    }

    /// Protected-name substrings, lower-cased.
    pub fn protected_names(&self) -> &[String] {
        &self.protected_names
    }

    /// Development port ranges, in table order.
    pub fn dev_port_ranges(&self) -> &[PortRange] {
        &self.dev_port_ranges
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROTECTED_PROCESSES.iter().copied(),
            DEFAULT_DEV_PORT_RANGES.to_vec(),
        )
    }
}

/// Check a port against the default development ranges.
pub fn is_development_port(port: u16) -> bool {
    DEFAULT_DEV_PORT_RANGES.iter().any(|r| r.contains(port))
}

/// Check a process name against the default protected set.
pub fn is_protected(process_name: &str) -> bool {
    let name = process_name.to_lowercase();
    DEFAULT_PROTECTED_PROCESSES.iter().any(|p| name.contains(p))
}
