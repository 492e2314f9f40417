//! Port finding data structure and scan assembly.

use serde::Serialize;
use tracing::debug;

use super::classify::Classifier;
use super::humanize::humanize;
use super::socket::{Protocol, Resolution, SocketEntry};

/// Maximum length of [`PortFinding::command_line`], in characters.
pub const COMMAND_MAX_LENGTH: usize = 150;

/// A process listening on a local port.
///
/// Findings are snapshots: every scan builds fresh ones and nothing is kept
/// between scans. Fields are read-only so the protection flag always agrees
/// with the process name it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PortFinding {
    port: u16,
    pid: u32,
    process_name: String,
    command_line: String,
    protocol: Protocol,
    status: String,
    local_address: String,
    is_protected: bool,
}

impl PortFinding {
    /// Build a finding, classifying the process and truncating the command
    /// line to [`COMMAND_MAX_LENGTH`] characters.
    pub fn new(
        port: u16,
        pid: u32,
        process_name: impl Into<String>,
        command_line: impl Into<String>,
        protocol: Protocol,
        status: impl Into<String>,
        classifier: &Classifier,
    ) -> Self {
        Self::with_command_limit(
            port,
            pid,
            process_name,
            command_line,
            protocol,
            status,
            classifier,
            COMMAND_MAX_LENGTH,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn with_command_limit(
        port: u16,
        pid: u32,
        process_name: impl Into<String>,
        command_line: impl Into<String>,
        protocol: Protocol,
        status: impl Into<String>,
        classifier: &Classifier,
        command_max_length: usize,
    ) -> Self {
        let process_name = process_name.into();
        let command_line: String = command_line.into().chars().take(command_max_length).collect();
        let is_protected = classifier.is_protected(&process_name);

        Self {
            port,
            pid,
            process_name,
            command_line,
            protocol,
            status: status.into(),
            local_address: "*".to_string(),
            is_protected,
        }
    }

    /// Set the address the socket is bound to.
    pub fn with_local_address(mut self, local_address: impl Into<String>) -> Self {
        self.local_address = local_address.into();
        self
    }

    /// The local port number.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Process ID of the owner.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// Humanized (or raw) command line, at most 150 characters by default.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Connection state as reported by the OS.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Bound address without the port (`*` for all interfaces).
    pub fn local_address(&self) -> &str {
        &self.local_address
    }

    /// Whether the owning process matched the protected-name set.
    pub fn is_protected(&self) -> bool {
        self.is_protected
    }

    /// Get the formatted port number for display (e.g., ":3000").
    pub fn display_port(&self) -> String {
        format!(":{}", self.port)
    }

    /// Full bound endpoint (e.g., "127.0.0.1:3000").
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.local_address, self.display_port())
    }

    /// Check if this finding matches a search query.
    ///
    /// Searches across process name, port number, PID and command line.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        let query_lower = query.to_lowercase();
        self.process_name.to_lowercase().contains(&query_lower)
            || self.port.to_string().contains(&query_lower)
            || self.pid.to_string().contains(&query_lower)
            || self.command_line.to_lowercase().contains(&query_lower)
    }
}

impl std::fmt::Display for PortFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} (PID: {}, Process: {})",
            self.port, self.protocol, self.pid, self.process_name
        )
    }
}

/// Join socket rows with their processes into sorted findings.
///
/// Rows that are not listening, have no owner visible to the caller, or whose
/// owner cannot be resolved are dropped. The result is sorted by port; rows on
/// the same port keep their discovery order.
pub fn collect_findings<F>(
    sockets: Vec<SocketEntry>,
    mut resolve: F,
    classifier: &Classifier,
    command_max_length: usize,
) -> Vec<PortFinding>
where
    F: FnMut(u32) -> Resolution,
{
    let mut findings = Vec::new();

    for socket in sockets {
        if !socket.is_listening() {
            continue;
        }

        let Some(pid) = socket.pid.filter(|&pid| pid != 0) else {
            debug!(port = socket.port, "Skipping socket without a visible owner");
            continue;
        };

        let details = match resolve(pid) {
            Resolution::Found(details) => details,
            Resolution::Skipped(reason) => {
                debug!(port = socket.port, pid = pid, %reason, "Skipping socket");
                continue;
            }
        };

        let label = humanize(&details.command_line, &details.name);
        findings.push(PortFinding::with_command_limit(
            socket.port,
            pid,
            details.name,
            label,
            socket.protocol,
            socket.status,
            classifier,
            command_max_length,
        )
        .with_local_address(socket.local_address));
    }

    // Stable sort keeps dual-stack duplicates in discovery order.
    findings.sort_by_key(|f| f.port);
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::socket::{ProcessDetails, SkipReason, LISTEN};
    use std::collections::HashMap;

    fn socket(port: u16, pid: Option<u32>, status: &str) -> SocketEntry {
        SocketEntry {
            protocol: Protocol::Tcp,
            local_address: "*".to_string(),
            port,
            status: status.to_string(),
            pid,
        }
    }

    fn resolver(table: HashMap<u32, Resolution>) -> impl FnMut(u32) -> Resolution {
        move |pid| {
            table
                .get(&pid)
                .cloned()
                .unwrap_or(Resolution::Skipped(SkipReason::Vanished))
        }
    }

    fn found(name: &str, cmd: &str) -> Resolution {
        Resolution::Found(ProcessDetails::new(name, cmd))
    }

    #[test]
    fn test_new_finding_classifies() {
        let classifier = Classifier::default();
        let db = PortFinding::new(5432, 10, "postgres", "postgres -D /data", Protocol::Tcp, LISTEN, &classifier);
        assert!(db.is_protected());
        assert_eq!(db.port(), 5432);
        assert_eq!(db.status(), "LISTEN");

        let node = PortFinding::new(3000, 11, "node", "node server.js", Protocol::Tcp, LISTEN, &classifier);
        assert!(!node.is_protected());
    }

    #[test]
    fn test_command_line_truncated() {
        let classifier = Classifier::default();
        let long = "x".repeat(400);
        let finding = PortFinding::new(3000, 1, "node", long, Protocol::Tcp, LISTEN, &classifier);
        assert_eq!(finding.command_line().chars().count(), COMMAND_MAX_LENGTH);

        // Multi-byte characters are counted, not bytes.
        let wide = "é".repeat(200);
        let finding = PortFinding::new(3000, 1, "node", wide, Protocol::Tcp, LISTEN, &classifier);
        assert_eq!(finding.command_line().chars().count(), COMMAND_MAX_LENGTH);
    }

    #[test]
    fn test_collect_sorts_by_port() {
        let sockets = vec![
            socket(8080, Some(3), LISTEN),
            socket(22, Some(1), LISTEN),
            socket(3000, Some(2), LISTEN),
        ];
        let table = HashMap::from([
            (1, found("sshd", "/usr/sbin/sshd -D")),
            (2, found("node", "node server.js")),
            (3, found("java", "java -jar app.jar")),
        ]);

        let findings = collect_findings(sockets, resolver(table), &Classifier::default(), COMMAND_MAX_LENGTH);
        let ports: Vec<u16> = findings.iter().map(|f| f.port()).collect();
        assert_eq!(ports, vec![22, 3000, 8080]);
        assert_eq!(findings[2].command_line(), "Java Application - app.jar");
    }

    #[test]
    fn test_collect_keeps_discovery_order_on_ties() {
        let sockets = vec![
            socket(3000, Some(7), LISTEN),
            socket(80, Some(9), LISTEN),
            socket(3000, Some(8), LISTEN),
        ];
        let table = HashMap::from([
            (7, found("node", "node a.js")),
            (8, found("node", "node b.js")),
            (9, found("nginx", "nginx")),
        ]);

        let findings = collect_findings(sockets, resolver(table), &Classifier::default(), COMMAND_MAX_LENGTH);
        let pids: Vec<u32> = findings.iter().map(|f| f.pid()).collect();
        assert_eq!(pids, vec![9, 7, 8]);
    }

    #[test]
    fn test_collect_skips_non_listening_and_ownerless() {
        let sockets = vec![
            socket(53, Some(1), "UNCONN"),
            socket(0, Some(1), LISTEN),
            socket(3000, None, LISTEN),
            socket(3001, Some(0), LISTEN),
            socket(3002, Some(1), LISTEN),
        ];
        let table = HashMap::from([(1, found("node", "node server.js"))]);

        let findings = collect_findings(sockets, resolver(table), &Classifier::default(), COMMAND_MAX_LENGTH);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].port(), 3002);
    }

    #[test]
    fn test_collect_skips_unresolvable_processes() {
        let sockets = vec![
            socket(3000, Some(1), LISTEN),
            socket(3001, Some(2), LISTEN),
            socket(3002, Some(3), LISTEN),
            socket(3003, Some(4), LISTEN),
        ];
        let table = HashMap::from([
            (1, Resolution::Skipped(SkipReason::Vanished)),
            (2, Resolution::Skipped(SkipReason::AccessDenied)),
            (3, Resolution::Skipped(SkipReason::Unreadable("bad stat".to_string()))),
            (4, found("python3", "python3 manage.py runserver 0.0.0.0:3003")),
        ]);

        let findings = collect_findings(sockets, resolver(table), &Classifier::default(), COMMAND_MAX_LENGTH);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pid(), 4);
        assert_eq!(findings[0].command_line(), "Django Dev Server");
    }

    #[test]
    fn test_collect_marks_protected() {
        let sockets = vec![socket(5432, Some(5), LISTEN), socket(6379, Some(6), LISTEN)];
        let table = HashMap::from([
            (5, found("postgres", "/usr/lib/postgresql/16/bin/postgres")),
            (6, found("redis-server", "redis-server *:6379")),
        ]);

        let findings = collect_findings(sockets, resolver(table), &Classifier::default(), COMMAND_MAX_LENGTH);
        assert!(findings.iter().all(|f| f.is_protected()));
    }

    #[test]
    fn test_matches_search() {
        let finding = PortFinding::new(
            3000,
            1234,
            "node",
            "node server.js",
            Protocol::Tcp,
            LISTEN,
            &Classifier::default(),
        );

        assert!(finding.matches_search("node"));
        assert!(finding.matches_search("3000"));
        assert!(finding.matches_search("1234"));
        assert!(finding.matches_search("SERVER.JS"));
        assert!(finding.matches_search(""));
        assert!(!finding.matches_search("nginx"));
    }

    #[test]
    fn test_collect_keeps_bound_address() {
        let mut loopback = socket(5173, Some(4), LISTEN);
        loopback.local_address = "127.0.0.1".to_string();
        let sockets = vec![loopback, socket(8080, Some(4), LISTEN)];
        let table = HashMap::from([(4, found("node", "node vite.js"))]);

        let findings = collect_findings(sockets, resolver(table), &Classifier::default(), COMMAND_MAX_LENGTH);
        assert_eq!(findings[0].local_address(), "127.0.0.1");
        assert_eq!(findings[0].endpoint(), "127.0.0.1:5173");
        assert_eq!(findings[1].display_port(), ":8080");
        assert_eq!(findings[1].endpoint(), "*:8080");
    }

    #[test]
    fn test_serializes_flat() {
        let finding = PortFinding::new(8000, 42, "python3", "Django Dev Server", Protocol::Tcp, LISTEN, &Classifier::default());
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["port"], 8000);
        assert_eq!(json["protocol"], "TCP");
        assert_eq!(json["is_protected"], false);
        assert_eq!(json["local_address"], "*");
    }
}
