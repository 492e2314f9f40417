//! Linux port scanner implementation using ss and procfs.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;

use regex::Regex;
use tokio::fs;
use tokio::process::Command;

use crate::domain::{ProcessDetails, Protocol, Resolution, SocketEntry};
use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// Kernel limit for `/proc/<pid>/comm`, excluding the trailing NUL.
const TASK_COMM_LEN: usize = 15;

/// Linux-specific port scanner.
pub struct LinuxScanner {
    proc_root: PathBuf,
}

fn pid_regex() -> &'static Regex {
    static PID: OnceLock<Regex> = OnceLock::new();
    PID.get_or_init(|| Regex::new(r"pid=(\d+)").expect("pid pattern is valid"))
}

impl LinuxScanner {
    pub fn new() -> Self {
        Self::with_proc_root("/proc")
    }

    /// Read process details from an alternate procfs mount.
    pub fn with_proc_root(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// Parse ss output into socket rows.
    ///
    /// Expected `ss -Htulnp` output format:
    /// ```text
    /// Netid State  Recv-Q Send-Q Local Address:Port  Peer Address:Port Process
    /// tcp   LISTEN 0      4096   [::ffff:127.0.0.1]:63342      *:*     users:(("rustrover",pid=53561,fd=54))
    /// udp   UNCONN 0      0      127.0.0.53%lo:53             0.0.0.0:*
    /// ```
    ///
    /// Rows without a `users:` block belong to processes the caller cannot see
    /// and get `pid: None`. When several processes share a socket, the first
    /// listed one owns it.
    fn parse_ss_output(&self, output: &str) -> Vec<SocketEntry> {
        let mut sockets = Vec::new();

        for line in output.lines() {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 6 {
                continue;
            }

            let Some(protocol) = Protocol::parse(components[0]) else {
                continue;
            };

            let (local_address, port) = match Utils::parse_address(components[4]) {
                Some((a, p)) => (a, p),
                None => continue,
            };

            let process = components[6..].join(" ");
            let pid = pid_regex()
                .captures(&process)
                .and_then(|caps| caps[1].parse::<u32>().ok());

            sockets.push(SocketEntry {
                protocol,
                local_address,
                port,
                status: components[1].to_string(),
                pid,
            });
        }

        sockets
    }

    async fn read_process(&self, pid: u32) -> std::io::Result<ProcessDetails> {
        let dir = self.proc_root.join(pid.to_string());
        let comm = fs::read_to_string(dir.join("comm")).await?;
        let raw_cmdline = fs::read(dir.join("cmdline")).await?;

        let args = split_cmdline(&raw_cmdline);
        let name = process_name(comm.trim_end_matches('\n'), &args);
        Ok(ProcessDetails::new(name, args.join(" ")))
    }
}

impl Default for LinuxScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a NUL-separated `/proc/<pid>/cmdline` into arguments.
fn split_cmdline(raw: &[u8]) -> Vec<String> {
    raw.split(|&b| b == 0)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect()
}

/// Pick the process name, recovering names the kernel truncated in `comm`.
fn process_name(comm: &str, args: &[String]) -> String {
    if comm.len() >= TASK_COMM_LEN {
        let exe = args
            .first()
            .and_then(|arg| Path::new(arg).file_name())
            .and_then(|name| name.to_str());
        if let Some(exe) = exe {
            if exe.starts_with(comm) {
                return exe.to_string();
            }
        }
    }
    comm.to_string()
}

impl Scanner for LinuxScanner {
    /// Enumerate TCP and UDP listening sockets.
    ///
    /// Executes: `ss -Htulnp`
    ///
    /// Flags explained:
    /// -H, --no-header     Suppress header line
    /// -t, --tcp           display TCP sockets
    /// -u, --udp           display UDP sockets
    /// -l, --listening     display listening sockets
    /// -n, --numeric       don't resolve service names
    /// -p, --processes     show process using socket
    async fn list_sockets(&self) -> Result<Vec<SocketEntry>> {
        let output = Command::new("ss")
            .args(["-Htulnp"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ss: {}", e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "ss exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        Ok(self.parse_ss_output(&stdout))
    }

    async fn resolve(&self, pid: u32) -> Resolution {
        match self.read_process(pid).await {
            Ok(details) => Resolution::Found(details),
            Err(e) => Resolution::Skipped(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SkipReason, LISTEN};
    use tempfile::TempDir;

    #[test]
    fn test_parse_ss_output() {
        let scanner = LinuxScanner::new();
        let output = r#"tcp LISTEN 0 4096 [::ffff:127.0.0.1]:80 *:* users:(("nginx",pid=55316,fd=6),("nginx",pid=55317,fd=6))
tcp LISTEN 0 511 0.0.0.0:3000 0.0.0.0:* users:(("node",pid=53561,fd=187))
udp UNCONN 0 0 127.0.0.53%lo:53 0.0.0.0:* users:(("systemd-resolve",pid=612,fd=13))"#;

        let sockets = scanner.parse_ss_output(output);
        assert_eq!(sockets.len(), 3);

        assert_eq!(sockets[0].port, 80);
        assert_eq!(sockets[0].pid, Some(55316));
        assert_eq!(sockets[0].protocol, Protocol::Tcp);
        assert_eq!(sockets[0].status, LISTEN);
        assert_eq!(sockets[0].local_address, "[::ffff:127.0.0.1]");

        assert_eq!(sockets[1].port, 3000);
        assert_eq!(sockets[1].pid, Some(53561));

        assert_eq!(sockets[2].protocol, Protocol::Udp);
        assert_eq!(sockets[2].status, "UNCONN");
        assert!(!sockets[2].is_listening());
    }

    #[test]
    fn test_parse_ss_without_process_column() {
        let scanner = LinuxScanner::new();
        let output = "tcp LISTEN 0 128 0.0.0.0:22 0.0.0.0:*\n\ntcp LISTEN 0 128 [::]:22 [::]:*";

        let sockets = scanner.parse_ss_output(output);
        assert_eq!(sockets.len(), 2);
        assert!(sockets.iter().all(|s| s.pid.is_none() && s.port == 22));
    }

    #[test]
    fn test_parse_ss_process_name_with_spaces() {
        let scanner = LinuxScanner::new();
        let output = r#"tcp LISTEN 0 128 127.0.0.1:8000 0.0.0.0:* users:(("tmux: server",pid=4242,fd=3))"#;

        let sockets = scanner.parse_ss_output(output);
        assert_eq!(sockets[0].pid, Some(4242));
    }

    #[test]
    fn test_split_cmdline() {
        assert_eq!(
            split_cmdline(b"python3\0manage.py\0runserver\0"),
            vec!["python3", "manage.py", "runserver"]
        );
        assert!(split_cmdline(b"").is_empty());
    }

    #[test]
    fn test_process_name_recovers_truncated_comm() {
        let args = vec!["/usr/lib/jvm/bin/language_server_linux".to_string()];
        assert_eq!(process_name("language_server", &args), "language_server_linux");

        // Short names are taken from comm as-is.
        assert_eq!(process_name("node", &["/usr/bin/nodejs".to_string()]), "node");

        assert_eq!(
            process_name("postgres: walwr", &["postgres: walwriter".to_string()]),
            "postgres: walwriter"
        );

        // A long comm that argv[0] does not extend stays untouched.
        assert_eq!(
            process_name("systemd-resolve", &["/lib/systemd/resolved".to_string()]),
            "systemd-resolve"
        );
        assert_eq!(process_name("kworker/0:1-eve", &[]), "kworker/0:1-eve");
    }

    fn fake_proc(entries: &[(u32, &str, &[u8])]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (pid, comm, cmdline) in entries {
            let proc_dir = dir.path().join(pid.to_string());
            std::fs::create_dir(&proc_dir).unwrap();
            std::fs::write(proc_dir.join("comm"), format!("{}\n", comm)).unwrap();
            std::fs::write(proc_dir.join("cmdline"), cmdline).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_resolve_reads_proc() {
        let proc_dir = fake_proc(&[(100, "node", &b"node\0node_modules/.bin/vite\0"[..])]);
        let scanner = LinuxScanner::with_proc_root(proc_dir.path());

        let resolution = scanner.resolve(100).await;
        assert_eq!(
            resolution,
            Resolution::Found(ProcessDetails::new("node", "node node_modules/.bin/vite"))
        );
    }

    #[tokio::test]
    async fn test_resolve_missing_process_is_vanished() {
        let proc_dir = fake_proc(&[]);
        let scanner = LinuxScanner::with_proc_root(proc_dir.path());

        assert_eq!(
            scanner.resolve(4242).await,
            Resolution::Skipped(SkipReason::Vanished)
        );
    }

    #[tokio::test]
    async fn test_resolve_current_process() {
        let scanner = LinuxScanner::new();
        match scanner.resolve(std::process::id()).await {
            Resolution::Found(details) => assert!(!details.name.is_empty()),
            other => panic!("Expected own process to resolve, got {:?}", other),
        }
    }
}
