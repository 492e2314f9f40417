//! Process termination through POSIX signals.
//!
//! Uses `kill(2)` directly:
//! - SIGTERM for graceful termination
//! - SIGKILL for forced termination
//! - signal 0 to check whether a process still exists

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

use crate::domain::{SignalOutcome, TerminationSignal};
use crate::ports::ProcessKillerPort;

/// Default interval between exit checks.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Signal-based process killer.
#[derive(Debug, Clone)]
pub struct ProcessKiller {
    poll_interval: Duration,
}

impl ProcessKiller {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    /// Create a killer that checks for exit every `poll_interval`.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl Default for ProcessKiller {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert to a `pid_t` that addresses exactly one process.
///
/// 0 and negative values would address process groups, so they are refused.
#[cfg(unix)]
fn target_pid(pid: u32) -> Option<Pid> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Some(Pid::from_raw(raw)),
        _ => None,
    }
}

/// A zombie has exited and only waits to be reaped.
#[cfg(target_os = "linux")]
fn is_zombie(pid: u32) -> bool {
    // Format: "pid (comm) state ...", where comm may itself contain ')'.
    std::fs::read_to_string(format!("/proc/{}/stat", pid))
        .ok()
        .and_then(|stat| {
            stat.rfind(')')
                .map(|end| stat[end + 1..].trim_start().starts_with('Z'))
        })
        .unwrap_or(false)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn is_zombie(_pid: u32) -> bool {
    false
}

impl ProcessKillerPort for ProcessKiller {
    #[cfg(unix)]
    fn signal(&self, pid: u32, signal: TerminationSignal) -> SignalOutcome {
        let Some(target) = target_pid(pid) else {
            warn!(pid = pid, "Refusing to signal invalid PID");
            return SignalOutcome::Failed(format!("invalid PID {}", pid));
        };

        let sig = match signal {
            TerminationSignal::Graceful => Signal::SIGTERM,
            TerminationSignal::Forced => Signal::SIGKILL,
        };

        debug!(pid = pid, signal = signal.name(), "Sending signal to process");
        match kill(target, sig) {
            Ok(()) => SignalOutcome::Delivered,
            Err(Errno::ESRCH) => {
                debug!(pid = pid, "Process not found");
                SignalOutcome::Vanished
            }
            Err(Errno::EPERM) => {
                warn!(pid = pid, "Permission denied to signal process");
                SignalOutcome::PermissionDenied
            }
            Err(e) => {
                warn!(pid = pid, error = %e, "Failed to signal process");
                SignalOutcome::Failed(e.to_string())
            }
        }
    }

    #[cfg(not(unix))]
    fn signal(&self, pid: u32, _signal: TerminationSignal) -> SignalOutcome {
        warn!(pid = pid, "Signals are not supported on this platform");
        SignalOutcome::Failed(format!(
            "process termination is not available on {}",
            std::env::consts::OS
        ))
    }

    #[cfg(unix)]
    fn is_running(&self, pid: u32) -> bool {
        let Some(target) = target_pid(pid) else {
            return false;
        };

        match kill(target, None) {
            Ok(()) => !is_zombie(pid),
            // Exists, but belongs to someone else.
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    fn is_running(&self, _pid: u32) -> bool {
        false
    }

    async fn wait_for_exit(&self, pid: u32, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_running(pid) {
                debug!(pid = pid, "Process exited");
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(pid = pid, "Process still running after wait");
                return false;
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    /// Far above any kernel pid_max, so never a live process.
    const MISSING_PID: u32 = i32::MAX as u32;

    fn spawn_sleeper() -> (u32, std::thread::JoinHandle<()>) {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id();
        // Reap in the background so the exited child does not linger as a zombie.
        let reaper = std::thread::spawn(move || {
            let _ = child.wait();
        });
        (pid, reaper)
    }

    #[test]
    fn test_is_running_current_process() {
        let killer = ProcessKiller::new();
        assert!(killer.is_running(std::process::id()));
    }

    #[test]
    fn test_is_running_nonexistent() {
        let killer = ProcessKiller::new();
        assert!(!killer.is_running(MISSING_PID));
        assert!(!killer.is_running(0));
    }

    #[test]
    fn test_signal_nonexistent_process() {
        let killer = ProcessKiller::new();
        assert_eq!(
            killer.signal(MISSING_PID, TerminationSignal::Graceful),
            SignalOutcome::Vanished
        );
        assert_eq!(
            killer.signal(MISSING_PID, TerminationSignal::Forced),
            SignalOutcome::Vanished
        );
    }

    #[test]
    fn test_signal_refuses_group_pids() {
        let killer = ProcessKiller::new();
        assert!(matches!(
            killer.signal(0, TerminationSignal::Forced),
            SignalOutcome::Failed(_)
        ));
        assert!(matches!(
            killer.signal(u32::MAX, TerminationSignal::Forced),
            SignalOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_sigterm_stops_child() {
        let killer = ProcessKiller::with_poll_interval(Duration::from_millis(10));
        let (pid, reaper) = spawn_sleeper();

        assert!(killer.is_running(pid));
        assert_eq!(
            killer.signal(pid, TerminationSignal::Graceful),
            SignalOutcome::Delivered
        );
        assert!(killer.wait_for_exit(pid, Duration::from_secs(3)).await);
        reaper.join().unwrap();
    }

    #[tokio::test]
    async fn test_wait_times_out_for_live_process() {
        let killer = ProcessKiller::with_poll_interval(Duration::from_millis(10));
        let started = Instant::now();
        assert!(
            !killer
                .wait_for_exit(std::process::id(), Duration::from_millis(100))
                .await
        );
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
