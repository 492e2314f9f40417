//! Process termination application service.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{SignalOutcome, TerminationOutcome, TerminationSignal};
use crate::error::Result;
use crate::ports::{PortScannerPort, ProcessKillerPort};

use super::PortService;

/// Application service for terminating processes.
///
/// A graceful termination sends SIGTERM and waits for the grace period.
/// If the process is still running it escalates to SIGKILL and waits once
/// more. A forced termination starts at SIGKILL.
pub struct TerminationService<S: PortScannerPort, K: ProcessKillerPort> {
    ports: PortService<S>,
    killer: K,
    grace_period: Duration,
}

impl<S: PortScannerPort, K: ProcessKillerPort> TerminationService<S, K> {
    pub fn new(ports: PortService<S>, killer: K, grace_period: Duration) -> Self {
        Self {
            ports,
            killer,
            grace_period,
        }
    }

    /// The inventory service used to find target processes.
    pub fn ports(&self) -> &PortService<S> {
        &self.ports
    }

    /// Terminate `pid` and report exactly how it went.
    pub async fn terminate_process_detailed(&self, pid: u32, force: bool) -> TerminationOutcome {
        if !force {
            match self.step(pid, TerminationSignal::Graceful).await {
                Ok(true) => return TerminationOutcome::Exited,
                Ok(false) => {
                    debug!(pid = pid, "Process ignored SIGTERM, escalating to SIGKILL");
                }
                Err(outcome) => return outcome,
            }
        }

        match self.step(pid, TerminationSignal::Forced).await {
            Ok(true) => TerminationOutcome::Exited,
            Ok(false) => {
                warn!(pid = pid, "Process still running after SIGKILL");
                TerminationOutcome::TimedOut
            }
            Err(outcome) => outcome,
        }
    }

    /// Send one signal and wait for the process to exit.
    ///
    /// `Ok` carries whether the process exited within the grace period.
    /// `Err` is the final outcome when the signal was not delivered.
    async fn step(
        &self,
        pid: u32,
        signal: TerminationSignal,
    ) -> std::result::Result<bool, TerminationOutcome> {
        match self.killer.signal(pid, signal) {
            SignalOutcome::Delivered => {
                let exited = self.killer.wait_for_exit(pid, self.grace_period).await;
                if exited {
                    info!(pid = pid, signal = signal.name(), "Process exited");
                }
                Ok(exited)
            }
            SignalOutcome::Vanished => {
                debug!(pid = pid, "Process already gone");
                Err(TerminationOutcome::AlreadyGone)
            }
            SignalOutcome::PermissionDenied => Err(TerminationOutcome::PermissionDenied),
            SignalOutcome::Failed(reason) => Err(TerminationOutcome::Failed(reason)),
        }
    }

    /// Terminate `pid`. Returns `true` if it is no longer running.
    pub async fn terminate_process(&self, pid: u32, force: bool) -> bool {
        self.terminate_process_detailed(pid, force)
            .await
            .is_success()
    }

    /// Terminate whatever listens on `port`.
    ///
    /// Returns `Ok(false)` when nothing listens there. Protection is not
    /// checked here; confirming protected targets is up to the caller.
    pub async fn terminate_port(&self, port: u16, force: bool) -> Result<bool> {
        let Some(finding) = self.ports.port_info(port).await? else {
            debug!(port = port, "No process listening on port");
            return Ok(false);
        };

        Ok(self.terminate_process(finding.pid(), force).await)
    }

    /// Terminate every unprotected process on a development port.
    ///
    /// Returns the number of findings whose process was terminated.
    pub async fn terminate_all_development_ports(&self, force: bool) -> Result<usize> {
        let findings = self.ports.development_ports().await?;

        let mut terminated = 0;
        for finding in &findings {
            if finding.is_protected() {
                debug!(
                    port = finding.port(),
                    process = finding.process_name(),
                    "Skipping protected process"
                );
                continue;
            }

            if self.terminate_process(finding.pid(), force).await {
                terminated += 1;
            } else {
                warn!(
                    port = finding.port(),
                    pid = finding.pid(),
                    "Failed to terminate process"
                );
            }
        }

        Ok(terminated)
    }
}
