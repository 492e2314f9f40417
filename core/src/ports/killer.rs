//! Process killer port (interface).

use std::time::Duration;

use crate::domain::{SignalOutcome, TerminationSignal};

/// Port for signalling processes.
///
/// This trait defines the primitive steps of termination. The graceful →
/// forced sequence is built on top of it by the application layer.
pub trait ProcessKillerPort: Send + Sync {
    /// Send a single termination signal to `pid`.
    fn signal(&self, pid: u32, signal: TerminationSignal) -> SignalOutcome;

    /// Check if a process is still running.
    fn is_running(&self, pid: u32) -> bool;

    /// Wait until `pid` exits or `timeout` elapses.
    ///
    /// Returns `true` if the process is gone.
    fn wait_for_exit(
        &self,
        pid: u32,
        timeout: Duration,
    ) -> impl std::future::Future<Output = bool> + Send;
}
