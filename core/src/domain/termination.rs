//! Termination signals and outcomes.

use serde::Serialize;

/// Signal used for one termination step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// Cooperative shutdown request (SIGTERM).
    Graceful,
    /// Immediate, non-cooperative kill (SIGKILL).
    Forced,
}

impl TerminationSignal {
    pub fn name(&self) -> &'static str {
        match self {
            TerminationSignal::Graceful => "SIGTERM",
            TerminationSignal::Forced => "SIGKILL",
        }
    }
}

/// Result of delivering a single signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The OS accepted the signal.
    Delivered,
    /// No such process.
    Vanished,
    /// The caller may not signal this process.
    PermissionDenied,
    /// Any other failure.
    Failed(String),
}

/// Final result of a termination attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "reason")]
pub enum TerminationOutcome {
    /// The process exited after being signalled.
    Exited,
    /// The process was already gone.
    AlreadyGone,
    /// The caller may not signal the process. Never retried.
    PermissionDenied,
    /// The process survived the forced signal and the wait after it.
    TimedOut,
    /// Unexpected OS error.
    Failed(String),
}

impl TerminationOutcome {
    /// Whether the process is no longer running.
    pub fn is_success(&self) -> bool {
        matches!(self, TerminationOutcome::Exited | TerminationOutcome::AlreadyGone)
    }
}

impl std::fmt::Display for TerminationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationOutcome::Exited => f.write_str("process exited"),
            TerminationOutcome::AlreadyGone => f.write_str("process was already gone"),
            TerminationOutcome::PermissionDenied => f.write_str("permission denied"),
            TerminationOutcome::TimedOut => f.write_str("process did not exit in time"),
            TerminationOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
