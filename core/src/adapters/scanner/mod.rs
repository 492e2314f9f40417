//! Port scanner adapters.
//!
//! Platform-specific implementations of socket enumeration and process
//! lookup, joined into findings by [`PortScanner`].

#[cfg(target_os = "macos")]
mod darwin;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

mod utils;

use std::collections::HashMap;

use crate::domain::{
    collect_findings, Classifier, PortFinding, Resolution, SkipReason, SocketEntry,
    COMMAND_MAX_LENGTH,
};
use crate::error::Result;
use crate::ports::PortScannerPort;

/// The main port scanner that uses platform-specific implementations.
pub struct PortScanner {
    #[cfg(target_os = "macos")]
    inner: darwin::DarwinScanner,

    #[cfg(target_os = "linux")]
    inner: linux::LinuxScanner,

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    inner: unsupported::UnsupportedScanner,

    classifier: Classifier,
    command_max_length: usize,
}

impl PortScanner {
    /// Create a new port scanner for the current platform with the default
    /// classification tables.
    pub fn new() -> Self {
        Self::with_classifier(Classifier::default(), COMMAND_MAX_LENGTH)
    }

    /// Create a scanner that classifies findings with `classifier`.
    pub fn with_classifier(classifier: Classifier, command_max_length: usize) -> Self {
        Self {
            #[cfg(target_os = "macos")]
            inner: darwin::DarwinScanner::new(),

            #[cfg(target_os = "linux")]
            inner: linux::LinuxScanner::new(),

            #[cfg(not(any(target_os = "linux", target_os = "macos")))]
            inner: unsupported::UnsupportedScanner::new(),

            classifier,
            command_max_length,
        }
    }

    /// Scan all listening ports.
    pub async fn scan(&self) -> Result<Vec<PortFinding>> {
        let sockets = self.inner.list_sockets().await?;

        // Each owning process is looked up once, however many sockets it holds.
        let mut resolutions: HashMap<u32, Resolution> = HashMap::new();
        for pid in sockets
            .iter()
            .filter(|s| s.is_listening())
            .filter_map(|s| s.pid)
            .filter(|&pid| pid != 0)
        {
            if !resolutions.contains_key(&pid) {
                let resolution = self.inner.resolve(pid).await;
                resolutions.insert(pid, resolution);
            }
        }

        Ok(collect_findings(
            sockets,
            |pid| {
                resolutions
                    .get(&pid)
                    .cloned()
                    .unwrap_or(Resolution::Skipped(SkipReason::Vanished))
            },
            &self.classifier,
            self.command_max_length,
        ))
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PortScannerPort for PortScanner {
    async fn scan(&self) -> Result<Vec<PortFinding>> {
        PortScanner::scan(self).await
    }
}

/// Internal trait for platform-specific implementations.
trait Scanner: Send + Sync {
    /// Enumerate the socket table. Failing here fails the whole scan.
    fn list_sockets(&self) -> impl std::future::Future<Output = Result<Vec<SocketEntry>>> + Send;

    /// Look up the process behind `pid`.
    fn resolve(&self, pid: u32) -> impl std::future::Future<Output = Resolution> + Send;
}
