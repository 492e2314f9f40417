//! Scanner for targets without a socket-table implementation.

use crate::domain::{Resolution, SkipReason, SocketEntry};
use crate::error::{Error, Result};

use super::Scanner;

/// Scanner that fails every enumeration.
pub struct UnsupportedScanner;

impl UnsupportedScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnsupportedScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for UnsupportedScanner {
    async fn list_sockets(&self) -> Result<Vec<SocketEntry>> {
        Err(Error::UnsupportedPlatform(format!(
            "listening-port enumeration is not available on {}",
            std::env::consts::OS
        )))
    }

    async fn resolve(&self, _pid: u32) -> Resolution {
        Resolution::Skipped(SkipReason::Unreadable(
            "process lookup is not available on this platform".to_string(),
        ))
    }
}
