//! Port scanner port (interface).

use crate::domain::PortFinding;
use crate::error::Result;

/// Port for enumerating listening sockets.
///
/// This trait defines the interface for port scanning functionality.
/// Implementations handle platform-specific details (ss, lsof, etc.)
pub trait PortScannerPort: Send + Sync {
    /// Scan for all listening ports.
    ///
    /// Returns findings sorted by port. Rows whose process vanished or cannot
    /// be inspected are omitted; only a failure of the whole enumeration is
    /// an error.
    fn scan(&self) -> impl std::future::Future<Output = Result<Vec<PortFinding>>> + Send;
}
