//! Port inventory application service.

use crate::domain::{Classifier, PortFinding};
use crate::error::Result;
use crate::ports::PortScannerPort;

/// Application service for port inventory queries.
///
/// Every query runs a fresh scan through the `PortScannerPort`, so results
/// always reflect the system at the time of the call.
pub struct PortService<S: PortScannerPort> {
    scanner: S,
    classifier: Classifier,
}

impl<S: PortScannerPort> PortService<S> {
    /// Create a new port service with the given scanner.
    pub fn new(scanner: S, classifier: Classifier) -> Self {
        Self {
            scanner,
            classifier,
        }
    }

    /// All listening ports, sorted by port.
    pub async fn list_listening_ports(&self) -> Result<Vec<PortFinding>> {
        self.scanner.scan().await
    }

    /// Listening ports inside the development ranges.
    pub async fn development_ports(&self) -> Result<Vec<PortFinding>> {
        let findings = self.scanner.scan().await?;
        Ok(findings
            .into_iter()
            .filter(|f| self.classifier.is_development_port(f.port()))
            .collect())
    }

    /// The first finding for `port`, if anything listens on it.
    pub async fn port_info(&self, port: u16) -> Result<Option<PortFinding>> {
        let findings = self.scanner.scan().await?;
        Ok(findings.into_iter().find(|f| f.port() == port))
    }

    pub fn is_development_port(&self, port: u16) -> bool {
        self.classifier.is_development_port(port)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}
