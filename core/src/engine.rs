//! PortSweeper engine - Blocking entry point to the library.
//!
//! This module wires the platform scanner and killer into the application
//! services and exposes them as plain synchronous calls. Async work runs on
//! a private single-threaded runtime.

use tokio::runtime::{Builder, Runtime};

use crate::adapters::{PortScanner, ProcessKiller};
use crate::application::{PortService, TerminationService};
use crate::config::{ConfigStore, Settings};
use crate::domain::{Classifier, PortFinding, TerminationOutcome};
use crate::error::Result;

/// The main PortSweeper engine.
///
/// Holds no port state: every query scans the system again.
///
/// # Usage Pattern
/// ```no_run
/// use portsweep_core::PortSweeper;
///
/// let sweeper = PortSweeper::new()?;
/// for finding in sweeper.get_development_ports()? {
///     println!("{}", finding);
/// }
/// # Ok::<(), portsweep_core::Error>(())
/// ```
pub struct PortSweeper {
    service: TerminationService<PortScanner, ProcessKiller>,
    settings: Settings,
    runtime: Runtime,
}

impl PortSweeper {
    /// Create an engine with the built-in tables and timings.
    pub fn new() -> Result<Self> {
        Self::with_settings(Settings::default())
    }

    /// Create an engine from explicit settings.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::assemble(settings, Self::runtime()?))
    }

    /// Create an engine from the settings file behind `store`.
    pub fn from_config(store: &ConfigStore) -> Result<Self> {
        let runtime = Self::runtime()?;
        let settings = runtime.block_on(store.load())?;
        Ok(Self::assemble(settings, runtime))
    }

    fn runtime() -> Result<Runtime> {
        // Single-threaded runtime: calls are sequential and short-lived.
        Ok(Builder::new_current_thread().enable_all().build()?)
    }

    fn assemble(settings: Settings, runtime: Runtime) -> Self {
        let classifier = settings.classifier();
        let scanner = PortScanner::with_classifier(classifier.clone(), settings.command_max_length);
        let killer = ProcessKiller::with_poll_interval(settings.poll_interval());
        let service = TerminationService::new(
            PortService::new(scanner, classifier),
            killer,
            settings.grace_period(),
        );

        Self {
            service,
            settings,
            runtime,
        }
    }

    // MARK: - Inventory

    /// All listening ports, sorted by port.
    pub fn list_listening_ports(&self) -> Result<Vec<PortFinding>> {
        self.runtime
            .block_on(self.service.ports().list_listening_ports())
    }

    /// Listening ports inside the development ranges.
    pub fn get_development_ports(&self) -> Result<Vec<PortFinding>> {
        self.runtime.block_on(self.service.ports().development_ports())
    }

    /// The finding for `port`, or `None` when nothing listens there.
    pub fn get_port_info(&self, port: u16) -> Result<Option<PortFinding>> {
        self.runtime.block_on(self.service.ports().port_info(port))
    }

    // MARK: - Classification

    /// Check a port against the configured development ranges.
    pub fn is_development_port(&self, port: u16) -> bool {
        self.service.ports().is_development_port(port)
    }

    /// Check a process name against the configured protected set.
    pub fn is_protected(&self, process_name: &str) -> bool {
        self.classifier().is_protected(process_name)
    }

    /// Classification tables in effect.
    pub fn classifier(&self) -> &Classifier {
        self.service.ports().classifier()
    }

    /// Settings the engine was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // MARK: - Termination

    /// Terminate a process by PID. Returns `true` if it is no longer running.
    pub fn terminate_process(&self, pid: u32, force: bool) -> bool {
        self.runtime
            .block_on(self.service.terminate_process(pid, force))
    }

    /// Terminate a process by PID, reporting the exact outcome.
    pub fn terminate_process_detailed(&self, pid: u32, force: bool) -> TerminationOutcome {
        self.runtime
            .block_on(self.service.terminate_process_detailed(pid, force))
    }

    /// Terminate the process listening on `port`.
    ///
    /// Returns `Ok(false)` if nothing listens there or termination failed.
    pub fn terminate_port(&self, port: u16, force: bool) -> Result<bool> {
        self.runtime
            .block_on(self.service.terminate_port(port, force))
    }

    /// Terminate every unprotected process on a development port.
    ///
    /// Returns how many were terminated.
    pub fn terminate_all_development_ports(&self, force: bool) -> Result<usize> {
        self.runtime
            .block_on(self.service.terminate_all_development_ports(force))
    }
}
