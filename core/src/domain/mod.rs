//! Domain layer - Pure business logic and data models.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod classify;
mod finding;
mod humanize;
mod socket;
mod termination;

// Re-export all domain types
pub use classify::{
    is_development_port, is_protected, Classifier, PortRange, DEFAULT_DEV_PORT_RANGES,
    DEFAULT_PROTECTED_PROCESSES,
};
pub use finding::{collect_findings, PortFinding, COMMAND_MAX_LENGTH};
pub use humanize::humanize;
pub use socket::{ProcessDetails, Protocol, Resolution, SkipReason, SocketEntry, LISTEN};
pub use termination::{SignalOutcome, TerminationOutcome, TerminationSignal};
