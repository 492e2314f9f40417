//! PortSweep Core Library
//!
//! Library for finding processes that listen on local ports and stopping
//! them safely. Provides functionality to:
//! - List listening ports with their owning process
//! - Classify ports as development ports and processes as protected
//! - Turn raw command lines into readable labels
//! - Terminate processes by PID or by port, gracefully or forcefully
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - macOS: Uses `lsof` and `ps` commands
//! - Linux: Uses `ss` and `/proc`
//! - Other platforms: enumeration fails with [`Error::UnsupportedPlatform`]

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod engine;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{
    humanize, is_development_port, is_protected, Classifier, PortFinding, PortRange, Protocol,
    TerminationOutcome, DEFAULT_DEV_PORT_RANGES, DEFAULT_PROTECTED_PROCESSES,
};

// Re-export other commonly used types
pub use adapters::{PortScanner, ProcessKiller};
pub use config::{ConfigStore, Settings};
pub use engine::PortSweeper;
pub use error::{Error, Result};
