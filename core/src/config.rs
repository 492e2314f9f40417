//! Configuration for classification tables and termination timing.
//!
//! Settings are read once from `~/.portsweep/config.json` and never written
//! back. A missing file means defaults; missing keys take their defaults too.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::{
    Classifier, PortRange, COMMAND_MAX_LENGTH, DEFAULT_DEV_PORT_RANGES,
    DEFAULT_PROTECTED_PROCESSES,
};
use crate::error::{Error, Result};

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Process-name substrings that mark a process as protected.
    #[serde(default = "default_protected_processes", rename = "protectedProcesses")]
    pub protected_processes: Vec<String>,

    /// Inclusive port ranges treated as development ports.
    #[serde(default = "default_dev_port_ranges", rename = "devPortRanges")]
    pub dev_port_ranges: Vec<PortRange>,

    /// How long to wait for a process to exit after a signal.
    #[serde(default = "default_grace_period_ms", rename = "gracePeriodMs")]
    pub grace_period_ms: u64,

    /// How often to check whether a signalled process has exited.
    #[serde(default = "default_poll_interval_ms", rename = "pollIntervalMs")]
    pub poll_interval_ms: u64,

    /// Maximum length of a finding's command line, in characters.
    #[serde(default = "default_command_max_length", rename = "commandMaxLength")]
    pub command_max_length: usize,
}

fn default_protected_processes() -> Vec<String> {
    DEFAULT_PROTECTED_PROCESSES.iter().map(|s| s.to_string()).collect()
}

fn default_dev_port_ranges() -> Vec<PortRange> {
    DEFAULT_DEV_PORT_RANGES.to_vec()
}

fn default_grace_period_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_command_max_length() -> usize {
    COMMAND_MAX_LENGTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            protected_processes: default_protected_processes(),
            dev_port_ranges: default_dev_port_ranges(),
            grace_period_ms: default_grace_period_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            command_max_length: default_command_max_length(),
        }
    }
}

impl Settings {
    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        for range in &self.dev_port_ranges {
            if range.start == 0 || range.start > range.end {
                return Err(Error::Config(format!(
                    "Invalid development port range {}-{}",
                    range.start, range.end
                )));
            }
        }

        if self.poll_interval_ms == 0 {
            return Err(Error::Config("pollIntervalMs must be greater than 0".to_string()));
        }

        if self.command_max_length == 0 || self.command_max_length > COMMAND_MAX_LENGTH {
            return Err(Error::Config(format!(
                "commandMaxLength must be between 1 and {}",
                COMMAND_MAX_LENGTH
            )));
        }

        Ok(())
    }

    /// Build the immutable classification tables.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(&self.protected_processes, self.dev_port_ranges.clone())
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Read-only access to the settings file.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.portsweep/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".portsweep").join("config.json");

        Ok(Self { config_path })
    }

    /// Create a config store with a custom path.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate settings from disk.
    ///
    /// Returns default settings if the file doesn't exist.
    pub async fn load(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.config_path).await?;
        let settings: Settings = serde_json::from_str(&content)?;

        settings.validate()?;
        Ok(settings)
    }
}
