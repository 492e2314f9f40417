//! CLI command implementations.

pub mod config;
pub mod info;
pub mod kill;
pub mod kill_dev;
pub mod list;
pub mod list_dev;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use portsweep_core::{ConfigStore, PortSweeper};
use tracing::debug;

/// Settings file named on the command line, or the default one.
fn open_store(config: Option<&Path>) -> Result<ConfigStore> {
    match config {
        Some(path) => Ok(ConfigStore::with_path(path.to_path_buf())),
        None => Ok(ConfigStore::new()?),
    }
}

fn sweeper(config: Option<&Path>) -> Result<PortSweeper> {
    let store = open_store(config)?;
    debug!(path = %store.path().display(), "Loading settings");
    PortSweeper::from_config(&store)
        .with_context(|| format!("Failed to load settings from {}", store.path().display()))
}

/// Ask a yes/no question on stdin. Anything but `y` means no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
