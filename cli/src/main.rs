//! PortSweep CLI - Find and stop processes on listening ports
//!
//! A command-line tool for listing listening ports, spotting development
//! servers, and terminating the processes behind them.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "portsweep")]
#[command(author, version, about = "Find and stop processes on listening ports")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Read settings from this file instead of ~/.portsweep/config.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log what the core is doing
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all listening ports
    #[command(alias = "ls")]
    List {
        /// Only show ports whose process, port, PID or command matches
        #[arg(long)]
        filter: Option<String>,
    },

    /// List development ports only
    ListDev,

    /// Kill process on a port
    Kill {
        /// Port number to kill
        port: u16,

        /// Force kill (SIGKILL) without graceful shutdown
        #[arg(short, long)]
        force: bool,

        /// Skip confirmation for protected processes
        #[arg(short, long)]
        yes: bool,
    },

    /// Kill every unprotected process on a development port
    KillDev {
        /// Force kill (SIGKILL) without graceful shutdown
        #[arg(short, long)]
        force: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show details for a port
    Info {
        /// Port number to inspect
        port: u16,
    },

    /// Show current configuration
    Config,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "portsweep_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = cli.config.as_deref();
    let ok = match command {
        Commands::List { filter } => commands::list::run(config, filter, cli.json)?,
        Commands::ListDev => commands::list_dev::run(config, cli.json)?,
        Commands::Kill { port, force, yes } => commands::kill::run(config, port, force, yes)?,
        Commands::KillDev { force, yes } => commands::kill_dev::run(config, force, yes)?,
        Commands::Info { port } => commands::info::run(config, port, cli.json)?,
        Commands::Config => commands::config::show(config, cli.json)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
