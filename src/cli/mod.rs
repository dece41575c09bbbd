//! CLI subcommand definitions and handlers.
//!
//! - `vigil scan` - Probe the fleet and print the availability report
//! - `vigil history` - Show the persisted per-address state history
//! - `vigil uptime` - Report the monitoring host's boot time

mod history;
mod scan;
mod uptime;

pub use history::HistoryCommand;
pub use scan::ScanCommand;
pub use uptime::UptimeCommand;

use crate::config::{MonitorSettings, Paths};
use crate::error::CliResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vigil - reachability monitor for point-of-sale fleets.
///
/// Probes every target with the system ping, keeps a per-address history of
/// state changes and prints an availability report suitable for chat.
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fleet reachability monitor", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to custom settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe all targets and print the availability report
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Show the state history
    #[command(alias = "h")]
    History(HistoryCommand),

    /// Print the host boot time as JSON
    Uptime(UptimeCommand),
}

impl Cli {
    /// Whether fatal errors must be reported as a JSON envelope.
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Commands::Scan(cmd) => cmd.format() == OutputFormat::Json,
            Commands::History(cmd) => cmd.format() == OutputFormat::Json,
            Commands::Uptime(_) => false,
        }
    }

    /// Dispatch to the selected subcommand.
    pub async fn run(&self) -> CliResult<()> {
        match &self.command {
            Commands::Scan(cmd) => cmd.execute(self).await,
            Commands::History(cmd) => cmd.execute(self),
            Commands::Uptime(cmd) => cmd.execute().await,
        }
    }

    /// Resolve paths and settings, honoring `--config`.
    pub fn settings(&self) -> CliResult<(Paths, MonitorSettings)> {
        let paths = Paths::discover()?;
        let settings = match &self.config {
            Some(path) => MonitorSettings::load_from(path)?,
            None => MonitorSettings::load(&paths)?,
        };
        Ok((paths, settings))
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
