//! History subcommand implementation.

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;
use crate::storage::{HistoryMap, JsonFileBackend, StateHistory};
use clap::Parser;
use std::path::PathBuf;

/// Show the persisted state history.
#[derive(Parser, Debug)]
pub struct HistoryCommand {
    /// Only show this address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Only show addresses that are currently down
    #[arg(long)]
    pub down: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Shorthand for `--output json`
    #[arg(long)]
    pub json: bool,

    /// State history file (defaults to the data directory)
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,
}

impl HistoryCommand {
    /// Effective output format.
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Execute the history command.
    pub fn execute(&self, cli: &Cli) -> CliResult<()> {
        let (paths, settings) = cli.settings()?;
        let path = self
            .history
            .clone()
            .unwrap_or_else(|| settings.history_path(&paths));

        let records = self.select(StateHistory::new(JsonFileBackend::new(path)).load())?;

        let format = self.format();
        if records.is_empty() && format != OutputFormat::Plain && !cli.quiet {
            output::print_warning("No state history recorded yet");
        }

        match format {
            OutputFormat::Plain => output::print_history(&records)?,
            OutputFormat::Json => output::print_json(&records)?,
            OutputFormat::Csv => output::print_history_csv(&records)?,
        }

        Ok(())
    }

    fn select(&self, mut records: HistoryMap) -> CliResult<HistoryMap> {
        if let Some(address) = &self.address {
            let record = records
                .remove(address)
                .ok_or_else(|| CliError::Other(format!("no history for address {}", address)))?;
            records = HistoryMap::from([(address.clone(), record)]);
        }

        if self.down {
            records.retain(|_, r| r.last_state == Some(false));
        }

        Ok(records)
    }
}
