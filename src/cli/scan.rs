//! Scan subcommand implementation.
//!
//! Handles `vigil scan`: load targets, probe them, update the history and
//! print the report.

use crate::cli::{Cli, OutputFormat};
use crate::config::MonitorSettings;
use crate::error::{CliResult, SourceError};
use crate::output;
use crate::report::{build_report_with, ReportOptions};
use crate::scanner::{system_prober, ExclusionFilter, ScanOrchestrator};
use crate::source::{CsvTargetSource, TargetSource};
use crate::storage::{HistoryBackend, JsonFileBackend, MemoryBackend, StateHistory};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

/// Probe all targets and print the availability report.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Only scan targets whose segment names this scope (e.g. a zone)
    #[arg(short = 'z', long, value_name = "SCOPE")]
    pub scope: Option<String>,

    /// CSV file with ip, alias and segment columns
    #[arg(short = 'T', long, env = "VIGIL_TARGETS", value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Shorthand for `--output json`
    #[arg(long)]
    pub json: bool,

    /// Worker pool width
    #[arg(short = 'w', long, env = "VIGIL_MAX_WORKERS")]
    pub max_workers: Option<usize>,

    /// Probe attempts per target
    #[arg(short = 'r', long, env = "VIGIL_RETRIES")]
    pub retries: Option<u32>,

    /// Ping timeout per attempt in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// State history file (defaults to the data directory)
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Do not read or write the state history file
    #[arg(long)]
    pub no_history: bool,
}

impl ScanCommand {
    /// Effective output format.
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    fn scope(&self) -> Option<&str> {
        self.scope.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Fold command-line overrides into the loaded settings.
    fn apply_overrides(&self, settings: &mut MonitorSettings) -> CliResult<()> {
        if let Some(workers) = self.max_workers {
            settings.workers = workers;
        }
        if let Some(retries) = self.retries {
            settings.retries = retries;
        }
        if let Some(timeout) = self.timeout {
            settings.attempt_timeout_ms = timeout;
        }
        if let Some(targets) = &self.targets {
            settings.targets_file = Some(targets.clone());
        }
        if let Some(history) = &self.history {
            settings.history_file = Some(history.clone());
        }
        settings.validate()?;
        Ok(())
    }

    /// Execute the scan command.
    pub async fn execute(&self, cli: &Cli) -> CliResult<()> {
        let (paths, mut settings) = cli.settings()?;
        self.apply_overrides(&mut settings)?;

        let format = self.format();
        let scope = self.scope();

        let targets_file = settings
            .targets_file
            .clone()
            .ok_or(SourceError::NotConfigured)?;
        let targets = CsvTargetSource::new(targets_file)
            .load_targets(scope)
            .await?;

        let backend: Box<dyn HistoryBackend> = if self.no_history {
            Box::new(MemoryBackend::new())
        } else {
            let path = settings.history_path(&paths);
            info!(path = %path.display(), "using state history");
            Box::new(JsonFileBackend::new(path))
        };

        let interactive = format == OutputFormat::Plain && !cli.quiet;
        if interactive {
            output::print_scan_header(targets.len(), scope, settings.workers);
            if self.no_history {
                output::print_info("State history disabled for this run");
            }
        }

        let mut orchestrator = ScanOrchestrator::new(
            system_prober(settings.probe_settings()),
            ExclusionFilter::from_settings(&settings),
            StateHistory::new(backend),
            &settings,
        );
        if interactive && cli.verbose {
            orchestrator = orchestrator.with_progress_bar(progress_bar(targets.len()));
        }

        let outcome = orchestrator.scan(targets).await;

        let options = ReportOptions::new(&settings.report_title);
        let report = build_report_with(&outcome.results, outcome.duration, scope, &options);

        match format {
            OutputFormat::Plain => output::print_report(&report.text)?,
            OutputFormat::Json => {
                output::print_envelope(&output::Envelope::success(&outcome, &report))?
            }
            OutputFormat::Csv => output::print_scan_csv(&outcome.results)?,
        }

        Ok(())
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> ScanCommand {
        let mut argv = vec!["scan"];
        argv.extend_from_slice(args);
        ScanCommand::parse_from(argv)
    }

    #[test]
    fn test_overrides_applied() {
        let cmd = command(&["-w", "8", "-r", "1", "-t", "900", "--targets", "fleet.csv"]);
        let mut settings = MonitorSettings::default();
        cmd.apply_overrides(&mut settings).unwrap();

        assert_eq!(settings.workers, 8);
        assert_eq!(settings.retries, 1);
        assert_eq!(settings.attempt_timeout_ms, 900);
        assert_eq!(settings.targets_file, Some(PathBuf::from("fleet.csv")));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cmd = command(&["--max-workers", "0"]);
        let mut settings = MonitorSettings::default();
        assert!(cmd.apply_overrides(&mut settings).is_err());
    }

    #[test]
    fn test_blank_scope_is_none() {
        assert_eq!(command(&["--scope", "  "]).scope(), None);
        assert_eq!(command(&["--scope", " Z1 "]).scope(), Some("Z1"));
    }
}
