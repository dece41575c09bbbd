//! Plain text output formatting.
//!
//! The scan report itself is plain text meant for chat, so it is printed
//! unstyled. Everything else uses terminal styling.

use crate::storage::{HistoryMap, HistoryRecord};
use chrono::{DateTime, Local, Utc};
use console::{style, Style};
use std::io::{self, Write};

/// Print a finished report.
pub fn print_report(text: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", text)?;
    out.flush()
}

/// Print the state history as a table.
pub fn print_history(records: &HistoryMap) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if records.is_empty() {
        writeln!(out, "  {}", style("No history recorded yet.").dim())?;
        return Ok(());
    }

    writeln!(
        out,
        "  {}",
        style("───────────────────────────────────────────────────────────────────────────────")
            .dim()
    )?;
    writeln!(
        out,
        "  {:<15}  {:<22}  {:<12}  {:^7}  {:>7}  {}",
        style("ADDRESS").bold(),
        style("ALIAS").bold(),
        style("SEGMENT").bold(),
        style("STATE").bold(),
        style("CHANGES").bold(),
        style("SINCE").bold()
    )?;
    writeln!(
        out,
        "  {}",
        style("───────────────────────────────────────────────────────────────────────────────")
            .dim()
    )?;

    for (address, record) in records {
        let (label, state_style) = state_label(record);
        let since = record
            .active_since
            .or(record.last_state_change)
            .map(local_time)
            .unwrap_or_else(|| "-".to_string());

        writeln!(
            out,
            "  {:<15}  {:<22}  {:<12}  {:^7}  {:>7}  {}",
            address,
            truncate_string(&record.alias, 22),
            truncate_string(&record.segment, 12),
            state_style.apply_to(label),
            record.state_changes,
            style(since).dim()
        )?;
    }

    writeln!(out)?;
    Ok(())
}

fn state_label(record: &HistoryRecord) -> (&'static str, Style) {
    match record.last_state {
        Some(true) => ("up", Style::new().green().bold()),
        Some(false) => ("down", Style::new().red()),
        None => ("?", Style::new().yellow()),
    }
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(targets: usize, scope: Option<&str>, workers: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("vigil").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Scope: {}",
        style("•").dim(),
        style(scope.unwrap_or("all")).yellow()
    );
    eprintln!(
        "{} Probing {} targets with {} workers...",
        style("•").dim(),
        style(targets).white().bold(),
        workers
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum number of characters, adding an ellipsis.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("Panadería Ñu", 8), "Panad...");
    }
}
