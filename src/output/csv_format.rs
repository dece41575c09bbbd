//! CSV output formatting.

use crate::scanner::ScanResult;
use crate::storage::HistoryMap;
use chrono::{DateTime, Utc};
use std::io;

/// Print per-target scan results in CSV format.
pub fn print_scan_csv(results: &[ScanResult]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    wtr.write_record([
        "address",
        "alias",
        "segment",
        "reachable",
        "latency_ms",
        "reason",
        "excluded",
        "state_change",
        "scan_time",
    ])?;

    for r in results {
        let latency = r.latency_ms.map(|l| l.to_string()).unwrap_or_default();
        let reason = r.reason.to_string();
        let scan_time = r.scan_time.to_rfc3339();
        wtr.write_record([
            r.address.as_str(),
            r.alias.as_str(),
            r.segment.as_str(),
            if r.reachable { "true" } else { "false" },
            latency.as_str(),
            reason.as_str(),
            if r.excluded { "true" } else { "false" },
            if r.state_change { "true" } else { "false" },
            scan_time.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print the state history in CSV format.
pub fn print_history_csv(records: &HistoryMap) -> io::Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    wtr.write_record([
        "address",
        "alias",
        "segment",
        "last_state",
        "state_changes",
        "first_seen",
        "last_scan",
        "active_since",
        "last_state_change",
    ])?;

    for (address, record) in records {
        let changes = record.state_changes.to_string();
        let first_seen = record.first_seen.to_rfc3339();
        let last_scan = timestamp(record.last_scan);
        let active_since = timestamp(record.active_since);
        let last_change = timestamp(record.last_state_change);
        wtr.write_record([
            address.as_str(),
            record.alias.as_str(),
            record.segment.as_str(),
            match record.last_state {
                Some(true) => "up",
                Some(false) => "down",
                None => "",
            },
            changes.as_str(),
            first_seen.as_str(),
            last_scan.as_str(),
            active_since.as_str(),
            last_change.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn timestamp(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.to_rfc3339()).unwrap_or_default()
}
