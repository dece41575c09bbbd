//! JSON output formatting.
//!
//! The scan envelope is printed on a single line so a calling process can
//! parse stdout directly.

use crate::report::{Report, ReportCounters};
use crate::scanner::ScanOutcome;
use crate::types::ScanId;
use serde::Serialize;
use std::io;

/// Structured result of a `scan` run.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<ScanId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<ReportCounters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Envelope<'a> {
    /// Envelope for a completed scan.
    pub fn success(outcome: &ScanOutcome, report: &'a Report) -> Self {
        Self {
            ok: true,
            scan_id: Some(outcome.scan_id),
            report: Some(&report.text),
            summary: Some(format!(
                "Scanned {} targets in {:.1}s.",
                outcome.results.len(),
                outcome.duration.as_secs_f64()
            )),
            counters: Some(report.counters),
            error: None,
        }
    }

    /// Envelope for a fatal error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            scan_id: None,
            report: None,
            summary: None,
            counters: None,
            error: Some(message.into()),
        }
    }
}

/// Print the envelope as one line of JSON.
pub fn print_envelope(envelope: &Envelope<'_>) -> io::Result<()> {
    let json = serde_json::to_string(envelope).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_failure_envelope_shape() {
        let json = serde_json::to_value(Envelope::failure("no targets found for scope 'Z9'")).unwrap();
        assert_eq!(json["ok"], Value::Bool(false));
        assert_eq!(json["error"], "no targets found for scope 'Z9'");
        assert!(json.get("report").is_none());
        assert!(json.get("counters").is_none());
    }
}
