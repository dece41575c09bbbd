//! Availability report.
//!
//! Turns a completed scan into summary counters and the text report that is
//! printed or handed to a messaging collaborator. Offline targets are listed
//! by alias only; addresses never appear in the report text.

use crate::scanner::ScanResult;
use crate::source::normalize_label;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

const RULE: &str = "─────────────────────";

/// Counts over the non-excluded results of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportCounters {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// `active / total × 100`, or 0 when nothing was scanned.
    pub availability_pct: f64,
}

impl ReportCounters {
    /// Count reachable and unreachable targets, ignoring excluded ones.
    pub fn from_results(results: &[ScanResult]) -> Self {
        let (total, active) = results
            .iter()
            .filter(|r| !r.excluded)
            .fold((0usize, 0usize), |(total, active), r| {
                (total + 1, active + usize::from(r.reachable))
            });

        let availability_pct = if total == 0 {
            0.0
        } else {
            active as f64 / total as f64 * 100.0
        };

        Self {
            total,
            active,
            inactive: total - active,
            availability_pct,
        }
    }

    pub fn tier(&self) -> AvailabilityTier {
        AvailabilityTier::from_pct(self.availability_pct)
    }
}

/// Display classification of an availability percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityTier {
    /// 95% and above.
    Healthy,
    /// 90% to below 95%.
    Warning,
    /// 85% to below 90%.
    Degraded,
    /// Below 85%.
    Critical,
}

impl AvailabilityTier {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 95.0 {
            Self::Healthy
        } else if pct >= 90.0 {
            Self::Warning
        } else if pct >= 85.0 {
            Self::Degraded
        } else {
            Self::Critical
        }
    }

    /// Status marker shown next to the availability line.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Healthy => "🟢",
            Self::Warning => "🟡",
            Self::Degraded => "🟠",
            Self::Critical => "🔴",
        }
    }
}

impl fmt::Display for AvailabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Degraded => write!(f, "degraded"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Presentation options for the report header.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Business name shown under the heading.
    pub title: String,
    /// Timestamp printed in the header.
    pub generated_at: DateTime<Local>,
}

impl ReportOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated_at: Local::now(),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new("Fleet Monitor")
    }
}

/// A rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub text: String,
    pub counters: ReportCounters,
}

/// Build a report with default options.
pub fn build_report(results: &[ScanResult], duration: Duration, scope: Option<&str>) -> Report {
    build_report_with(results, duration, scope, &ReportOptions::default())
}

/// Build a report.
///
/// Without a scope, offline targets are grouped under their segment, groups
/// in order of first appearance and aliases sorted within each group. With a
/// scope, they are listed flat, sorted by alias.
pub fn build_report_with(
    results: &[ScanResult],
    duration: Duration,
    scope: Option<&str>,
    options: &ReportOptions,
) -> Report {
    let scope = scope.map(str::trim).filter(|s| !s.is_empty());
    let counters = ReportCounters::from_results(results);
    let scope_title = scope
        .map(normalize_label)
        .unwrap_or_else(|| "GENERAL".to_string());

    let mut lines = vec![
        "📊 *STATUS REPORT*".to_string(),
        format!("🏢 *{}*", options.title),
        format!("📍 Scope: *{}*", scope_title),
        format!("📅 {}", options.generated_at.format("%d/%m/%Y %I:%M %p")),
        RULE.to_string(),
        format!(
            "{} *Availability:* {:.1}%",
            counters.tier().marker(),
            counters.availability_pct
        ),
        format!("📡 *Total Targets:* {}", counters.total),
        format!("🟢 *Online:* {}", counters.active),
        format!("🔴 *Offline:* {}", counters.inactive),
        format!("⏱ *Scan Time:* {:.1}s", duration.as_secs_f64()),
        RULE.to_string(),
        String::new(),
    ];

    let offline: Vec<&ScanResult> = results
        .iter()
        .filter(|r| !r.excluded && !r.reachable)
        .collect();

    if offline.is_empty() {
        lines.push("✅ *All targets are operational.*".to_string());
    } else {
        lines.push("❌ *OFFLINE TARGETS:*".to_string());

        if scope.is_none() {
            for (segment, aliases) in group_by_segment(&offline) {
                lines.push(String::new());
                lines.push(format!("📂 *{}*", segment));
                lines.extend(aliases.into_iter().map(|alias| format!("   • {}", alias)));
            }
        } else {
            let mut aliases: Vec<&str> = offline.iter().map(|r| r.alias.as_str()).collect();
            aliases.sort_unstable();
            lines.push(String::new());
            lines.extend(aliases.into_iter().map(|alias| format!("• {}", alias)));
        }
    }

    Report {
        text: lines.join("\n"),
        counters,
    }
}

/// Group aliases by segment, keeping segments in first-seen order.
fn group_by_segment<'a>(offline: &[&'a ScanResult]) -> Vec<(&'a str, Vec<&'a str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();

    for &result in offline {
        match groups.iter_mut().find(|(seg, _)| *seg == result.segment) {
            Some((_, aliases)) => aliases.push(result.alias.as_str()),
            None => groups.push((result.segment.as_str(), vec![result.alias.as_str()])),
        }
    }

    for (_, aliases) in &mut groups {
        aliases.sort_unstable();
    }
    groups
}
