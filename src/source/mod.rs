//! Target sources.
//!
//! The scanner does not care where targets come from; a [`TargetSource`]
//! hands over a validated list, optionally restricted to a scope. A source
//! that yields nothing is an error: reporting on zero intended targets would
//! be misleading.

mod scope;

pub use scope::{matches_scope, normalize_label};

use crate::error::{SourceError, SourceResult};
use crate::types::Target;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Supplies the targets for a run.
#[async_trait]
pub trait TargetSource: Send + Sync {
    /// Load targets, restricted to `scope` when one is given.
    async fn load_targets(&self, scope: Option<&str>) -> SourceResult<Vec<Target>>;
}

/// Apply a scope to a freshly loaded target list.
///
/// Fails with [`SourceError::Empty`] when there is nothing to filter and with
/// [`SourceError::NoMatch`] when the scope selects nothing.
pub fn apply_scope(targets: Vec<Target>, scope: Option<&str>) -> SourceResult<Vec<Target>> {
    if targets.is_empty() {
        return Err(SourceError::Empty);
    }

    let Some(scope) = scope.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(targets);
    };

    let selected: Vec<Target> = targets
        .into_iter()
        .filter(|t| matches_scope(&t.segment, scope))
        .collect();

    if selected.is_empty() {
        return Err(SourceError::NoMatch(scope.to_string()));
    }

    info!(scope, count = selected.len(), "targets selected by scope");
    Ok(selected)
}

/// A fixed, in-memory target list.
#[derive(Debug, Clone, Default)]
pub struct StaticTargetSource {
    targets: Vec<Target>,
}

impl StaticTargetSource {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

#[async_trait]
impl TargetSource for StaticTargetSource {
    async fn load_targets(&self, scope: Option<&str>) -> SourceResult<Vec<Target>> {
        apply_scope(self.targets.clone(), scope)
    }
}

/// One row of the target CSV.
#[derive(Debug, Deserialize)]
struct TargetRow {
    #[serde(alias = "address")]
    ip: String,
    #[serde(default)]
    alias: String,
    #[serde(default)]
    segment: String,
    /// Rows explicitly marked inactive are skipped.
    #[serde(default, deserialize_with = "lenient_flag")]
    active: Option<bool>,
}

/// Spreadsheet exports spell booleans many ways. Unknown spellings count as
/// unset so the row is still scanned.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "si" | "sí" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        "" => None,
        other => {
            debug!(value = other, "unrecognized active flag, treating as unset");
            None
        }
    })
}

/// Reads targets from a CSV file with `ip`, `alias` and `segment` columns.
#[derive(Debug, Clone)]
pub struct CsvTargetSource {
    path: PathBuf,
}

impl CsvTargetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, content: &str) -> SourceResult<Vec<Target>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut targets = Vec::new();
        for (line, row) in reader.deserialize::<TargetRow>().enumerate() {
            let row = row.map_err(|e| SourceError::Parse(e.to_string()))?;

            if row.active == Some(false) {
                continue;
            }

            match Target::new(&row.ip, &row.alias, &row.segment) {
                Ok(target) => targets.push(target),
                Err(e) => debug!(row = line + 1, error = %e, "skipping invalid target row"),
            }
        }

        Ok(targets)
    }
}

#[async_trait]
impl TargetSource for CsvTargetSource {
    async fn load_targets(&self, scope: Option<&str>) -> SourceResult<Vec<Target>> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| SourceError::ReadFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })?;

        let targets = self.parse(&content)?;
        info!(path = %self.path.display(), count = targets.len(), "targets loaded");

        apply_scope(targets, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ip,alias,segment,active\n\
        10.1.1.1,Shop A,Zona Norte,true\n\
        10.1.1.2,Shop B,Zona Sur,\n\
        10.1.1.3,Closed,Zona Sur,false\n\
        1.1,Broken,Zona Sur,true\n";

    #[test]
    fn test_parse_skips_inactive_and_invalid_rows() {
        let targets = CsvTargetSource::new("unused.csv").parse(SAMPLE).unwrap();
        let aliases: Vec<_> = targets.iter().map(|t| t.alias.as_str()).collect();
        assert_eq!(aliases, vec!["Shop A", "Shop B"]);
    }

    #[test]
    fn test_parse_active_flag_spellings() {
        let csv = "ip,alias,segment,active\n\
            10.1.1.1,A,Z1,TRUE\n\
            10.1.1.2,B,Z1,true\n\
            10.1.1.3,C,Z1,0\n\
            10.1.1.4,D,Z1,No\n\
            10.1.1.5,E,Z1,yes\n\
            10.1.1.6,F,Z1,maybe\n";
        let targets = CsvTargetSource::new("unused.csv").parse(csv).unwrap();
        let aliases: Vec<_> = targets.iter().map(|t| t.alias.as_str()).collect();
        assert_eq!(aliases, vec!["A", "B", "E", "F"]);
    }

    #[test]
    fn test_parse_address_column_alias() {
        let csv = "address,alias,segment\n10.9.9.9,Depot,Hub\n";
        let targets = CsvTargetSource::new("unused.csv").parse(csv).unwrap();
        assert_eq!(targets[0].address, "10.9.9.9");
    }

    #[test]
    fn test_apply_scope_empty_source() {
        assert!(matches!(apply_scope(Vec::new(), None), Err(SourceError::Empty)));
    }

    #[test]
    fn test_apply_scope_blank_is_unscoped() {
        let targets = vec![Target::new("10.1.1.1", "A", "Z1").unwrap()];
        assert_eq!(apply_scope(targets, Some("  ")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_csv_source_missing_file() {
        let source = CsvTargetSource::new("/nonexistent/targets.csv");
        assert!(matches!(
            source.load_targets(None).await,
            Err(SourceError::ReadFailed { .. })
        ));
    }
}
