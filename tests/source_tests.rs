//! Target loading and scope selection from a CSV file.

use std::io::Write;
use vigil::error::SourceError;
use vigil::source::{CsvTargetSource, StaticTargetSource, TargetSource};
use vigil::types::{Target, DEFAULT_SEGMENT};

const FLEET: &str = "ip,alias,segment\n\
    10.1.1.1,Norte 1,ZONA 1\n\
    10.1.1.2,Norte 2,Zona 1 Centro\n\
    10.1.2.1,Sur 1,ZONA 12\n\
    10.1.3.1,Unassigned,\n";

fn fleet_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FLEET.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_unscoped_load_returns_everything() {
    let file = fleet_file();
    let targets = CsvTargetSource::new(file.path()).load_targets(None).await.unwrap();

    assert_eq!(targets.len(), 4);
    assert_eq!(targets[3].segment, DEFAULT_SEGMENT);
}

#[tokio::test]
async fn test_scope_matches_whole_words_only() {
    let file = fleet_file();
    let targets = CsvTargetSource::new(file.path())
        .load_targets(Some("zona 1"))
        .await
        .unwrap();

    let aliases: Vec<_> = targets.iter().map(|t| t.alias.as_str()).collect();
    assert_eq!(aliases, vec!["Norte 1", "Norte 2"]);
}

#[tokio::test]
async fn test_unknown_scope_is_no_match() {
    let file = fleet_file();
    let err = CsvTargetSource::new(file.path())
        .load_targets(Some("Z9"))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::NoMatch(ref scope) if scope == "Z9"));
}

#[tokio::test]
async fn test_header_only_file_is_empty() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"ip,alias,segment\n").unwrap();

    let err = CsvTargetSource::new(file.path())
        .load_targets(None)
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Empty));
}

#[tokio::test]
async fn test_static_source_applies_scope() {
    let source = StaticTargetSource::new(vec![
        Target::new("10.1.1.1", "A", "Z1").unwrap(),
        Target::new("10.1.1.2", "B", "Z2").unwrap(),
    ]);

    let targets = source.load_targets(Some("Z2")).await.unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].alias, "B");
}
