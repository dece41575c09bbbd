//! Per-address state history.
//!
//! The history remembers the last known state of every address across scan
//! runs and counts how often it flipped. It is read once and written once per
//! scan, after all probes have finished, so there is never more than one
//! writer. History I/O problems are logged and swallowed: a scan report is
//! always produced even when the history cannot be read or saved.

use crate::error::{StorageError, StorageResult};
use crate::scanner::ScanResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Persisted state of one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub alias: String,
    pub segment: String,
    /// First scan that included this address.
    pub first_seen: DateTime<Utc>,
    /// Reachability at the most recent scan; `None` until first observed.
    #[serde(default)]
    pub last_state: Option<bool>,
    #[serde(default)]
    pub last_scan: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_seen_active: Option<DateTime<Utc>>,
    /// Start of the current reachable streak. Cleared while unreachable.
    #[serde(default)]
    pub active_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_state_change: Option<DateTime<Utc>>,
    /// Number of observed flips of `last_state`.
    #[serde(default)]
    pub state_changes: u64,
}

impl HistoryRecord {
    fn new(alias: &str, segment: &str, now: DateTime<Utc>) -> Self {
        Self {
            alias: alias.to_string(),
            segment: segment.to_string(),
            first_seen: now,
            last_state: None,
            last_scan: None,
            last_seen_active: None,
            active_since: None,
            last_state_change: None,
            state_changes: 0,
        }
    }

    /// Fold one observation into the record. Returns `true` on a flip.
    fn observe(&mut self, reachable: bool, now: DateTime<Utc>) -> bool {
        let previous = self.last_state.replace(reachable);
        let flipped = matches!(previous, Some(p) if p != reachable);

        self.last_scan = Some(now);

        if flipped {
            self.state_changes += 1;
            self.last_state_change = Some(now);
        }

        if reachable {
            self.last_seen_active = Some(now);
            if flipped || self.active_since.is_none() {
                self.active_since = Some(now);
            }
        } else {
            self.active_since = None;
        }

        flipped
    }
}

/// Address → record, ordered for stable files and listings.
pub type HistoryMap = BTreeMap<String, HistoryRecord>;

/// Outcome of folding a scan into the history.
#[derive(Debug, Clone, Default)]
pub struct HistoryUpdate {
    /// The full mapping after the update.
    pub records: HistoryMap,
    /// Addresses whose state flipped in this scan.
    pub transitions: BTreeSet<String>,
}

/// Durable storage for the history mapping.
pub trait HistoryBackend: Send + Sync {
    /// Read the whole mapping. A missing store yields an empty map.
    fn load(&self) -> StorageResult<HistoryMap>;

    /// Replace the stored mapping.
    fn save(&self, records: &HistoryMap) -> StorageResult<()>;
}

impl<T: HistoryBackend + ?Sized> HistoryBackend for Box<T> {
    fn load(&self) -> StorageResult<HistoryMap> {
        (**self).load()
    }

    fn save(&self, records: &HistoryMap) -> StorageResult<()> {
        (**self).save(records)
    }
}

/// JSON file storage.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryBackend for JsonFileBackend {
    fn load(&self) -> StorageResult<HistoryMap> {
        if !self.path.exists() {
            return Ok(HistoryMap::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| StorageError::LoadFailed(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| StorageError::LoadFailed(e.to_string()))
    }

    fn save(&self, records: &HistoryMap) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::SaveFailed(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content).map_err(|e| StorageError::SaveFailed(e.to_string()))
    }
}

/// In-memory storage for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<HistoryMap>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing mapping.
    pub fn with_records(records: HistoryMap) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every `load` fail.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every `save` fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Snapshot of what is currently stored.
    pub fn snapshot(&self) -> HistoryMap {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl HistoryBackend for MemoryBackend {
    fn load(&self) -> StorageResult<HistoryMap> {
        if self.fail_reads {
            return Err(StorageError::LoadFailed("memory backend read failure".into()));
        }
        Ok(self.snapshot())
    }

    fn save(&self, records: &HistoryMap) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::SaveFailed("memory backend write failure".into()));
        }
        *self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = records.clone();
        Ok(())
    }
}

/// Read-modify-write authority over the history.
#[derive(Debug)]
pub struct StateHistory<B> {
    backend: B,
}

impl<B: HistoryBackend> StateHistory<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the stored mapping, or an empty one if it cannot be read.
    pub fn load(&self) -> HistoryMap {
        self.backend.load().unwrap_or_else(|e| {
            warn!(error = %e, "state history unreadable, starting empty");
            HistoryMap::new()
        })
    }

    /// Fold a completed scan into the history, stamped with the current time.
    pub fn update(&self, results: &[ScanResult]) -> HistoryMap {
        self.record(results, Utc::now()).records
    }

    /// Fold a completed scan into the history at `now`.
    pub fn record(&self, results: &[ScanResult], now: DateTime<Utc>) -> HistoryUpdate {
        let mut records = self.load();
        let mut transitions = BTreeSet::new();

        for result in results.iter().filter(|r| !r.excluded) {
            let record = records
                .entry(result.address.clone())
                .or_insert_with(|| HistoryRecord::new(&result.alias, &result.segment, now));

            record.alias.clone_from(&result.alias);
            record.segment.clone_from(&result.segment);

            if record.observe(result.reachable, now) {
                transitions.insert(result.address.clone());
            }
        }

        match self.backend.save(&records) {
            Ok(()) => debug!(
                addresses = records.len(),
                transitions = transitions.len(),
                "state history saved"
            ),
            Err(e) => warn!(error = %e, "failed to save state history"),
        }

        HistoryUpdate {
            records,
            transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_observation_is_not_a_flip() {
        let mut record = HistoryRecord::new("A", "Z1", at(1));
        assert!(!record.observe(false, at(1)));
        assert_eq!(record.state_changes, 0);
        assert_eq!(record.last_state, Some(false));
        assert_eq!(record.active_since, None);
    }

    #[test]
    fn test_first_reachable_sets_active_since() {
        let mut record = HistoryRecord::new("A", "Z1", at(1));
        record.observe(true, at(1));
        assert_eq!(record.active_since, Some(at(1)));
        assert_eq!(record.last_seen_active, Some(at(1)));
    }

    #[test]
    fn test_streak_keeps_active_since() {
        let mut record = HistoryRecord::new("A", "Z1", at(1));
        record.observe(true, at(1));
        record.observe(true, at(2));
        assert_eq!(record.active_since, Some(at(1)));
        assert_eq!(record.last_seen_active, Some(at(2)));
        assert_eq!(record.last_scan, Some(at(2)));
    }

    #[test]
    fn test_flip_down_clears_active_since() {
        let mut record = HistoryRecord::new("A", "Z1", at(1));
        record.observe(true, at(1));
        assert!(record.observe(false, at(2)));
        assert_eq!(record.state_changes, 1);
        assert_eq!(record.last_state_change, Some(at(2)));
        assert_eq!(record.active_since, None);
        assert_eq!(record.last_seen_active, Some(at(1)));
    }

    #[test]
    fn test_json_backend_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("none.json"));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_backend_persists() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("history.json"));

        let mut records = HistoryMap::new();
        let mut record = HistoryRecord::new("A", "Z1", at(1));
        record.observe(true, at(1));
        records.insert("10.1.1.1".into(), record);

        backend.save(&records).unwrap();
        assert_eq!(backend.load().unwrap(), records);
    }

    #[test]
    fn test_json_backend_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let backend = JsonFileBackend::new(blocker.join("history.json"));
        assert!(matches!(
            backend.save(&HistoryMap::new()),
            Err(StorageError::SaveFailed(_))
        ));
    }

    #[test]
    fn test_json_backend_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(backend.load(), Err(StorageError::LoadFailed(_))));

        let history = StateHistory::new(backend);
        assert!(history.load().is_empty());
    }
}
