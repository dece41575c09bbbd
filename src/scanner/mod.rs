//! Scanner module - coordinates reachability scans.
//!
//! The orchestrator fans a target list out across a bounded pool of tokio
//! tasks, each applying the exclusion filter and then the prober to a single
//! target. Completions are drained by a single consumer; once every task has
//! finished, the state history is updated exactly once with the full batch.

pub mod exclusion;
pub mod ping;
pub mod traits;

use crate::config::MonitorSettings;
use crate::storage::{HistoryBackend, HistoryMap, StateHistory};
use crate::types::{ScanId, Target};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

pub use exclusion::ExclusionFilter;
pub use ping::{
    system_prober, PingFamily, PingProber, UnixPing, UnixPingProber, WindowsPing,
    WindowsPingProber,
};
pub use traits::{ProbeOutcome, ProbeReason, Prober, ReplyMarker, SharedProber};

/// Result of scanning one target, merged with its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub address: String,
    pub alias: String,
    pub segment: String,
    /// Reachable at scan time. Always `false` for excluded targets.
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    pub reason: ProbeReason,
    /// Out of scope; never probed and ignored by reports.
    pub excluded: bool,
    /// Reachability differs from the previous scan.
    pub state_change: bool,
    pub scan_time: DateTime<Utc>,
}

impl ScanResult {
    /// Build the result for a probed target.
    pub fn probed(target: Target, outcome: ProbeOutcome, scan_time: DateTime<Utc>) -> Self {
        Self {
            address: target.address,
            alias: target.alias,
            segment: target.segment,
            reachable: outcome.reachable,
            latency_ms: outcome.latency_ms,
            reason: outcome.reason,
            excluded: false,
            state_change: false,
            scan_time,
        }
    }

    /// Build the result for an excluded target.
    pub fn excluded(target: Target, scan_time: DateTime<Utc>) -> Self {
        Self {
            address: target.address,
            alias: target.alias,
            segment: target.segment,
            reachable: false,
            latency_ms: None,
            reason: ProbeReason::Excluded,
            excluded: true,
            state_change: false,
            scan_time,
        }
    }
}

/// Everything a completed scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub scan_id: ScanId,
    /// One entry per target that completed. Ordered by input position, but
    /// callers should not rely on it.
    pub results: Vec<ScanResult>,
    /// Wall-clock duration of the scan, including the history update.
    pub duration: Duration,
    /// History mapping after this scan was folded in.
    pub history: HistoryMap,
}

/// Runs scans with a bounded worker pool.
pub struct ScanOrchestrator<B> {
    prober: SharedProber,
    exclusions: Arc<ExclusionFilter>,
    history: StateHistory<B>,
    workers: usize,
    progress_every: usize,
    progress_bar: Option<ProgressBar>,
}

impl<B: HistoryBackend> ScanOrchestrator<B> {
    /// Create an orchestrator using the pool width and progress batch from
    /// `settings`.
    pub fn new(
        prober: SharedProber,
        exclusions: ExclusionFilter,
        history: StateHistory<B>,
        settings: &MonitorSettings,
    ) -> Self {
        Self {
            prober,
            exclusions: Arc::new(exclusions),
            history,
            workers: settings.workers.max(1),
            progress_every: settings.progress_every.max(1),
            progress_bar: None,
        }
    }

    /// Override the worker pool width.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Tick a progress bar as targets complete.
    pub fn with_progress_bar(mut self, progress: ProgressBar) -> Self {
        self.progress_bar = Some(progress);
        self
    }

    pub fn history(&self) -> &StateHistory<B> {
        &self.history
    }

    /// Scan every target and fold the results into the state history.
    pub async fn scan(&self, targets: Vec<Target>) -> ScanOutcome {
        let scan_id = ScanId::new();
        let start = Instant::now();
        let total = targets.len();

        let tag = scan_id.short();

        info!(%scan_id, scan = %tag, total, workers = self.workers, "starting scan");

        let mut slots: Vec<Option<ScanResult>> = (0..total).map(|_| None).collect();

        // Tasks are spawned lazily, so at most `workers` are in flight.
        let mut completions = stream::iter(targets.into_iter().enumerate())
            .map(|(index, target)| {
                let prober = Arc::clone(&self.prober);
                let exclusions = Arc::clone(&self.exclusions);
                let address = target.address.clone();
                let task = tokio::spawn(scan_target(prober, exclusions, target));
                async move { (index, address, task.await) }
            })
            .buffer_unordered(self.workers);

        let mut completed = 0usize;
        while let Some((index, address, joined)) = completions.next().await {
            completed += 1;

            match joined {
                Ok(result) => slots[index] = Some(result),
                Err(e) => {
                    error!(scan = %tag, address = %address, error = %e, "worker failed, target omitted")
                }
            }

            if let Some(pb) = &self.progress_bar {
                pb.inc(1);
            }
            if completed % self.progress_every == 0 {
                info!(scan = %tag, completed, total, "scan progress");
            }
        }
        drop(completions);

        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }

        let mut results: Vec<ScanResult> = slots.into_iter().flatten().collect();

        let update = self.history.record(&results, Utc::now());
        for result in &mut results {
            result.state_change = update.transitions.contains(&result.address);
        }

        let duration = start.elapsed();
        info!(
            scan = %tag,
            results = results.len(),
            transitions = update.transitions.len(),
            elapsed_ms = duration.as_millis() as u64,
            "scan complete"
        );

        ScanOutcome {
            scan_id,
            results,
            duration,
            history: update.records,
        }
    }
}

/// Exclusion check then probe, for one target.
async fn scan_target(
    prober: SharedProber,
    exclusions: Arc<ExclusionFilter>,
    target: Target,
) -> ScanResult {
    if exclusions.is_excluded(&target.address) {
        return ScanResult::excluded(target, Utc::now());
    }

    let outcome = prober.probe(&target.address).await;
    ScanResult::probed(target, outcome, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use async_trait::async_trait;

    struct EvenUp;

    #[async_trait]
    impl Prober for EvenUp {
        async fn probe(&self, address: &str) -> ProbeOutcome {
            let last: u32 = address.rsplit('.').next().unwrap().parse().unwrap();
            if last % 2 == 0 {
                ProbeOutcome::reachable(Some(1.0), ReplyMarker::BytesFrom)
            } else {
                ProbeOutcome::unreachable(ProbeReason::Failed { exit_code: Some(1) })
            }
        }
    }

    fn orchestrator() -> ScanOrchestrator<MemoryBackend> {
        ScanOrchestrator::new(
            Arc::new(EvenUp),
            ExclusionFilter::from_settings(&MonitorSettings::default()),
            StateHistory::new(MemoryBackend::new()),
            &MonitorSettings::default(),
        )
        .with_workers(4)
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let targets: Vec<Target> = (1..=20)
            .map(|i| Target::new(format!("10.2.0.{}", i), format!("S{}", i), "Z").unwrap())
            .collect();

        let outcome = orchestrator().scan(targets.clone()).await;
        let addresses: Vec<_> = outcome.results.iter().map(|r| r.address.clone()).collect();
        let expected: Vec<_> = targets.into_iter().map(|t| t.address).collect();
        assert_eq!(addresses, expected);
    }

    #[tokio::test]
    async fn test_first_scan_has_no_state_changes() {
        let targets = vec![
            Target::new("10.2.0.1", "A", "Z").unwrap(),
            Target::new("10.2.0.2", "B", "Z").unwrap(),
        ];

        let outcome = orchestrator().scan(targets).await;
        assert!(outcome.results.iter().all(|r| !r.state_change));
        assert_eq!(outcome.history.len(), 2);
    }

    #[tokio::test]
    async fn test_excluded_target_is_not_recorded_in_history() {
        let targets = vec![
            Target::new("127.0.0.1", "Loop", "Z").unwrap(),
            Target::new("10.2.0.2", "B", "Z").unwrap(),
        ];

        let outcome = orchestrator().scan(targets).await;
        let excluded = &outcome.results[0];
        assert!(excluded.excluded);
        assert!(!excluded.reachable);
        assert_eq!(excluded.reason, ProbeReason::Excluded);
        assert!(!outcome.history.contains_key("127.0.0.1"));
    }
}
