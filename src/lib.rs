//! # Vigil - Fleet Reachability Monitor
//!
//! Vigil probes a fleet of network endpoints (point-of-sale terminals and
//! similar devices) with the system `ping`, remembers how each address
//! behaved across runs, and produces a short availability report meant to be
//! pasted into a chat channel.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: A fixed-width worker pool probes hundreds of targets
//! - **Retries with Backoff**: Each target gets several attempts with a hard timeout
//! - **Exclusions**: Placeholder and reserved addresses are never probed
//! - **State History**: Per-address flip counts and streaks persisted as JSON
//! - **Scoped Reports**: Restrict a run to one zone or segment
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use vigil::config::MonitorSettings;
//! use vigil::report::build_report;
//! use vigil::scanner::{system_prober, ExclusionFilter, ScanOrchestrator};
//! use vigil::storage::{MemoryBackend, StateHistory};
//! use vigil::types::Target;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = MonitorSettings::default();
//!     let orchestrator = ScanOrchestrator::new(
//!         system_prober(settings.probe_settings()),
//!         ExclusionFilter::from_settings(&settings),
//!         StateHistory::new(MemoryBackend::new()),
//!         &settings,
//!     );
//!
//!     let targets = vec![Target::new("192.168.1.20", "Till 4", "Z1").unwrap()];
//!     let outcome = orchestrator.scan(targets).await;
//!
//!     println!("{}", build_report(&outcome.results, outcome.duration, None).text);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Core type definitions (targets, scan identifiers)
//! - [`scanner`] - The `Prober` trait, the ping prober, exclusions and the orchestrator
//! - [`storage`] - Per-address state history
//! - [`report`] - Availability counters and the chat-ready report
//! - [`source`] - Target loading and scope filtering
//! - [`config`] - Settings and well-known paths
//! - [`host`] - Facts about the monitoring host itself
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod output;
pub mod report;
pub mod scanner;
pub mod source;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, SourceError, StorageError};
pub use report::{build_report, Report, ReportCounters};
pub use scanner::{ProbeOutcome, ProbeReason, Prober, ScanOrchestrator, ScanResult};
pub use storage::{HistoryRecord, StateHistory};
pub use types::{ScanId, Target};
