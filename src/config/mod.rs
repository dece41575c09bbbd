//! Configuration management for vigil.
//!
//! Provides XDG-compliant paths and the settings consumed by the scanner,
//! the history store and the report.

mod settings;

pub use settings::{MonitorSettings, Paths, ProbeSettings, HISTORY_FILE_NAME};
