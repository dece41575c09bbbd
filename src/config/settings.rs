//! Monitor settings and paths.
//!
//! Settings live in an XDG-compliant config directory as JSON; every field has
//! a default so a missing or partial file is fine. Settings are resolved once
//! at startup and handed to constructors explicitly.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the persisted state history.
pub const HISTORY_FILE_NAME: &str = "state_history.json";

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/vigil)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/vigil)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve the platform directories. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "vigil", "vigil").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the default path of the state history file.
    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE_NAME)
    }
}

/// Monitor-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Worker pool width.
    pub workers: usize,
    /// Probe attempts per target.
    pub retries: u32,
    /// Ping timeout per attempt in milliseconds.
    pub attempt_timeout_ms: u64,
    /// Extra time granted to a ping process before it is killed.
    pub kill_grace_ms: u64,
    /// Base backoff between attempts in milliseconds.
    pub backoff_base_ms: u64,
    /// Backoff added per attempt index in milliseconds.
    pub backoff_step_ms: u64,
    /// Emit a progress line every this many completed targets.
    pub progress_every: usize,
    /// Addresses that are never probed.
    pub excluded_addresses: Vec<String>,
    /// Address prefixes that are never probed.
    pub excluded_prefixes: Vec<String>,
    /// Business name shown in the report header.
    pub report_title: String,
    /// CSV file with the target list.
    pub targets_file: Option<PathBuf>,
    /// Override for the state history location.
    pub history_file: Option<PathBuf>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            workers: 35,
            retries: 2,
            attempt_timeout_ms: 2000,
            kill_grace_ms: 3000,
            backoff_base_ms: 150,
            backoff_step_ms: 100,
            progress_every: 50,
            excluded_addresses: ["127.0.0.1", "10.0.0.1", "0.0.0.0", "255.255.255.255"]
                .into_iter()
                .map(String::from)
                .collect(),
            excluded_prefixes: Vec::new(),
            report_title: "Fleet Monitor".to_string(),
            targets_file: None,
            history_file: None,
        }
    }
}

impl MonitorSettings {
    /// Load settings from the default location, falling back to defaults when
    /// the file does not exist.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let file = paths.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        if self.retries == 0 {
            return Err(ConfigError::Invalid("retries must be at least 1".to_string()));
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "attempt_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.progress_every == 0 {
            return Err(ConfigError::Invalid(
                "progress_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the history file, preferring the configured override.
    pub fn history_path(&self, paths: &Paths) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| paths.history_file())
    }

    /// Probe timing derived from these settings.
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            retries: self.retries,
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
            kill_grace: Duration::from_millis(self.kill_grace_ms),
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_step: Duration::from_millis(self.backoff_step_ms),
        }
    }
}

/// Timing parameters for a prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Attempts per probe.
    pub retries: u32,
    /// Timeout handed to the ping command.
    pub attempt_timeout: Duration,
    /// Slack on top of `attempt_timeout` before the process is killed.
    pub kill_grace: Duration,
    pub backoff_base: Duration,
    pub backoff_step: Duration,
}

impl ProbeSettings {
    /// Hard deadline for one attempt.
    pub fn hard_timeout(&self) -> Duration {
        self.attempt_timeout + self.kill_grace
    }

    /// Pause after the failed attempt with the given zero-based index.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base + self.backoff_step * attempt
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        MonitorSettings::default().probe_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.workers, 35);
        assert_eq!(settings.retries, 2);
        assert_eq!(settings.attempt_timeout_ms, 2000);
        assert!(settings.excluded_addresses.contains(&"127.0.0.1".to_string()));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"workers": 10, "report_title": "Shops"}}"#).unwrap();

        let settings = MonitorSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.workers, 10);
        assert_eq!(settings.report_title, "Shops");
        assert_eq!(settings.retries, 2);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"workers": 0}}"#).unwrap();

        assert!(matches!(
            MonitorSettings::load_from(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unreadable_settings_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = MonitorSettings::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { ref path, .. } if path == dir.path()));
    }

    #[test]
    fn test_backoff_formula() {
        let probe = MonitorSettings::default().probe_settings();
        assert_eq!(probe.backoff(0), Duration::from_millis(150));
        assert_eq!(probe.backoff(1), Duration::from_millis(250));
        assert_eq!(probe.hard_timeout(), Duration::from_millis(5000));
    }
}
