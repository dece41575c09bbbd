//! Error types for vigil.
//!
//! Uses `thiserror` for ergonomic error definitions. Probe failures are not
//! errors: they are folded into [`crate::scanner::ProbeOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directories")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from the persisted state history.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to load history: {0}")]
    LoadFailed(String),

    #[error("failed to save history: {0}")]
    SaveFailed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the target source. All of them are fatal to a run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read targets from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("malformed target data: {0}")]
    Parse(String),

    #[error("target source returned no data")]
    Empty,

    #[error("no targets found for scope '{0}'")]
    NoMatch(String),

    #[error("no target file configured (use --targets or set targets_file)")]
    NotConfigured,
}

/// Top-level error for command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type SourceResult<T> = Result<T, SourceError>;
pub type CliResult<T> = Result<T, CliError>;
