//! Error types for hostscope.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while invoking the scanner or decoding its report.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid scan targets: {0}")]
    InvalidTargets(String),

    #[error("scanner '{program}' could not be started: {reason}")]
    ScanUnavailable { program: String, reason: String },

    #[error("scanner exited with {status}{}", format_stderr(.stderr))]
    ScanFailed { status: String, stderr: String },

    #[error("scanner did not finish within {0:?}")]
    ScanTimedOut(Duration),

    #[error("malformed scan report: {0}")]
    MalformedReport(String),
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised by snapshot persistence.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to persist snapshot to {location}: {reason}")]
    PersistenceFailed { location: String, reason: String },

    #[error("snapshot at {location} is corrupt: {reason}")]
    SnapshotCorrupt { location: String, reason: String },

    #[error("failed to read snapshot from {location}: {reason}")]
    ReadFailed { location: String, reason: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a home directory for configuration")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that end an interactive session.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;
