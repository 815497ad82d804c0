//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory; the
//! registry snapshot lives under the XDG data directory.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::NmapScanner;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/hostscope)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/hostscope)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve the XDG directories. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "hostscope", "hostscope")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the default registry snapshot path.
    pub fn snapshot_file(&self) -> PathBuf {
        self.data_dir.join("registry.json")
    }
}

/// What the shell does when a `scan` command fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanErrorPolicy {
    /// End the session and exit non-zero.
    #[default]
    FailFast,
    /// Report the error and keep prompting.
    Continue,
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scanner command: program followed by any wrapper arguments.
    pub scanner: Vec<String>,
    /// Snapshot location; the XDG data directory when unset.
    pub snapshot_path: Option<PathBuf>,
    /// Scan timeout in seconds; no timeout when unset or zero.
    pub scan_timeout_secs: Option<u64>,
    /// Behavior after a failed `scan` command.
    pub on_scan_error: ScanErrorPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scanner: vec![NmapScanner::DEFAULT_PROGRAM.to_string()],
            snapshot_path: None,
            scan_timeout_secs: None,
            on_scan_error: ScanErrorPolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
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

        Self::from_json(&content)
    }

    /// Parse and validate settings JSON.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let settings: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        if settings.scanner.first().map_or(true, |program| program.trim().is_empty()) {
            return Err(ConfigError::InvalidFormat(
                "scanner must name a program".to_string(),
            ));
        }

        Ok(settings)
    }

    /// Effective scan timeout.
    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Effective snapshot path.
    pub fn snapshot_path(&self, paths: &Paths) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| paths.snapshot_file())
    }

    /// Build the scanner these settings describe.
    pub fn scanner(&self) -> NmapScanner {
        NmapScanner::from_command_line(&self.scanner)
            .unwrap_or_default()
            .with_timeout(self.scan_timeout())
    }
}
