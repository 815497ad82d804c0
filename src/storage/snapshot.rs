//! Snapshot backends.
//!
//! A snapshot is the serialized registry. `JsonFileStore` keeps it in a
//! single file; `MemoryStore` keeps it in memory so tests never touch the
//! real snapshot path.

use crate::error::{StorageError, StorageResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Where a snapshot lives.
pub trait SnapshotStore {
    /// Read the snapshot, or `None` if there is none yet.
    fn read(&self) -> StorageResult<Option<String>>;

    /// Replace the snapshot with `contents`.
    fn write(&self, contents: &str) -> StorageResult<()>;

    /// Human-readable location for diagnostics.
    fn location(&self) -> String;
}

/// Snapshot stored as one JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the snapshot, so a reader sees either the old or the new contents.
/// On unix the file is created with mode 0600: scan results map out the
/// network.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`. Nothing is touched until the first
    /// read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failed(&self, reason: impl ToString) -> StorageError {
        StorageError::PersistenceFailed {
            location: self.location(),
            reason: reason.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn read(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(StorageError::SnapshotCorrupt {
                location: self.location(),
                reason: e.to_string(),
            }),
            Err(e) => Err(StorageError::ReadFailed {
                location: self.location(),
                reason: e.to_string(),
            }),
        }
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.failed(e))?;

        // tempfile creates the file with mode 0600 on unix
        let mut file = tempfile::Builder::new()
            .prefix(".hostscope-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| self.failed(e))?;

        file.write_all(contents.as_bytes())
            .map_err(|e| self.failed(e))?;
        file.as_file().sync_all().map_err(|e| self.failed(e))?;
        file.persist(&self.path).map_err(|e| self.failed(e.error))?;

        debug!(path = %self.path.display(), bytes = contents.len(), "snapshot written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory snapshot, for tests and for running without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a snapshot.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            fail_writes: false,
        }
    }

    /// Make every write fail with `PersistenceFailed`.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Current snapshot contents.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> StorageResult<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::PersistenceFailed {
                location: self.location(),
                reason: "writes disabled".to_string(),
            });
        }
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
