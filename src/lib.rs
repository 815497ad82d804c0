//! # hostscope - an interactive registry of nmap results
//!
//! hostscope runs nmap against the targets you give it, keeps every host it
//! reports in an address-keyed registry, and persists that registry so the
//! next session starts where the last one ended.
//!
//! ## Features
//!
//! - **nmap driven**: scans run `nmap -oX - -p-`, with an optional timeout
//! - **Whole-host replacement**: a rescan replaces everything known about an
//!   address, so closed ports disappear
//! - **Crash-safe snapshots**: atomic owner-only writes; a corrupt snapshot
//!   never blocks startup
//! - **Interactive shell**: `list`, `show`, `scan`, `help`, `quit`
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use hostscope::scanner::NmapScanner;
//! use hostscope::shell::Shell;
//! use hostscope::storage::{JsonFileStore, Registry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store = JsonFileStore::new("/tmp/hostscope.json");
//!     let registry = Registry::load(&store);
//!     let mut shell = Shell::new(registry, NmapScanner::default(), store);
//!
//!     shell.scan_targets(&["10.0.0.5".to_string()]).await.unwrap();
//!     for host in shell.registry().hosts() {
//!         println!("{} has {} open ports", host.address, host.open_ports());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Scan result model: hosts, ports, states
//! - [`report`] - nmap XML decoding
//! - [`scanner`] - nmap invocation behind the `ScanBackend` trait
//! - [`storage`] - The registry and its snapshot stores
//! - [`shell`] - Command parsing and dispatch
//! - [`config`] - Settings file and XDG paths
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod report;
pub mod scanner;
pub mod shell;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{ScanError, ShellError, StorageError};
pub use scanner::{NmapScanner, ScanBackend};
pub use shell::{Command, Shell, ShellState};
pub use storage::{JsonFileStore, MemoryStore, Registry, SnapshotStore};
pub use types::{Host, Port, PortEntry, PortState};
