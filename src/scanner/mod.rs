//! Scanner module - runs the external scanner and decodes its report.
//!
//! [`NmapScanner`] is the production backend. Everything above this module
//! talks to it through the [`ScanBackend`] trait.

pub mod nmap;
pub mod traits;

pub use nmap::{NmapScanner, SCAN_ARGS};
pub use traits::ScanBackend;
