//! Scanner trait abstraction.
//!
//! The shell only needs "scan these targets, give me hosts", so that is the
//! whole seam. Tests drive the shell with an in-process implementation.

use crate::error::ScanResult;
use crate::types::Host;
use async_trait::async_trait;

/// Something that turns scan targets into host records.
///
/// # Example
///
/// ```ignore
/// use hostscope::scanner::{NmapScanner, ScanBackend};
///
/// async fn refresh<S: ScanBackend>(scanner: &S) {
///     let hosts = scanner.scan(&["10.0.0.5".to_string()]).await.unwrap();
///     println!("{} hosts", hosts.len());
/// }
/// ```
#[async_trait]
pub trait ScanBackend: Send + Sync {
    /// Scan the given targets and return every host the scan reported.
    ///
    /// Blocks the caller for the full scan. An empty `targets` slice is an
    /// [`InvalidTargets`](crate::error::ScanError::InvalidTargets) error.
    async fn scan(&self, targets: &[String]) -> ScanResult<Vec<Host>>;
}
