//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with shell output. `RUST_LOG`
//! overrides the level chosen here.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Quiet (`warn`) unless `verbose`.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // a second init (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init();
}
