//! Core type definitions for scan results.
//!
//! These types describe what the scanner found. They carry no behavior beyond
//! validation and display.

mod host;
mod port;

pub use host::Host;
pub use port::{Port, PortEntry, PortError, PortState};
