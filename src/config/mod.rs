//! Configuration management for hostscope.
//!
//! Provides XDG-compliant paths and the optional settings file.

mod settings;

pub use settings::{Paths, ScanErrorPolicy, Settings};
