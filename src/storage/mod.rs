//! Host registry and its persistence.
//!
//! The [`Registry`] is the in-memory source of truth. A [`SnapshotStore`]
//! mirrors it to disk after every scan so the next session starts where this
//! one ended.

mod registry;
mod snapshot;

pub use registry::Registry;
pub use snapshot::{JsonFileStore, MemoryStore, SnapshotStore};
