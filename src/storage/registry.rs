//! Address-keyed host registry.

use super::snapshot::SnapshotStore;
use crate::error::{StorageError, StorageResult};
use crate::types::Host;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Every host the scanner has reported, keyed by address.
///
/// Hosts are only ever replaced whole: merging a new scan of an address drops
/// whatever was known about that address before, including ports the new
/// scan no longer reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    hosts: HashMap<String, Host>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from `store`, starting empty if there is nothing usable.
    ///
    /// A missing snapshot is the normal first-run case. A corrupt or
    /// unreadable one is logged and discarded; it never stops startup.
    pub fn load<S: SnapshotStore + ?Sized>(store: &S) -> Self {
        match Self::try_load(store) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "ignoring unusable snapshot, starting with an empty registry");
                Self::new()
            }
        }
    }

    /// Hydrate from `store`, reporting why a snapshot could not be used.
    pub fn try_load<S: SnapshotStore + ?Sized>(store: &S) -> StorageResult<Self> {
        match store.read()? {
            Some(contents) => {
                let registry = Self::from_snapshot(&contents, &store.location())?;
                debug!(hosts = registry.len(), location = %store.location(), "snapshot loaded");
                Ok(registry)
            }
            None => {
                debug!(location = %store.location(), "no snapshot yet");
                Ok(Self::new())
            }
        }
    }

    /// Decode snapshot text. Entries whose key does not match the host's
    /// address make the whole snapshot corrupt.
    pub fn from_snapshot(contents: &str, location: &str) -> StorageResult<Self> {
        let corrupt = |reason: String| StorageError::SnapshotCorrupt {
            location: location.to_string(),
            reason,
        };

        let hosts: HashMap<String, Host> =
            serde_json::from_str(contents).map_err(|e| corrupt(e.to_string()))?;

        if let Some((key, host)) = hosts
            .iter()
            .find(|(key, host)| key.is_empty() || **key != host.address)
        {
            return Err(corrupt(format!(
                "entry '{}' holds host '{}'",
                key, host.address
            )));
        }

        Ok(Self { hosts })
    }

    /// Encode as snapshot text. Keys are sorted so snapshots diff cleanly.
    pub fn to_snapshot(&self) -> serde_json::Result<String> {
        let sorted: BTreeMap<&String, &Host> = self.hosts.iter().collect();
        serde_json::to_string_pretty(&sorted)
    }

    /// Write the whole registry to `store`.
    pub fn save<S: SnapshotStore + ?Sized>(&self, store: &S) -> StorageResult<()> {
        let contents = self
            .to_snapshot()
            .map_err(|e| StorageError::PersistenceFailed {
                location: store.location(),
                reason: e.to_string(),
            })?;
        store.write(&contents)?;
        info!(hosts = self.len(), location = %store.location(), "registry saved");
        Ok(())
    }

    /// Replace the entry for each host's address. Addresses not in `hosts`
    /// are left alone. Returns how many hosts were stored.
    pub fn merge(&mut self, hosts: impl IntoIterator<Item = Host>) -> usize {
        let mut stored = 0;
        for host in hosts {
            if host.address.is_empty() {
                warn!("skipping host without an address");
                continue;
            }
            debug!(address = %host.address, ports = host.ports.len(), "storing host");
            self.hosts.insert(host.address.clone(), host);
            stored += 1;
        }
        stored
    }

    /// Look up a host by exact address.
    pub fn get(&self, address: &str) -> Option<&Host> {
        self.hosts.get(address)
    }

    /// Check if an address is known.
    pub fn contains(&self, address: &str) -> bool {
        self.hosts.contains_key(address)
    }

    /// All known addresses, in no particular order.
    pub fn addresses(&self) -> Vec<String> {
        self.hosts.keys().cloned().collect()
    }

    /// Iterate over all hosts, in no particular order.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
    }

    /// Number of known hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Check if no hosts are known.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
