//! Scanned host record.

use super::port::PortEntry;
use serde::{Deserialize, Serialize};

/// A host as last reported by the scanner.
///
/// The address is the host's identity: a newer `Host` with the same address
/// replaces an older one entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Address the scanner reported for this host.
    pub address: String,
    /// Ports in the order the scanner reported them.
    #[serde(default)]
    pub ports: Vec<PortEntry>,
}

impl Host {
    /// Create a host with no ports.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ports: Vec::new(),
        }
    }

    /// Set the ports.
    pub fn with_ports(mut self, ports: Vec<PortEntry>) -> Self {
        self.ports = ports;
        self
    }

    /// Number of ports in an open (or possibly open) state.
    pub fn open_ports(&self) -> usize {
        self.ports.iter().filter(|p| p.state.is_open()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, PortState};

    #[test]
    fn test_host_open_ports() {
        let host = Host::new("10.0.0.5").with_ports(vec![
            PortEntry::new(Port::new(22).unwrap(), "tcp", PortState::Open, "ssh"),
            PortEntry::new(Port::new(23).unwrap(), "tcp", PortState::Closed, "telnet"),
            PortEntry::new(Port::new(161).unwrap(), "udp", PortState::OpenFiltered, "snmp"),
        ]);
        assert_eq!(host.open_ports(), 2);
    }

    #[test]
    fn test_host_without_ports_deserializes() {
        let host: Host = serde_json::from_str(r#"{"address":"10.0.0.9"}"#).unwrap();
        assert_eq!(host, Host::new("10.0.0.9"));
    }
}
