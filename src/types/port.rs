//! Port types with validation.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortEntry` is one port line of a scanned host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Port identity is load-bearing for the registry, so a zero or out of range
/// value is rejected at every boundary, including snapshot deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value.into()))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::InvalidFormat(s.to_string()));
        }
        let value: u64 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        u16::try_from(value)
            .ok()
            .and_then(Port::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u64),
    #[error("invalid port number: '{0}'")]
    InvalidFormat(String),
}

/// State of a port as reported by the scanner.
///
/// States the scanner may report but that are not listed here are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PortState {
    Open,
    Closed,
    Filtered,
    Unfiltered,
    OpenFiltered,
    ClosedFiltered,
    Other(String),
}

impl PortState {
    /// Scanner spelling of this state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Filtered => "filtered",
            Self::Unfiltered => "unfiltered",
            Self::OpenFiltered => "open|filtered",
            Self::ClosedFiltered => "closed|filtered",
            Self::Other(state) => state,
        }
    }

    /// Check if the port accepts connections (or may, for `open|filtered`).
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open | Self::OpenFiltered)
    }
}

impl From<&str> for PortState {
    fn from(value: &str) -> Self {
        match value {
            "open" => Self::Open,
            "closed" => Self::Closed,
            "filtered" => Self::Filtered,
            "unfiltered" => Self::Unfiltered,
            "open|filtered" => Self::OpenFiltered,
            "closed|filtered" => Self::ClosedFiltered,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PortState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<PortState> for String {
    fn from(state: PortState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One port discovered on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    /// Port number.
    pub number: Port,
    /// Transport protocol, e.g. "tcp" or "udp".
    pub protocol: String,
    /// State reported by the scanner.
    pub state: PortState,
    /// Service name; empty when the scanner did not identify one.
    #[serde(default)]
    pub service: String,
}

impl PortEntry {
    /// Create a new port entry.
    pub fn new(
        number: Port,
        protocol: impl Into<String>,
        state: PortState,
        service: impl Into<String>,
    ) -> Self {
        Self {
            number,
            protocol: protocol.into(),
            state,
            service: service.into(),
        }
    }
}

/// Renders as `<number>/<protocol> <state> <service>`, without a trailing
/// space when the service is unknown.
impl fmt::Display for PortEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number, self.protocol, self.state)?;
        if !self.service.is_empty() {
            write!(f, " {}", self.service)?;
        }
        Ok(())
    }
}
