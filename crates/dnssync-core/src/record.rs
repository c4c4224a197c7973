//! DNS record data model
//!
//! - [`DesiredRecord`]: a (name, type) pair the operator wants kept in sync
//! - [`ExistingRecord`]: an entry as currently stored by the provider
//! - [`PublicAddresses`]: this host's public address per IP family

use crate::error::{Error, Result};
use crate::traits::IpVersion;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address record type managed by dnssync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// The wire name used by DNS providers
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// The IP family whose address this record carries
    pub fn ip_version(&self) -> IpVersion {
        match self {
            RecordType::A => IpVersion::V4,
            RecordType::Aaaa => IpVersion::V6,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(Error::config(format!(
                "Unsupported record type '{}'. Supported types: A, AAAA",
                other
            ))),
        }
    }
}

/// A record the operator wants pointed at this host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DesiredRecord {
    /// Fully qualified record name (e.g. "home.example.com")
    pub name: String,
    /// Record type
    pub record_type: RecordType,
}

impl DesiredRecord {
    /// Create a new desired record
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }
}

impl fmt::Display for DesiredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.record_type)
    }
}

/// A record as currently stored by the provider
///
/// There is no identity beyond (name, type, value); providers may hold
/// several values for the same name and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExistingRecord {
    /// Record name
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Stored value, normally an IP literal
    pub value: String,
}

impl ExistingRecord {
    /// Create a new existing record
    pub fn new(name: impl Into<String>, record_type: RecordType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type,
            value: value.into(),
        }
    }

    /// Whether the stored value already points at `target`
    ///
    /// Values that parse as addresses compare as addresses, so differently
    /// written IPv6 literals still match. Anything else compares as text.
    pub fn points_at(&self, target: IpAddr) -> bool {
        match self.value.trim().parse::<IpAddr>() {
            Ok(ip) => ip == target,
            Err(_) => self.value == target.to_string(),
        }
    }
}

/// This host's public addresses, per family
///
/// A family is `None` when it was not resolved for this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicAddresses {
    /// Public IPv4 address
    pub ipv4: Option<Ipv4Addr>,
    /// Public IPv6 address
    pub ipv6: Option<Ipv6Addr>,
}

impl PublicAddresses {
    /// Target address for a record type
    pub fn for_type(&self, record_type: RecordType) -> Option<IpAddr> {
        match record_type {
            RecordType::A => self.ipv4.map(IpAddr::V4),
            RecordType::Aaaa => self.ipv6.map(IpAddr::V6),
        }
    }

    /// Store a resolved address in the slot for its family
    pub fn set(&mut self, ip: IpAddr) {
        match ip {
            IpAddr::V4(v4) => self.ipv4 = Some(v4),
            IpAddr::V6(v6) => self.ipv6 = Some(v6),
        }
    }
}
