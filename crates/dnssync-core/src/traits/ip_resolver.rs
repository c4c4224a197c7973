// # IP Resolver Trait
//
// Defines the interface for discovering this host's public IP addresses.
//
// ## Implementations
//
// - HTTP echo service (ipify): `dnssync-ip-http` crate

use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;

/// IP version (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Whether `ip` belongs to this family
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("IPv4"),
            IpVersion::V6 => f.write_str("IPv6"),
        }
    }
}

/// Trait for public IP resolver implementations
///
/// # Contract
///
/// - One lookup per call, no caching and no retry
/// - The returned address must belong to the requested family; an
///   implementation that gets an address of the other family back
///   (e.g. a dual-stack echo service on an IPv4-only host) must fail
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Get the current public address for `version`
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public address
    /// - `Err(Error)`: If the address could not be determined
    async fn current(&self, version: IpVersion) -> Result<IpAddr, crate::Error>;
}
