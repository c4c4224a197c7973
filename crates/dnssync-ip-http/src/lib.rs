// # HTTP IP Resolver
//
// This crate provides an HTTP echo-service IP resolver for dnssync.
//
// ## Architecture
//
// Fetches the public address from an ipify-style service answering
// `{"ip": "<address>"}`. Two endpoints are used:
//
// - IPv4: `https://api.ipify.org?format=json` (IPv4-only host name)
// - IPv6: `https://api64.ipify.org?format=json` (dual-stack host name)
//
// The dual-stack endpoint answers over IPv4 on hosts without IPv6
// connectivity. That answer is rejected rather than written into an AAAA
// record.

use dnssync_core::config::IpSourceConfig;
use dnssync_core::traits::{IpResolver, IpVersion};
use dnssync_core::{Error, Result};

use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// IPv4 echo endpoint
pub const DEFAULT_IPV4_URL: &str = "https://api.ipify.org?format=json";

/// Dual-stack echo endpoint
pub const DEFAULT_IPV6_URL: &str = "https://api64.ipify.org?format=json";

/// Default HTTP timeout for lookups (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct EchoResponse {
    #[serde(default)]
    ip: String,
}

/// HTTP-based public IP resolver
#[derive(Debug)]
pub struct HttpIpResolver {
    /// URL answering with the IPv4 address
    ipv4_url: String,

    /// URL answering with the IPv6 address
    ipv6_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a new HTTP IP resolver
    ///
    /// # Parameters
    ///
    /// - `ipv4_url`: URL to fetch the IPv4 address from
    /// - `ipv6_url`: URL to fetch the IPv6 address from
    pub fn new(ipv4_url: impl Into<String>, ipv6_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            ipv4_url: ipv4_url.into(),
            ipv6_url: ipv6_url.into(),
            client,
        })
    }

    /// Create a resolver from configuration, falling back to ipify
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        Self::new(
            config.ipv4_url.as_deref().unwrap_or(DEFAULT_IPV4_URL),
            config.ipv6_url.as_deref().unwrap_or(DEFAULT_IPV6_URL),
        )
    }

    fn url_for(&self, version: IpVersion) -> &str {
        match version {
            IpVersion::V4 => &self.ipv4_url,
            IpVersion::V6 => &self.ipv6_url,
        }
    }

    /// Fetch the address from the echo service
    async fn fetch_ip(&self, url: &str) -> Result<IpAddr> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("IP lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "IP lookup returned HTTP {}",
                response.status()
            )));
        }

        let body: EchoResponse = response
            .json()
            .await
            .map_err(|e| Error::data(format!("IP lookup returned malformed JSON: {}", e)))?;

        let ip_text = body.ip.trim();
        if ip_text.is_empty() {
            return Err(Error::data("IP lookup returned an empty address"));
        }

        ip_text
            .parse()
            .map_err(|_| Error::data(format!("Invalid IP address: {}", ip_text)))
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn current(&self, version: IpVersion) -> Result<IpAddr> {
        let url = self.url_for(version);
        tracing::debug!("Resolving public {} address via {}", version, url);

        let ip = self.fetch_ip(url).await?;

        if !version.matches(&ip) {
            return Err(Error::data(format!(
                "Expected {} address from {}, got: {}",
                version, url, ip
            )));
        }

        Ok(ip)
    }
}
