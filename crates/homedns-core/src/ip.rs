//! Public IP discovery via an HTTP echo service
//!
//! Services like ifconfig.me, api.ipify.org and icanhazip.com return the
//! caller's address as a plaintext body. One GET per run is all we need.

use crate::{Error, Result};
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::time::Duration;

/// HTTP timeout for the echo request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for discovering the host's current public IPv4 address
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Return the current public IPv4 address
    async fn current(&self) -> Result<Ipv4Addr>;
}

/// IP source backed by a plaintext HTTP echo service
pub struct EchoIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl EchoIpSource {
    /// Create a new echo IP source for the given URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::ip_echo(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl IpSource for EchoIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_echo(format!("Request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(Error::ip_echo(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::ip_echo(format!("Failed to read response from {}: {e}", self.url))
        })?;

        parse_echo_body(&body)
    }
}

/// Parse the plaintext body returned by an IP echo service
///
/// The body is trimmed before parsing; anything that is not an IPv4
/// address (including an IPv6 address) is an error.
pub fn parse_echo_body(body: &str) -> Result<Ipv4Addr> {
    let trimmed = body.trim();
    trimmed.parse().map_err(|_| {
        Error::invalid_ip(format!(
            "Echo service returned '{trimmed}', expected an IPv4 address"
        ))
    })
}
