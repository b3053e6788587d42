//! DNS provider trait and record types
//!
//! Defines the seam between the sync flow and the provider API plumbing.
//! The only implementation today is `CloudflareProvider`; the trait keeps
//! the flow testable with mock providers.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// An "A" record as returned by the provider
///
/// The updater reads `content` and `proxied` and passes `name`/`proxied`
/// through unchanged when it writes the record back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID
    pub id: String,

    /// Fully-qualified record name
    pub name: String,

    /// Record type, "A" for everything this tool manages
    #[serde(rename = "type")]
    pub record_type: String,

    /// The address the record currently points at, as a string
    pub content: String,

    /// Whether traffic is routed through the provider's network
    pub proxied: bool,
}

/// Body of a record update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    /// Record name, carried over from the existing record
    pub name: String,

    /// Always "A"
    #[serde(rename = "type")]
    pub record_type: String,

    /// The new address
    pub content: String,

    /// Proxy flag, carried over from the existing record
    pub proxied: bool,
}

/// Build the update body from the existing record and the new address
///
/// `name` and `proxied` are preserved, `type` is pinned to "A" and
/// `content` becomes the new address.
pub fn update_payload(record: &DnsRecord, new_ip: Ipv4Addr) -> UpdatePayload {
    UpdatePayload {
        name: record.name.clone(),
        record_type: "A".to_string(),
        content: new_ip.to_string(),
        proxied: record.proxied,
    }
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and must not retry internally;
/// any failure is propagated and ends the run.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the single "A" record for `host_name`
    ///
    /// Anything other than exactly one match is an error.
    async fn fetch_record(&self, host_name: &str) -> Result<DnsRecord>;

    /// Rewrite `record` so that it points at `new_ip`
    async fn put_record(&self, record: &DnsRecord, new_ip: Ipv4Addr) -> Result<()>;
}
