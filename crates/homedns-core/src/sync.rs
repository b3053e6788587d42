//! The fetch → compare → update flow
//!
//! A run discovers the current public address, fetches the managed record,
//! and rewrites the record only when the two disagree. Every failure ends
//! the run; the scheduler's next invocation is the retry.

use crate::ip::IpSource;
use crate::provider::DnsProvider;
use crate::{Error, Result};
use std::net::Ipv4Addr;

/// What a single run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record already pointed at the current address, nothing written
    Unchanged {
        /// The shared address
        ip: Ipv4Addr,
    },
    /// The record was rewritten
    Updated {
        /// The address the record held before
        previous: Ipv4Addr,
        /// The address it holds now
        new: Ipv4Addr,
    },
}

/// Run one reconciliation pass for `host_name`
pub async fn sync(
    ip_source: &dyn IpSource,
    provider: &dyn DnsProvider,
    host_name: &str,
) -> Result<SyncOutcome> {
    let current = ip_source.current().await?;
    tracing::info!("Current public IP address is {current}");

    let record = provider.fetch_record(host_name).await?;
    let recorded: Ipv4Addr = record.content.trim().parse().map_err(|_| {
        Error::invalid_ip(format!(
            "DNS record {host_name} holds '{}', expected an IPv4 address",
            record.content
        ))
    })?;
    tracing::info!("Current value of DNS record {host_name} is {recorded}");

    if recorded == current {
        tracing::info!("No update required");
        return Ok(SyncOutcome::Unchanged { ip: current });
    }

    provider.put_record(&record, current).await?;
    tracing::info!("DNS record {host_name} updated: {recorded} -> {current}");

    Ok(SyncOutcome::Updated {
        previous: recorded,
        new: current,
    })
}
