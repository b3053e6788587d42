//! Cloudflare DNS provider
//!
//! Implements `DnsProvider` against the Cloudflare API v4:
//!
//! - List Zones: GET `/zones?name=...`
//! - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=A`
//! - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
//!
//! All requests are authenticated with a bearer token. The token never
//! appears in logs or `Debug` output.
//!
//! In dry-run mode the provider performs all GET requests, logs the PUT
//! payload it would have sent and skips the update.

use crate::config::zone_name;
use crate::provider::{DnsProvider, DnsRecord, update_payload};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::sync::Mutex;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// HTTP timeout for API requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope wrapped around every Cloudflare API result
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

/// Error entry in a Cloudflare response envelope
#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: u32,
    message: String,
}

/// A zone as returned by the zones endpoint
#[derive(Debug, Clone, Deserialize)]
struct Zone {
    id: String,
    #[allow(dead_code)]
    name: String,
}

/// Cloudflare implementation of `DnsProvider`
///
/// Stateless apart from the zone ID, which is resolved once per run and
/// cached so the fetch and the update share a single lookup.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone ID resolved on first use
    zone_id: Mutex<Option<String>>,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip the PUT
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// `api_token` needs Zone:Read and DNS:Edit permissions for the zone
    /// containing the managed record.
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::api(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            zone_id: Mutex::new(None),
            client,
            dry_run,
        })
    }

    /// Resolve the zone ID for the zone containing `host_name`
    ///
    /// The zone name is everything after the first dot of the host name.
    /// Exactly one zone must match; the result is cached for the life of
    /// the provider.
    async fn zone_id(&self, host_name: &str) -> Result<String> {
        let mut cached = self.zone_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let zone = zone_name(host_name)?;
        tracing::debug!("Looking up zone ID for {zone}");

        let url = format!("{}/zones?name={zone}", CLOUDFLARE_API_BASE);
        let zones: Vec<Zone> = self.get_json(&url, "zone").await?;
        let matched = exactly_one("zone", zone, zones)?;

        tracing::debug!("Found zone ID: {}", matched.id);
        *cached = Some(matched.id.clone());
        Ok(matched.id)
    }

    /// GET `url` and unwrap the Cloudflare response envelope
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &'static str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::api(format!("{what} lookup: HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable response body".to_string());
            return Err(status_error(what, status, &body));
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::api(format!("{what} lookup: failed to parse response: {e}")))?;

        unwrap_envelope(what, envelope)
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn fetch_record(&self, host_name: &str) -> Result<DnsRecord> {
        let zone_id = self.zone_id(host_name).await?;

        tracing::debug!("Looking up A record for {host_name}");
        let url = format!(
            "{}/zones/{}/dns_records?name={}&type=A",
            CLOUDFLARE_API_BASE, zone_id, host_name
        );

        let records: Vec<DnsRecord> = self.get_json(&url, "record").await?;
        exactly_one("record", host_name, records)
    }

    async fn put_record(&self, record: &DnsRecord, new_ip: Ipv4Addr) -> Result<()> {
        let zone_id = self.zone_id(&record.name).await?;
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            CLOUDFLARE_API_BASE, zone_id, record.id
        );
        let payload = update_payload(record, new_ip);

        if self.dry_run {
            tracing::info!(
                "[dry-run] Would PUT {url} with payload: {}",
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        tracing::info!(
            "Updating DNS record {} to {new_ip} via the Cloudflare API",
            record.name
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::api(format!("record update: HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable response body".to_string());
            return Err(status_error("record update", status, &body));
        }

        let envelope: ApiResponse<DnsRecord> = response
            .json()
            .await
            .map_err(|e| Error::api(format!("record update: failed to parse response: {e}")))?;
        unwrap_envelope("record update", envelope)?;

        Ok(())
    }
}

/// Require exactly one entry in a lookup result
///
/// Zone and record queries must match a single object; zero matches means
/// the object does not exist and multiple matches means the query was
/// ambiguous. Either way the run stops here.
fn exactly_one<T>(what: &'static str, name: &str, mut items: Vec<T>) -> Result<T> {
    if items.len() != 1 {
        return Err(Error::lookup(what, name, items.len()));
    }
    Ok(items.remove(0))
}

/// Unwrap a Cloudflare response envelope, surfacing API-level errors
fn unwrap_envelope<T>(what: &'static str, envelope: ApiResponse<T>) -> Result<T> {
    if !envelope.success {
        let messages: Vec<String> = envelope
            .errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect();
        return Err(Error::api(format!(
            "{what}: request failed: {}",
            messages.join("; ")
        )));
    }

    envelope
        .result
        .ok_or_else(|| Error::api(format!("{what}: response envelope carried no result")))
}

/// Map an HTTP error status to a specific error
fn status_error(what: &'static str, status: reqwest::StatusCode, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "invalid API token or insufficient permissions (HTTP {status})"
        )),
        404 => Error::not_found(format!("{what}: HTTP 404")),
        429 => Error::rate_limited(format!(
            "{what}: the next scheduled run will retry (HTTP {status})"
        )),
        500..=599 => Error::api(format!(
            "{what}: Cloudflare server error: HTTP {status} - {body}"
        )),
        _ => Error::api(format!("{what}: HTTP {status} - {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_rejects_empty_token() {
        assert!(matches!(
            CloudflareProvider::new("", false),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn api_token_not_exposed_in_debug() {
        let provider = CloudflareProvider::new("secret_token_12345", false).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("CloudflareProvider"));
    }

    #[test]
    fn exactly_one_accepts_a_single_match() {
        let item = exactly_one("zone", "example.com", vec!["only"]).unwrap();
        assert_eq!(item, "only");
    }

    #[test]
    fn zero_matches_fail_with_count() {
        let err = exactly_one::<Zone>("zone", "example.com", vec![]).unwrap_err();
        match err {
            Error::Lookup { what, name, count } => {
                assert_eq!(what, "zone");
                assert_eq!(name, "example.com");
                assert_eq!(count, 0);
            }
            other => panic!("expected Lookup error, got {other:?}"),
        }
    }

    #[test]
    fn multiple_matches_fail_with_count() {
        let err = exactly_one("record", "home.example.com", vec![1, 2, 3]).unwrap_err();
        match err {
            Error::Lookup { what, name, count } => {
                assert_eq!(what, "record");
                assert_eq!(name, "home.example.com");
                assert_eq!(count, 3);
            }
            other => panic!("expected Lookup error, got {other:?}"),
        }
    }

    #[test]
    fn zone_list_parses_from_provider_json() {
        let envelope: ApiResponse<Vec<Zone>> = serde_json::from_str(
            r#"{
                "success": true,
                "errors": [],
                "messages": [],
                "result": [
                    { "id": "023e105f4ecef8ad9ca31a8372d0c353", "name": "example.com", "status": "active" }
                ]
            }"#,
        )
        .unwrap();

        let zones = unwrap_envelope("zone", envelope).unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, "023e105f4ecef8ad9ca31a8372d0c353");
    }

    #[test]
    fn unsuccessful_envelope_surfaces_api_messages() {
        let envelope: ApiResponse<Vec<Zone>> = serde_json::from_str(
            r#"{
                "success": false,
                "errors": [ { "code": 9109, "message": "Invalid access token" } ],
                "result": null
            }"#,
        )
        .unwrap();

        let err = unwrap_envelope("zone", envelope).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid access token"));
        assert!(message.contains("9109"));
    }

    #[test]
    fn status_errors_map_to_specific_variants() {
        use reqwest::StatusCode;

        assert!(matches!(
            status_error("zone", StatusCode::FORBIDDEN, ""),
            Error::Authentication(_)
        ));
        assert!(matches!(
            status_error("zone", StatusCode::UNAUTHORIZED, ""),
            Error::Authentication(_)
        ));
        assert!(matches!(
            status_error("record", StatusCode::NOT_FOUND, ""),
            Error::NotFound(_)
        ));
        assert!(matches!(
            status_error("record", StatusCode::TOO_MANY_REQUESTS, ""),
            Error::RateLimited(_)
        ));
        assert!(matches!(
            status_error("record", StatusCode::BAD_GATEWAY, "oops"),
            Error::Api(_)
        ));
    }
}
