//! Configuration for the homedns updater
//!
//! All configuration is done via environment variables:
//!
//! - `DNS_HOST_NAME` (required): record to manage, e.g. `home.example.com`
//! - `CF_TOKEN` (required): Cloudflare API token with Zone:DNS:Edit permissions
//! - `DNS_ECHO_URL`: public IP echo endpoint (default: `http://ifconfig.me/ip`)
//! - `DNS_MODE`: `dry-run` performs lookups but skips the record update
//! - `DNS_LOG_LEVEL`: trace, debug, info, warn, error (default: `info`)

use crate::{Error, Result};

/// Default public IP echo endpoint, returns the caller's address as plaintext
pub const DEFAULT_ECHO_URL: &str = "http://ifconfig.me/ip";

/// Application configuration, loaded from the environment before any
/// network call is made
#[derive(Clone)]
pub struct Config {
    /// Fully-qualified name of the "A" record to manage
    pub host_name: String,

    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// URL of the public IP echo service
    pub echo_url: String,

    /// Dry-run mode: perform all lookups but skip the update
    pub dry_run: bool,

    /// Log level name for the tracing subscriber
    pub log_level: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host_name", &self.host_name)
            .field("api_token", &"<REDACTED>")
            .field("echo_url", &self.echo_url)
            .field("dry_run", &self.dry_run)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// `from_env` goes through here; tests inject a map instead of
    /// touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host_name = lookup("DNS_HOST_NAME").ok_or_else(|| {
            Error::config(
                "DNS_HOST_NAME is required. \
                Set it via: export DNS_HOST_NAME=home.example.com",
            )
        })?;

        let api_token = lookup("CF_TOKEN").ok_or_else(|| {
            Error::config(
                "CF_TOKEN is required. \
                Set it via: export CF_TOKEN=your_api_token",
            )
        })?;

        Ok(Self {
            host_name,
            api_token,
            echo_url: lookup("DNS_ECHO_URL").unwrap_or_else(|| DEFAULT_ECHO_URL.to_string()),
            dry_run: lookup("DNS_MODE")
                .map(|mode| mode.to_lowercase() == "dry-run")
                .unwrap_or(false),
            log_level: lookup("DNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Checks required field presence, hostname shape, the echo URL scheme
    /// and the log level name. Runs before any client is constructed.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(Error::config("CF_TOKEN cannot be empty"));
        }

        validate_host_name(&self.host_name)?;

        // A zone must be derivable from the hostname
        zone_name(&self.host_name)?;

        if !self.echo_url.starts_with("https://") && !self.echo_url.starts_with("http://") {
            return Err(Error::config(format!(
                "DNS_ECHO_URL must use HTTP or HTTPS scheme. Got: {}",
                self.echo_url
            )));
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(Error::config(format!(
                    "DNS_LOG_LEVEL '{other}' is not valid. \
                    Valid levels: trace, debug, info, warn, error"
                )));
            }
        }

        Ok(())
    }
}

/// Derive the zone name from a record name
///
/// The zone is everything after the first dot: `home.example.com` lives in
/// zone `example.com`. A name without a dot has no parent zone and is
/// rejected.
pub fn zone_name(host_name: &str) -> Result<&str> {
    host_name
        .split_once('.')
        .map(|(_, zone)| zone)
        .filter(|zone| !zone.is_empty())
        .ok_or_else(|| {
            Error::config(format!(
                "Cannot derive a DNS zone from '{host_name}': \
                expected a name of the form host.example.com"
            ))
        })
}

/// Validate that a string is a plausible DNS name
///
/// Basic RFC 1035 checks; not comprehensive but catches common mistakes.
fn validate_host_name(host_name: &str) -> Result<()> {
    if host_name.is_empty() {
        return Err(Error::config("DNS_HOST_NAME cannot be empty"));
    }

    // RFC 1035: 253 chars max
    if host_name.len() > 253 {
        return Err(Error::config(format!(
            "Host name too long: {} chars (max 253)",
            host_name.len()
        )));
    }

    for label in host_name.split('.') {
        if label.is_empty() {
            return Err(Error::config(format!(
                "Host name has empty label: '{host_name}'"
            )));
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "Host name label too long: {} chars (max 63). Label: '{label}'",
                label.len()
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::config(format!(
                "Host name label contains invalid characters. Label: '{label}'. \
                Valid: alphanumeric and hyphen only."
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "Host name label cannot start or end with hyphen. Label: '{label}'"
            )));
        }
    }

    Ok(())
}
