//! Error types for the homedns updater
//!
//! Every error here is terminal for the run: the binary logs it and exits
//! non-zero, and the next scheduled invocation is the retry.

use thiserror::Error;

/// Result type alias for homedns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the homedns updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing or malformed environment variables)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failures while asking the echo service for the public IP
    #[error("Public IP lookup failed: {0}")]
    IpEcho(String),

    /// A value that should have been an IPv4 address was not
    #[error("Invalid IPv4 address: {0}")]
    InvalidIp(String),

    /// Authentication errors from the provider API
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors from the provider API
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Object not found at the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// A zone or record query matched anything other than exactly one entry
    #[error("{what} lookup for {name} matched {count} entries, expected exactly one")]
    Lookup {
        /// What was looked up ("zone" or "record")
        what: &'static str,
        /// The name that was queried
        name: String,
        /// How many entries came back
        count: usize,
    },

    /// Any other provider API failure
    #[error("Cloudflare API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a public IP lookup error
    pub fn ip_echo(msg: impl Into<String>) -> Self {
        Self::IpEcho(msg.into())
    }

    /// Create an invalid IP error
    pub fn invalid_ip(msg: impl Into<String>) -> Self {
        Self::InvalidIp(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a lookup cardinality error
    pub fn lookup(what: &'static str, name: impl Into<String>, count: usize) -> Self {
        Self::Lookup {
            what,
            name: name.into(),
            count,
        }
    }

    /// Create a generic API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}
