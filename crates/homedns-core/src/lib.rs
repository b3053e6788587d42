// # homedns-core
//
// Core library for the homedns record updater.
//
// ## Architecture Overview
//
// This library provides everything the single-shot update flow needs:
// - **IpSource**: Trait for discovering the host's current public IPv4 address
// - **DnsProvider**: Trait for fetching and rewriting the managed "A" record
// - **CloudflareProvider**: Cloudflare API v4 implementation of `DnsProvider`
// - **sync**: The fetch → compare → update pipeline
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The sync flow only sees the two traits,
//    never the HTTP plumbing behind them
// 2. **Single-Shot**: One run performs at most four HTTP calls and exits;
//    the scheduler that invokes the binary is the retry mechanism
// 3. **Fail Fast**: Every failure aborts the run with a descriptive error

pub mod cloudflare;
pub mod config;
pub mod error;
pub mod ip;
pub mod provider;
pub mod sync;

// Re-export core types for convenience
pub use cloudflare::CloudflareProvider;
pub use config::Config;
pub use error::{Error, Result};
pub use ip::{EchoIpSource, IpSource};
pub use provider::{DnsProvider, DnsRecord};
pub use sync::{SyncOutcome, sync};
