// # homedns - single-shot dynamic DNS updater
//
// Keeps one Cloudflare "A" record pointed at this host's public IPv4
// address. Each invocation performs at most four HTTP calls (echo service,
// zone lookup, record lookup, conditional update) and exits; run it from
// cron or a systemd timer and the next run is the retry.
//
// The binary is a thin integration layer: it reads the environment, sets
// up tracing and the runtime, and hands off to homedns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `DNS_HOST_NAME`: record to manage (required)
// - `CF_TOKEN`: Cloudflare API token (required)
// - `DNS_ECHO_URL`: public IP echo endpoint (default: http://ifconfig.me/ip)
// - `DNS_MODE`: set to `dry-run` to skip the record update
// - `DNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DNS_HOST_NAME=home.example.com
// export CF_TOKEN=your_api_token
//
// homedns
// ```

use anyhow::Result;
use homedns_core::{CloudflareProvider, Config, EchoIpSource, SyncOutcome, sync};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Record in sync (updated or already current)
/// - 1: Configuration or startup error, nothing was queried
/// - 2: A lookup or update failed mid-run
#[derive(Debug, Clone, Copy)]
enum RunExitCode {
    /// Record is in sync with the public address
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// A network call or the update itself failed
    SyncError = 2,
}

impl From<RunExitCode> for ExitCode {
    fn from(code: RunExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment, before any network I/O
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RunExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return RunExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RunExitCode::ConfigError.into();
    }

    // A current-thread runtime suffices for the sequential flow
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RunExitCode::SyncError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(()) => RunExitCode::Success,
            Err(e) => {
                error!("Sync failed: {:#}", e);
                RunExitCode::SyncError
            }
        }
    })
    .into()
}

/// Run one reconciliation pass
async fn run(config: Config) -> Result<()> {
    info!("Checking DNS record {}", config.host_name);

    if config.dry_run {
        warn!("Running in dry-run mode - no changes will be made");
    }

    let ip_source = EchoIpSource::new(config.echo_url.clone())?;
    let provider = CloudflareProvider::new(config.api_token.clone(), config.dry_run)?;

    match sync(&ip_source, &provider, &config.host_name).await? {
        SyncOutcome::Unchanged { ip } => {
            info!("{} already points at {}, nothing to do", config.host_name, ip);
        }
        SyncOutcome::Updated { previous, new } => {
            info!("{} updated: {} -> {}", config.host_name, previous, new);
        }
    }

    Ok(())
}
