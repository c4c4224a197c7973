// # dnssync
//
// One-shot DNS sync: points DreamHost A/AAAA records at this host's public
// addresses and reports changes to a Discord webhook. Meant to be run from
// cron or a systemd timer.
//
// The binary is a thin integration layer:
// 1. Loading `.env` and reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the record store, IP resolver and notifier
// 4. Running the sync engine once and mapping the outcome to an exit code
//
// ## Configuration
//
// ### Provider
// - `DREAMHOST_API_TOKEN`: DreamHost API key (required)
// - `DNSSYNC_DREAMHOST_API_BASE`: API endpoint override
// - `DNSSYNC_MODE`: `live` (default) or `dry-run`
//
// ### Records
// - `TARGET_RECORDS`: Comma-separated `name:type` pairs (required)
//
// ### IP discovery
// - `DNSSYNC_IPV4_URL`, `DNSSYNC_IPV6_URL`: echo endpoint overrides
//
// ### Notifications
// - `DISCORD_WEBHOOK_ID`, `DISCORD_WEBHOOK_TOKEN`: webhook credentials
//
// ### Logging
// - `DNSSYNC_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export DREAMHOST_API_TOKEN=6SHU5P2HLDAYECUM
// export TARGET_RECORDS=home.example.com:A,home.example.com:AAAA
// export DISCORD_WEBHOOK_ID=123456789
// export DISCORD_WEBHOOK_TOKEN=abcdef
//
// dnssync
// ```

use anyhow::{Context, Result};
use dnssync_core::traits::Notifier;
use dnssync_core::{SyncConfig, SyncEngine};
use dnssync_ip_http::HttpIpResolver;
use dnssync_notify_discord::DiscordNotifier;
use dnssync_provider_dreamhost::DreamhostRecordStore;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Records in sync (changed or not)
/// - 1: The sync run failed (listing, IP lookup or a record change)
/// - 2: Configuration or startup error
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Run completed
    Success = 0,
    /// Run failed
    SyncFailed = 1,
    /// Configuration error or startup failure
    ConfigError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables take precedence
    let dotenv = dotenvy::dotenv();

    let config = match SyncConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

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
        return SyncExitCode::ConfigError.into();
    }

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => {
            error!("Failed to load .env file: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    }

    info!("Starting DNS sync");
    info!("Configuration loaded: {} record(s)", config.records.len());

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    // Calls are strictly sequential, a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    let result = rt.block_on(engine.run_once());

    match result {
        Ok(report) if report.is_noop() => {
            info!("No changes needed");
            SyncExitCode::Success.into()
        }
        Ok(report) if report.dry_run => {
            info!("[DRY-RUN] Would apply {} change(s)", report.applied.len());
            SyncExitCode::Success.into()
        }
        Ok(report) => {
            info!("Applied {} change(s)", report.applied.len());
            SyncExitCode::Success.into()
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            SyncExitCode::SyncFailed.into()
        }
    }
}

/// Build the engine and its collaborators from configuration
fn build_engine(config: &SyncConfig) -> Result<SyncEngine> {
    let store = DreamhostRecordStore::from_config(&config.provider)
        .context("Failed to create DreamHost record store")?;

    let resolver =
        HttpIpResolver::from_config(&config.ip_source).context("Failed to create IP resolver")?;

    let notifier: Option<Box<dyn Notifier>> = match &config.notifier {
        Some(notifier_config) => Some(Box::new(
            DiscordNotifier::from_config(notifier_config)
                .context("Failed to create Discord notifier")?,
        )),
        None => {
            info!("Discord webhook not configured, notifications disabled");
            None
        }
    };

    for record in &config.records {
        info!("Managing record: {}", record);
    }

    let engine = SyncEngine::new(
        Box::new(store),
        Box::new(resolver),
        notifier,
        config.records.clone(),
    )?;

    Ok(engine)
}
