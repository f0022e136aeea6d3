//! ClubFeed daemon.
//!
//! Loads configuration, wires the store, records and aggregator together,
//! and keeps the configured user's feed fresh until interrupted.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use clubfeed_core::config::AppConfig;
use clubfeed_core::error::AppError;
use clubfeed_core::traits::kv_store::KeyValueStore;
use clubfeed_core::traits::session::StaticSession;
use clubfeed_service::{AppContext, RefreshOutcome};
use clubfeed_worker::RefreshScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("CLUBFEED_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("CLUBFEED_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main daemon run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ClubFeed v{}", env!("CARGO_PKG_VERSION"));

    let session = config.session.to_context().ok_or_else(|| {
        AppError::configuration("session.user_id must be set for the daemon")
    })?;
    tracing::info!(
        user_id = %session.user_id,
        memberships = session.memberships.len(),
        "Session configured"
    );

    let ctx = AppContext::build(config, Arc::new(StaticSession(session))).await?;

    if !ctx.store.health_check().await? {
        return Err(AppError::storage("Key-value store is not usable"));
    }

    let loaded = ctx.aggregator.load().await?;
    tracing::info!(feed_len = loaded, "Persisted feed loaded");

    if ctx.config.refresh.run_on_start {
        if let RefreshOutcome::Failed(e) = ctx.aggregator.refresh().await {
            tracing::warn!("Initial refresh failed: {}", e);
        }
    }

    let mut scheduler = RefreshScheduler::new(Arc::clone(&ctx.aggregator)).await?;
    scheduler.register(&ctx.config.refresh).await?;
    scheduler.start().await?;

    tracing::info!("ClubFeed daemon running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;

    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await?;
    Ok(())
}
