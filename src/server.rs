//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, service wiring, the optional built-in scheduler,
//! and the Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::kv::{KvStore, MemoryKvStore, RedisKvStore};
use crate::routes::app_router;
use crate::state::{AppMonitor, AppState};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Key-value store (Redis, or the in-memory store when Redis is not configured)
/// - Notification transports and monitoring services
/// - Periodic sitemap runs when `SCHEDULE_INTERVAL_SECS` is set
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Redis is configured but unreachable
/// - An HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let state = AppState::build(&config, store)?;

    if let Some(interval) = config.monitor.schedule_interval {
        tokio::spawn(run_scheduler(state.monitor.clone(), interval));
        tracing::info!("Scheduler started, interval {}s", interval.as_secs());
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the configured store.
///
/// Once Redis is configured there is no fallback: an unreachable server is
/// an error.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn KvStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let redis = RedisKvStore::connect(redis_url, &config.key_prefix)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Store: Redis");
            Ok(Arc::new(redis))
        }
        None => {
            tracing::warn!("REDIS_URL not set, using in-memory store; state is lost on restart");
            Ok(Arc::new(MemoryKvStore::new()))
        }
    }
}

/// Triggers a scheduled run every `interval`, skipping the immediate first tick.
async fn run_scheduler(monitor: Arc<AppMonitor>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match monitor.run_scheduled().await {
            Ok(report) => tracing::info!(
                feeds = report.items.len(),
                new_urls = report.total_new,
                "Scheduled run completed"
            ),
            Err(e) => tracing::error!(error = %e, "Scheduled run failed"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
