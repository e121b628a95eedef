//! MongoDB Monitor — Entry Point
//!
//! Connects to MongoDB, probes it on a fixed interval and exposes the
//! resulting metrics over HTTP. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config (optional config.toml + MONGO_URI override)
//! 2. Init tracing (JSON structured logging; also on config failure)
//! 3. Build the Prometheus registry
//! 4. Connect to MongoDB + admin ping (fatal on failure)
//! 5. Spawn the periodic runner (ping + insert every tick)
//! 6. Spawn the SIGINT watcher
//! 7. Serve /ping and /metrics on :8080 (fatal on bind failure)
//! 8. Shut down the runner and the Mongo client

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use mongo_monitor::adapters::metrics::{HttpServer, MetricsRegistry};
use mongo_monitor::adapters::mongo::MongoStore;
use mongo_monitor::config::loader::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, load_config};
use mongo_monitor::telemetry::{self, DEFAULT_LOG_LEVEL};
use mongo_monitor::usecases::PeriodicRunner;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration (errors logged with default level) ─
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing(DEFAULT_LOG_LEVEL);
            error!(error = %format!("{e:#}"), path = %config_path, "Failed to load configuration");
            return Err(e);
        }
    };

    // ── 2. Initialize structured JSON logging ───────────────
    telemetry::init_tracing(&config.log.level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.mongo.database,
        collection = %config.mongo.collection,
        interval_secs = config.tick.interval_secs,
        "Starting MongoDB monitor"
    );

    // ── 3. Metrics registry shared by runner and server ─────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);

    // ── 4. Connect to MongoDB (fatal on failure) ────────────
    let store = match MongoStore::connect(&config.mongo).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Failed to connect to MongoDB");
            return Err(e).context("MongoDB startup check failed");
        }
    };

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // ── 5. Spawn periodic runner ────────────────────────────
    let runner = PeriodicRunner::new(Arc::clone(&store), Arc::clone(&metrics), &config.tick);
    let runner_shutdown = shutdown_tx.subscribe();
    let runner_handle = tokio::spawn(async move {
        runner.run(runner_shutdown).await;
    });

    // ── 6. SIGINT → broadcast shutdown ──────────────────────
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("SIGINT received, initiating graceful shutdown"),
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGINT");
                return;
            }
        }
        let _ = signal_tx.send(());
    });

    // ── 7. Serve HTTP until shutdown (fatal on failure) ─────
    let server = HttpServer::new(Arc::clone(&metrics), config.server.bind_address.clone());
    if let Err(e) = server.run(shutdown_tx.subscribe()).await {
        error!(error = %e, "HTTP server failed");
        return Err(e);
    }

    // ── 8. Graceful shutdown ────────────────────────────────
    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(Duration::from_secs(10), runner_handle).await;

    match Arc::try_unwrap(store) {
        Ok(store) => store.shutdown().await,
        Err(_) => warn!("MongoDB client still shared at exit, skipping shutdown"),
    }

    info!(
        operations = metrics.operations_total(),
        "Shutdown complete"
    );
    Ok(())
}
