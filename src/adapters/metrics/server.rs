//! HTTP Front Door - Liveness and Metrics Endpoints
//!
//! Serves `/ping` for orchestrator liveness probes and `/metrics` for
//! Prometheus scrapes via axum 0.7. Liveness never consults the
//! database.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use super::prometheus::{MetricsRegistry, TEXT_FORMAT};

/// Axum-based HTTP server for `/ping` and `/metrics`.
pub struct HttpServer {
    /// Registry rendered on every scrape.
    metrics: Arc<MetricsRegistry>,
    /// Listen address (default `0.0.0.0:8080` from config).
    bind_address: String,
}

impl HttpServer {
    /// Create a new server over a shared registry.
    pub const fn new(metrics: Arc<MetricsRegistry>, bind_address: String) -> Self {
        Self {
            metrics,
            bind_address,
        }
    }

    /// Build the router with both routes.
    pub fn router(metrics: Arc<MetricsRegistry>) -> Router {
        Router::new()
            .route("/ping", get(Self::liveness))
            .route("/metrics", get(Self::metrics))
            .with_state(metrics)
    }

    /// Bind the configured address and serve until shutdown.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound or the server
    /// fails while running.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.bind_address)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind_address))?;

        info!(address = %self.bind_address, "Starting HTTP server");

        Self::serve(listener, self.metrics, shutdown_rx).await
    }

    /// Serve on an already-bound listener until shutdown.
    ///
    /// # Errors
    /// Returns an error if the server fails while running.
    pub async fn serve(
        listener: TcpListener,
        metrics: Arc<MetricsRegistry>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        axum::serve(listener, Self::router(metrics))
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .context("HTTP server failed")?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Liveness probe: always 200 `pong` while the process runs.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "pong")
    }

    /// Prometheus scrape endpoint.
    async fn metrics(State(metrics): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
        match metrics.render() {
            Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], body)
                .into_response(),
            Err(e) => {
                error!(error = %e, "Failed to render metrics");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
