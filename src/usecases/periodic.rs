//! Periodic Runner - Timed Ping/Insert Probes
//!
//! Every tick, sequentially:
//! 1. Ping the store and time it
//! 2. Insert one event document and time it
//!
//! Each success bumps the operations counter and observes its latency.
//! Failures are logged and skipped; the other step and the next tick
//! still run. No retries, no backoff.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::config::TickConfig;
use crate::domain::event::{EventDocument, Operation, TickOutcome};
use crate::ports::store::{EventStore, StoreError};

/// Drives the probe loop against any [`EventStore`].
pub struct PeriodicRunner<S: EventStore> {
  /// Store under probe.
  store: Arc<S>,
  /// Shared instruments (also read by the HTTP server).
  metrics: Arc<MetricsRegistry>,
  /// Time between ticks.
  interval: Duration,
  /// `source` written on each event.
  source: String,
  /// `message` written on each event.
  message: String,
}

impl<S: EventStore> PeriodicRunner<S> {
  /// Create a runner from tick config.
  pub fn new(store: Arc<S>, metrics: Arc<MetricsRegistry>, config: &TickConfig) -> Self {
    Self {
      store,
      metrics,
      interval: config.interval(),
      source: config.source.clone(),
      message: config.message.clone(),
    }
  }

  /// Run ticks until `shutdown_rx` fires or its sender is dropped.
  ///
  /// The first tick happens one full interval after start. A tick in
  /// progress always completes before shutdown is observed.
  #[instrument(skip_all, name = "periodic_loop", fields(interval_secs = self.interval.as_secs()))]
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Periodic runner started");

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Shutdown signal received, stopping periodic runner");
          break;
        }
        _ = ticker.tick() => {
          self.run_tick().await;
        }
      }
    }
  }

  /// Perform one ping and one insert, recording each success.
  pub async fn run_tick(&self) -> TickOutcome {
    let started = Instant::now();
    let ping = self.store.ping().await;
    let ping_ok = self.record(Operation::Ping, started.elapsed(), ping);

    let event = EventDocument::now(self.source.as_str(), self.message.as_str());
    let started = Instant::now();
    let insert = self.store.insert_event(&event).await;
    let insert_ok = self.record(Operation::Insert, started.elapsed(), insert);

    TickOutcome { ping_ok, insert_ok }
  }

  fn record(&self, operation: Operation, elapsed: Duration, result: Result<(), StoreError>) -> bool {
    match result {
      Ok(()) => {
        self.metrics.record_success(elapsed);
        info!(%operation, latency_secs = elapsed.as_secs_f64(), "Operation successful");
        true
      }
      Err(e) => {
        error!(%operation, error = %e, "Operation failed");
        false
      }
    }
  }
}
