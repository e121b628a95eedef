//! Integration Tests - Runner, Metrics and HTTP Front Door
//!
//! Drives the periodic runner against a mocked store and exercises the
//! axum server over a real socket. Uses mockall for the store port and
//! tokio::test (paused clock where timing matters).

use std::sync::Arc;
use std::time::Duration;

use mockall::mock;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use mongo_monitor::adapters::metrics::{HttpServer, MetricsRegistry};
use mongo_monitor::config::TickConfig;
use mongo_monitor::domain::event::{EventDocument, TickOutcome};
use mongo_monitor::ports::store::{EventStore, StoreError};
use mongo_monitor::usecases::PeriodicRunner;

// ---- Mock Definitions ----

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl EventStore for Store {
        async fn ping(&self) -> Result<(), StoreError>;
        async fn insert_event(&self, event: &EventDocument) -> Result<(), StoreError>;
    }
}

fn healthy_store(ticks: usize) -> MockStore {
    let mut store = MockStore::new();
    store.expect_ping().times(ticks).returning(|| Ok(()));
    store
        .expect_insert_event()
        .times(ticks)
        .returning(|_| Ok(()));
    store
}

fn down_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_ping()
        .returning(|| Err(StoreError::Command("connection reset".to_string())));
    store
        .expect_insert_event()
        .returning(|_| Err(StoreError::Timeout(Duration::from_secs(10))));
    store
}

async fn spawn_server(
    metrics: Arc<MetricsRegistry>,
) -> (String, broadcast::Sender<()>, tokio::task::JoinHandle<anyhow::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = broadcast::channel(1);
    let handle = tokio::spawn(HttpServer::serve(listener, metrics, rx));
    (base, tx, handle)
}

// ---- Runner Tests ----

#[tokio::test]
async fn test_insert_writes_configured_event_shape() {
    let mut store = MockStore::new();
    store.expect_ping().times(1).returning(|| Ok(()));
    store
        .expect_insert_event()
        .withf(|event| event.source == "go-app" && event.message == "Periodic event")
        .times(1)
        .returning(|_| Ok(()));

    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(store), Arc::clone(&metrics), &TickConfig::default());

    let outcome = runner.run_tick().await;
    assert_eq!(outcome, TickOutcome { ping_ok: true, insert_ok: true });
    assert_eq!(metrics.operations_total(), 2);
}

#[tokio::test]
async fn test_failed_insert_does_not_affect_ping_accounting() {
    let mut store = MockStore::new();
    store.expect_ping().returning(|| Ok(()));
    store
        .expect_insert_event()
        .returning(|_| Err(StoreError::Command("not primary".to_string())));

    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(store), Arc::clone(&metrics), &TickConfig::default());

    for _ in 0..3 {
        let outcome = runner.run_tick().await;
        assert!(outcome.ping_ok);
        assert!(!outcome.insert_ok);
    }
    assert_eq!(metrics.operations_total(), 3);
    assert_eq!(metrics.observation_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_no_tick_before_first_interval() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(healthy_store(0)), Arc::clone(&metrics), &TickConfig::default());

    let (tx, rx) = broadcast::channel(1);
    let handle = tokio::spawn(async move { runner.run(rx).await });

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(metrics.operations_total(), 0);

    tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_each_tick_adds_two_operations() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(healthy_store(3)), Arc::clone(&metrics), &TickConfig::default());

    let (tx, rx) = broadcast::channel(1);
    let handle = tokio::spawn(async move { runner.run(rx).await });

    // Ticks fire at 5s, 10s and 15s.
    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(metrics.operations_total(), 6);
    assert_eq!(metrics.observation_count(), 6);

    tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_runner_keeps_ticking_through_failures() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(down_store()), Arc::clone(&metrics), &TickConfig::default());

    let (tx, rx) = broadcast::channel(1);
    let handle = tokio::spawn(async move { runner.run(rx).await });

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(metrics.operations_total(), 0);
    assert_eq!(metrics.observation_count(), 0);
    assert!(!handle.is_finished());

    tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_runner_stops_when_sender_dropped() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(healthy_store(0)), metrics, &TickConfig::default());

    let (tx, rx) = broadcast::channel::<()>(1);
    let handle = tokio::spawn(async move { runner.run(rx).await });

    drop(tx);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("runner should exit once the shutdown sender is gone")
        .unwrap();
}

// ---- HTTP Tests ----

#[tokio::test]
async fn test_ping_returns_pong_while_store_is_down() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(down_store()), Arc::clone(&metrics), &TickConfig::default());
    runner.run_tick().await;

    let (base, tx, handle) = spawn_server(metrics).await;

    let response = reqwest::get(format!("{base}/ping")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "pong");

    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_metrics_exposes_both_instruments_after_tick() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let runner = PeriodicRunner::new(Arc::new(healthy_store(1)), Arc::clone(&metrics), &TickConfig::default());
    runner.run_tick().await;

    let (base, tx, handle) = spawn_server(Arc::clone(&metrics)).await;

    let response = reqwest::get(format!("{base}/metrics")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.unwrap();
    assert!(body.contains("mongodb_operations_total 2"));
    assert!(body.contains("mongodb_operation_duration_seconds_count 2"));
    #[cfg(target_os = "linux")]
    assert!(body.lines().any(|l| l.starts_with("process_cpu_seconds_total")));

    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let (base, tx, handle) = spawn_server(metrics).await;

    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bind_conflict_is_an_error() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = taken.local_addr().unwrap().to_string();

    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let (_tx, rx) = broadcast::channel(1);
    let result = HttpServer::new(metrics, address).run(rx).await;
    assert!(result.is_err());
}
