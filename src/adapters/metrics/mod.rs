//! Metrics and Monitoring Adapters
//!
//! Prometheus registry for the probe instruments and the axum server
//! exposing `/metrics` alongside the `/ping` liveness probe.

pub mod prometheus;
pub mod server;

pub use prometheus::MetricsRegistry;
pub use server::HttpServer;
