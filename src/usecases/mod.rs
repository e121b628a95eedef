//! Use Cases Layer - Application Workflows
//!
//! Orchestrates the store port and the metrics registry.
//!
//! Use cases:
//! - `PeriodicRunner`: Timed ping + insert probes feeding the metrics

pub mod periodic;

pub use periodic::PeriodicRunner;
