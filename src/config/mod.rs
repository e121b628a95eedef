//! Configuration Module - TOML-based Monitor Configuration
//!
//! Loads configuration from an optional `config.toml` with the
//! `MONGO_URI` environment variable taking precedence for the
//! connection string. Every field has a default so the service
//! runs with no file at all.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

/// Connection string used when neither the file nor `MONGO_URI` set one.
pub const DEFAULT_MONGO_URI: &str = "mongodb://mongo:27017";

/// Top-level monitor configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// MongoDB connection settings.
  pub mongo: MongoConfig,
  /// Periodic probe settings.
  pub tick: TickConfig,
  /// HTTP front door settings.
  pub server: ServerConfig,
  /// Logging settings.
  pub log: LogConfig,
}

/// MongoDB connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
  /// Connection string.
  pub uri: String,
  /// Database receiving probe events.
  pub database: String,
  /// Collection receiving probe events.
  pub collection: String,
  /// Upper bound on connect + initial ping (seconds).
  pub connect_timeout_secs: u64,
}

impl MongoConfig {
  /// Startup connection bound as a `Duration`.
  pub const fn connect_timeout(&self) -> Duration {
    Duration::from_secs(self.connect_timeout_secs)
  }
}

impl Default for MongoConfig {
  fn default() -> Self {
    Self {
      uri: DEFAULT_MONGO_URI.to_string(),
      database: "monitoring".to_string(),
      collection: "events".to_string(),
      connect_timeout_secs: 10,
    }
  }
}

/// Periodic probe configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickConfig {
  /// Seconds between ticks.
  pub interval_secs: u64,
  /// `source` field written on every event document.
  pub source: String,
  /// `message` field written on every event document.
  pub message: String,
}

impl TickConfig {
  /// Tick period as a `Duration`.
  pub const fn interval(&self) -> Duration {
    Duration::from_secs(self.interval_secs)
  }
}

impl Default for TickConfig {
  fn default() -> Self {
    Self {
      interval_secs: 5,
      source: "go-app".to_string(),
      message: "Periodic event".to_string(),
    }
  }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Listen address for /ping and /metrics.
  pub bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: "0.0.0.0:8080".to_string(),
    }
  }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  pub level: String,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
    }
  }
}
