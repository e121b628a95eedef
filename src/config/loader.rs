//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! The config file is optional: a missing file yields the defaults,
//! while an unreadable or malformed one is a startup error.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::{AppConfig, DEFAULT_MONGO_URI};

/// Environment variable carrying the MongoDB connection string.
pub const MONGO_URI_ENV: &str = "MONGO_URI";

/// Environment variable naming the config file path.
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG";

/// Config file read when `MONITOR_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load configuration from `path` (if it exists) and the environment.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed,
/// or if validation fails.
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = if path.exists() {
    std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?
  } else {
    debug!(path = %path.display(), "No config file, using defaults");
    String::new()
  };

  let env_uri = std::env::var(MONGO_URI_ENV).ok();
  parse_config(&content, env_uri.as_deref())
}

/// Parse TOML content, apply the `MONGO_URI` override and validate.
///
/// # Errors
/// Returns an error on malformed TOML or invalid values.
pub fn parse_config(content: &str, env_uri: Option<&str>) -> Result<AppConfig> {
  let mut config: AppConfig =
    toml::from_str(content).context("Failed to parse config.toml")?;

  config.mongo.uri = resolve_mongo_uri(&config.mongo.uri, env_uri);

  validate_config(&config)?;
  Ok(config)
}

/// Pick the connection string: a non-empty env value wins, then the
/// configured value, then [`DEFAULT_MONGO_URI`]. Only an empty string
/// counts as unset; other values pass through untouched.
pub fn resolve_mongo_uri(configured: &str, env_uri: Option<&str>) -> String {
  match env_uri {
    Some(uri) if !uri.is_empty() => uri.to_string(),
    _ if !configured.is_empty() => configured.to_string(),
    _ => DEFAULT_MONGO_URI.to_string(),
  }
}

fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.mongo.database.is_empty(),
    "mongo.database must not be empty"
  );
  anyhow::ensure!(
    !config.mongo.collection.is_empty(),
    "mongo.collection must not be empty"
  );
  anyhow::ensure!(
    config.mongo.connect_timeout_secs > 0,
    "mongo.connect_timeout_secs must be positive"
  );
  anyhow::ensure!(
    config.tick.interval_secs > 0,
    "tick.interval_secs must be positive"
  );
  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| {
      format!("Invalid server.bind_address: {}", config.server.bind_address)
    })?;

  Ok(())
}
