//! Structured JSON logging setup.
//!
//! `RUST_LOG` wins over the configured level. The subscriber can be
//! installed before the config is loaded so config errors are logged
//! too.

use tracing_subscriber::EnvFilter;

/// Level used until (or unless) the config supplies one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the filter from an optional `RUST_LOG` value and a fallback level.
pub fn env_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

/// Install the global JSON subscriber. Later calls are no-ops.
pub fn init_tracing(level: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref(), level))
        .json()
        .try_init();
}
