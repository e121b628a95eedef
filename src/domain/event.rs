//! Probe event and tick outcome types.
//!
//! `EventDocument` is the only shape written to the store. It is
//! created fresh for every insert and never read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single periodic event persisted by the insert probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDocument {
    /// Creation time, stored as a native BSON datetime.
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    /// Emitting service name.
    pub source: String,
    /// Free-form message.
    pub message: String,
}

impl EventDocument {
    /// Build an event stamped with the current time.
    pub fn now(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Store operation performed by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ping,
    Insert,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::Insert => write!(f, "insert"),
        }
    }
}

/// Which operations of one tick succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub ping_ok: bool,
    pub insert_ok: bool,
}

impl TickOutcome {
    /// Number of successful operations, i.e. how far the counter moved.
    pub fn successes(&self) -> u64 {
        u64::from(self.ping_ok) + u64::from(self.insert_ok)
    }
}
