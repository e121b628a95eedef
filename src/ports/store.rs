//! Event Store Port - Database Probe Interface
//!
//! The periodic runner only needs two things from the database: a
//! cheap administrative round trip and a single-document write.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::EventDocument;

/// Errors surfaced by an event store.
///
/// The runner treats every variant the same way; the split exists for
/// startup diagnostics and log readability.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection string could not be parsed.
    #[error("invalid connection string: {0}")]
    InvalidUri(String),
    /// Establishing the connection failed.
    #[error("connection failed: {0}")]
    Connect(String),
    /// An operation exceeded its time bound.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// A command or write was rejected or failed in transit.
    #[error("command failed: {0}")]
    Command(String),
}

/// Trait for the database the runner probes.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Issue an administrative ping.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Persist one event document.
    async fn insert_event(&self, event: &EventDocument) -> Result<(), StoreError>;
}
