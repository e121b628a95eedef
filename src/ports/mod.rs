//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `EventStore`: Database ping and event insert

pub mod store;

pub use store::{EventStore, StoreError};
