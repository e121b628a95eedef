//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies.
//!
//! Adapter categories:
//! - `metrics`: Prometheus registry and the HTTP front door
//! - `mongo`: MongoDB driver-backed event store

pub mod metrics;
pub mod mongo;
