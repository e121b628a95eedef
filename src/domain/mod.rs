//! Domain layer - probe events and tick outcomes.
//!
//! Plain data types shared by the runner, the store port and the
//! adapters. No I/O happens here.

pub mod event;

pub use event::{EventDocument, Operation, TickOutcome};
