//! MongoDB Adapter
//!
//! Implements the `EventStore` port with the official async driver.

pub mod store;

pub use store::MongoStore;
