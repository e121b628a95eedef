//! MongoDB Event Store - Connection Management and Probe Operations
//!
//! Owns the single driver handle for the process lifetime. Validates
//! connectivity at startup with an `admin` ping bounded by the
//! configured timeout, then serves the runner's ping/insert probes.

use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{info, instrument};

use crate::config::MongoConfig;
use crate::domain::event::EventDocument;
use crate::ports::store::{EventStore, StoreError};

/// Database the administrative ping runs against.
const ADMIN_DB: &str = "admin";

/// Shared MongoDB handle backing the [`EventStore`] port.
///
/// The driver pools connections internally; one instance is shared by
/// `Arc` between the runner and shutdown.
pub struct MongoStore {
    /// Driver client (one per process).
    client: Client,
    /// Target collection for probe events.
    events: Collection<EventDocument>,
}

impl MongoStore {
    /// Connect to MongoDB and verify the server answers a ping.
    ///
    /// Option parsing, connection establishment and the ping share one
    /// time bound (`connect_timeout_secs`). No retries.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the URI is invalid, the server cannot
    /// be reached or the ping fails within the bound.
    #[instrument(skip_all, fields(database = %config.database, collection = %config.collection))]
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let bound = config.connect_timeout();

        let store = tokio::time::timeout(bound, Self::establish(config, bound))
            .await
            .map_err(|_| StoreError::Timeout(bound))??;

        info!("Connected to MongoDB successfully");
        Ok(store)
    }

    async fn establish(config: &MongoConfig, bound: Duration) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::InvalidUri(e.to_string()))?;
        options.connect_timeout = Some(bound);
        options.server_selection_timeout = Some(bound);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        run_ping(&client)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        let events = client
            .database(&config.database)
            .collection::<EventDocument>(&config.collection);

        Ok(Self { client, events })
    }

    /// Release the driver's connection pools.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }
}

async fn run_ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database(ADMIN_DB)
        .run_command(doc! { "ping": 1 }, None)
        .await?;
    Ok(())
}

#[async_trait]
impl EventStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        run_ping(&self.client)
            .await
            .map_err(|e| StoreError::Command(e.to_string()))
    }

    async fn insert_event(&self, event: &EventDocument) -> Result<(), StoreError> {
        self.events
            .insert_one(event, None)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Command(e.to_string()))
    }
}
