//! MongoDB database context
//!
//! The context binds a driver client to one database and to the collection
//! registry. Repositories are built from a context; they resolve their
//! collection through it and never hold connection state of their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_mongo::{DatabaseConfig, MongoDbContext};
//! use repo_kernel::CollectionRegistry;
//!
//! let registry = CollectionRegistry::new().with::<Customer>("customers")?;
//! let context = MongoDbContext::connect(&DatabaseConfig::new(uri, "shop"), registry).await?;
//! let customers = MongoRepositoryContext::<Customer>::new(&context)?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, ClientSession, Collection, Database};
use repo_kernel::{
    validate_database_name, CollectionRegistry, EntityModel, HealthCheckResult, HealthCheckable,
};
use tracing::{debug, info, instrument, warn};

use crate::client::{create_client, DatabaseConfig};
use crate::error::DatabaseError;
use crate::transaction::Transaction;

/// A driver client bound to a database and a collection registry
#[derive(Debug, Clone)]
pub struct MongoDbContext {
    client: Client,
    database: Database,
    registry: Arc<CollectionRegistry>,
}

impl MongoDbContext {
    /// Creates a context over an existing client
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Registry` if `database_name` is not a valid name
    pub fn new(
        client: Client,
        database_name: &str,
        registry: CollectionRegistry,
    ) -> Result<Self, DatabaseError> {
        validate_database_name(database_name)?;

        Ok(Self {
            database: client.database(database_name),
            client,
            registry: Arc::new(registry),
        })
    }

    /// Builds the client from `config` and creates a context for its database
    #[instrument(skip(config, registry), fields(database = %config.database))]
    pub async fn connect(config: &DatabaseConfig, registry: CollectionRegistry) -> Result<Self, DatabaseError> {
        let client = create_client(config).await?;
        let context = Self::new(client, &config.database, registry)?;

        info!(collections = context.registry.len(), "Database context ready");
        Ok(context)
    }

    /// Returns the driver client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the database handle
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Returns the collection registered for `T` together with its name
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Registry` if `T` has no registered collection
    pub fn registered_collection<T: EntityModel>(&self) -> Result<(Collection<T>, String), DatabaseError> {
        let name = self.registry.collection_name::<T>()?;
        debug!(entity = T::entity_name(), collection = name, "Resolved registered collection");

        Ok((self.database.collection::<T>(name), name.to_string()))
    }

    /// Starts a client session for session-scoped repository calls
    pub async fn start_session(&self) -> Result<ClientSession, DatabaseError> {
        Ok(self.client.start_session().await?)
    }

    /// Starts a session and opens a transaction on it
    pub async fn begin_transaction(&self) -> Result<Transaction, DatabaseError> {
        Transaction::begin(&self.client).await
    }
}

#[async_trait]
impl HealthCheckable for MongoDbContext {
    /// Runs `{ ping: 1 }` against the database
    async fn health_check(&self) -> HealthCheckResult {
        let adapter_id = format!("mongodb:{}", self.database_name());
        let start = Instant::now();

        let result = self.database.run_command(doc! { "ping": 1 }).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
            Err(e) => {
                warn!(error = %e, "Health check failed");
                HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Customer {
        email: String,
    }

    impl EntityModel for Customer {}

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Order {
        total: i64,
    }

    impl EntityModel for Order {}

    async fn lazy_client() -> Client {
        // The driver does not connect until the first operation.
        Client::with_uri_str("mongodb://localhost:27017").await.unwrap()
    }

    #[tokio::test]
    async fn test_registered_collection_resolves_name() {
        let registry = CollectionRegistry::new().with::<Customer>("customers").unwrap();
        let context = MongoDbContext::new(lazy_client().await, "shop", registry).unwrap();

        let (collection, name) = context.registered_collection::<Customer>().unwrap();
        assert_eq!(name, "customers");
        assert_eq!(collection.name(), "customers");
        assert_eq!(collection.namespace().db, "shop");
        assert_eq!(context.database_name(), "shop");
    }

    #[tokio::test]
    async fn test_unregistered_collection_fails() {
        let registry = CollectionRegistry::new().with::<Customer>("customers").unwrap();
        let context = MongoDbContext::new(lazy_client().await, "shop", registry).unwrap();

        let error = context.registered_collection::<Order>().unwrap_err();
        assert!(matches!(error, DatabaseError::Registry(_)));
    }

    #[tokio::test]
    async fn test_invalid_database_name_is_rejected() {
        let error = MongoDbContext::new(lazy_client().await, "shop.prod", CollectionRegistry::new()).unwrap_err();
        assert!(matches!(error, DatabaseError::Registry(_)));
    }
}
