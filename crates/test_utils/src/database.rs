//! Database Test Utilities
//!
//! Provides helpers for MongoDB integration tests: a single-node replica set
//! running in a testcontainer (transactions need a replica set) and a
//! context bound to a uniquely named database per test.

use std::time::Duration;

use infra_mongo::MongoDbContext;
use mongodb::bson::{doc, Document};
use mongodb::Client;
use repo_kernel::CollectionRegistry;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use uuid::Uuid;

use crate::fixtures::sample_registry;

/// Default MongoDB image for testing
const MONGO_IMAGE: &str = "mongo";
const MONGO_TAG: &str = "7.0";
const MONGO_PORT: u16 = 27017;
const REPLICA_SET: &str = "rs0";

/// Attempts made while waiting for the node to become primary
const PRIMARY_POLL_ATTEMPTS: u32 = 60;

type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Connection details of a running test server
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl TestDatabaseConfig {
    /// Creates the connection URI
    ///
    /// The node advertises its in-container address, so the client must
    /// connect directly instead of discovering the replica set.
    pub fn connection_uri(&self) -> String {
        format!("mongodb://{}:{}/?directConnection=true", self.host, self.port)
    }
}

/// A MongoDB container plus a context on a fresh database
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub context: MongoDbContext,
}

impl TestDatabase {
    /// Starts a container with the sample registry
    pub async fn new() -> TestResult<Self> {
        Self::with_registry(sample_registry()).await
    }

    /// Starts a container and binds a context using `registry`
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or the replica set
    /// never elects a primary
    pub async fn with_registry(registry: CollectionRegistry) -> TestResult<Self> {
        let container = GenericImage::new(MONGO_IMAGE, MONGO_TAG)
            .with_exposed_port(MONGO_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .with_cmd(["--replSet", REPLICA_SET, "--bind_ip_all"])
            .start()
            .await?;

        let port = container.get_host_port_ipv4(MONGO_PORT).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            database: unique_database_name(),
        };

        let client = Client::with_uri_str(config.connection_uri()).await?;
        initiate_replica_set(&client).await?;

        let context = MongoDbContext::new(client, &config.database, registry)?;

        Ok(Self {
            _container: container,
            config,
            context,
        })
    }

    /// Returns the context bound to this test's database
    pub fn context(&self) -> &MongoDbContext {
        &self.context
    }

    /// Deletes every document from the registered collections
    ///
    /// The collections themselves are kept so later transactions do not
    /// have to create them.
    pub async fn clear_data(&self) -> TestResult<()> {
        for registration in self.context.registry().registrations() {
            self.context
                .database()
                .collection::<Document>(&registration.collection)
                .delete_many(doc! {})
                .await?;
        }

        Ok(())
    }

    /// Creates every registered collection up front
    pub async fn create_collections(&self) -> TestResult<()> {
        create_registered_collections(&self.context).await
    }

    /// Binds a new context to a fresh database on the same server
    ///
    /// Lets one test work against several databases without another container.
    pub async fn fresh_context(&self) -> TestResult<MongoDbContext> {
        let context = MongoDbContext::new(
            self.context.client().clone(),
            &unique_database_name(),
            self.context.registry().clone(),
        )?;
        create_registered_collections(&context).await?;
        Ok(context)
    }
}

async fn create_registered_collections(context: &MongoDbContext) -> TestResult<()> {
    let existing = context.database().list_collection_names().await?;
    for registration in context.registry().registrations() {
        if !existing.contains(&registration.collection) {
            context.database().create_collection(&registration.collection).await?;
        }
    }

    Ok(())
}

/// Generates a database name unique to one test run
pub fn unique_database_name() -> String {
    format!("test_{}", Uuid::new_v4().simple())
}

async fn initiate_replica_set(client: &Client) -> TestResult<()> {
    let admin = client.database("admin");
    admin
        .run_command(doc! {
            "replSetInitiate": {
                "_id": REPLICA_SET,
                "members": [{ "_id": 0, "host": format!("localhost:{}", MONGO_PORT) }],
            }
        })
        .await?;

    for _ in 0..PRIMARY_POLL_ATTEMPTS {
        let hello = admin.run_command(doc! { "hello": 1 }).await?;
        if hello.get_bool("isWritablePrimary").unwrap_or(false) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err("replica set did not elect a primary".into())
}

/// Creates an isolated test database for a single test
///
/// The driver's background tasks live on the runtime that created the
/// client, so every `#[tokio::test]` starts its own container.
pub async fn create_isolated_test_database() -> TestResult<TestDatabase> {
    TestDatabase::new().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_uri_is_direct() {
        let config = TestDatabaseConfig {
            host: "localhost".to_string(),
            port: 49153,
            database: unique_database_name(),
        };

        assert_eq!(
            config.connection_uri(),
            "mongodb://localhost:49153/?directConnection=true"
        );
    }

    #[test]
    fn test_unique_database_names_are_valid() {
        let first = unique_database_name();
        let second = unique_database_name();

        assert_ne!(first, second);
        assert!(repo_kernel::validate_database_name(&first).is_ok());
    }
}
