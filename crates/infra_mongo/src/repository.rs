//! Generic MongoDB repository
//!
//! [`MongoRepositoryContext`] implements [`RepositoryPort`] for any
//! registered entity type. It resolves its collection once, at construction,
//! and forwards every operation to a [`CollectionExt`] helper.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_mongo::MongoRepositoryContext;
//! use mongodb::bson::doc;
//! use repo_kernel::RepositoryPort;
//!
//! let customers = MongoRepositoryContext::<Customer>::new(&context)?;
//! customers.insert(customer).await?;
//!
//! let found = customers.get_one(doc! { "email": "ada@example.com" }).await?;
//! ```
//!
//! # Sessions
//!
//! Session-scoped operations resolve the collection through the session's
//! own client and hand the session to the driver, so the write joins the
//! session's transaction:
//!
//! ```rust,ignore
//! let mut tx = context.begin_transaction().await?;
//! customers.session_insert(tx.session(), &customer).await?;
//! tx.commit().await?;
//! ```

use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::{ClientSession, Collection};
use repo_kernel::{DomainPort, EntityModel, RepositoryPort};
use tracing::instrument;

use crate::context::MongoDbContext;
use crate::error::DatabaseError;
use crate::extensions::CollectionExt;

/// MongoDB-backed repository for entity type `T`
#[derive(Debug)]
pub struct MongoRepositoryContext<T: EntityModel> {
    context: MongoDbContext,
    collection: Collection<T>,
    collection_name: String,
    database_name: String,
}

impl<T: EntityModel> Clone for MongoRepositoryContext<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            collection: self.collection.clone(),
            collection_name: self.collection_name.clone(),
            database_name: self.database_name.clone(),
        }
    }
}

impl<T: EntityModel> MongoRepositoryContext<T> {
    /// Creates a repository for the collection registered for `T`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Registry` if `T` has no registered collection
    pub fn new(context: &MongoDbContext) -> Result<Self, DatabaseError> {
        let (collection, collection_name) = context.registered_collection::<T>()?;

        Ok(Self {
            context: context.clone(),
            collection,
            collection_name,
            database_name: context.database_name().to_string(),
        })
    }

    /// Returns the database context this repository was built from
    pub fn context(&self) -> &MongoDbContext {
        &self.context
    }

    /// Returns the underlying typed collection
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// The same collection, reached through the session's client
    fn session_collection(&self, session: &ClientSession) -> Collection<T> {
        session
            .client()
            .database(&self.database_name)
            .collection::<T>(&self.collection_name)
    }
}

impl<T: EntityModel> DomainPort for MongoRepositoryContext<T> {}

#[async_trait]
impl<T: EntityModel> RepositoryPort<T> for MongoRepositoryContext<T> {
    type Filter = Document;
    type Session = ClientSession;
    type Error = DatabaseError;

    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn get_one(&self, filter: Document) -> Result<Option<T>, DatabaseError> {
        self.collection.get_by(filter).await
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn get_all(&self) -> Result<Vec<T>, DatabaseError> {
        self.collection.get_all().await
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn get(&self, filter: Document) -> Result<Vec<T>, DatabaseError> {
        self.collection.get_all_matching(filter).await
    }

    #[instrument(skip(self, entity), fields(collection = %self.collection_name))]
    async fn insert(&self, entity: T) -> Result<T, DatabaseError> {
        self.collection.insert(entity).await
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn delete(&self, filter: Document) -> Result<Option<T>, DatabaseError> {
        self.collection.delete(filter).await
    }

    #[instrument(skip(self, entity), fields(collection = %self.collection_name))]
    async fn replace(&self, filter: Document, entity: T) -> Result<T, DatabaseError> {
        self.collection.replace(filter, entity).await
    }

    #[instrument(skip(self, entity), fields(collection = %self.collection_name))]
    async fn insert_or_update(&self, filter: Document, entity: T) -> Result<T, DatabaseError> {
        self.collection.upsert(filter, entity).await
    }

    #[instrument(skip(self, session, entity), fields(collection = %self.collection_name))]
    async fn session_insert(&self, session: &mut ClientSession, entity: &T) -> Result<(), DatabaseError> {
        self.session_collection(session).insert_in(session, entity).await
    }

    #[instrument(skip(self, session, entity), fields(collection = %self.collection_name))]
    async fn session_replace(
        &self,
        session: &mut ClientSession,
        filter: Document,
        entity: &T,
    ) -> Result<(), DatabaseError> {
        self.session_collection(session)
            .replace_in(session, filter, entity)
            .await
    }

    #[instrument(skip(self, session, entity), fields(collection = %self.collection_name))]
    async fn session_insert_or_update(
        &self,
        session: &mut ClientSession,
        filter: Document,
        entity: &T,
    ) -> Result<(), DatabaseError> {
        self.session_collection(session)
            .upsert_in(session, filter, entity)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;
    use repo_kernel::CollectionRegistry;
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

    async fn context() -> MongoDbContext {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        let registry = CollectionRegistry::new().with::<Customer>("customers").unwrap();
        MongoDbContext::new(client, "shop", registry).unwrap()
    }

    #[tokio::test]
    async fn test_repository_records_names() {
        let repository = MongoRepositoryContext::<Customer>::new(&context().await).unwrap();

        assert_eq!(repository.collection_name(), "customers");
        assert_eq!(repository.database_name(), "shop");
        assert_eq!(repository.collection().name(), "customers");
    }

    #[tokio::test]
    async fn test_repository_requires_registration() {
        let error = MongoRepositoryContext::<Order>::new(&context().await).unwrap_err();
        assert!(matches!(error, DatabaseError::Registry(_)));
    }
}
