//! Collection extension helpers
//!
//! Thin helpers on [`mongodb::Collection`] that turn common driver calls
//! into entity-shaped results. Each helper is one driver call; failures are
//! returned exactly as the driver reports them.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{ClientSession, Collection};
use repo_kernel::EntityModel;
use tracing::debug;

use crate::error::DatabaseError;

/// Entity-shaped helpers over a typed collection
#[async_trait]
pub trait CollectionExt<T: EntityModel> {
    /// First document matching `filter`
    async fn get_by(&self, filter: Document) -> Result<Option<T>, DatabaseError>;

    /// Every document in the collection
    async fn get_all(&self) -> Result<Vec<T>, DatabaseError>;

    /// Every document matching `filter`
    async fn get_all_matching(&self, filter: Document) -> Result<Vec<T>, DatabaseError>;

    /// Inserts `entity` and returns it
    async fn insert(&self, entity: T) -> Result<T, DatabaseError>;

    /// Deletes the first document matching `filter` and returns it
    async fn delete(&self, filter: Document) -> Result<Option<T>, DatabaseError>;

    /// Replaces the first document matching `filter` and returns `entity`
    async fn replace(&self, filter: Document, entity: T) -> Result<T, DatabaseError>;

    /// Replaces the first document matching `filter`, inserting when none matches
    async fn upsert(&self, filter: Document, entity: T) -> Result<T, DatabaseError>;

    /// Inserts `entity` as part of the session's transaction
    async fn insert_in(&self, session: &mut ClientSession, entity: &T) -> Result<(), DatabaseError>;

    /// Replaces the first match as part of the session's transaction
    async fn replace_in(&self, session: &mut ClientSession, filter: Document, entity: &T) -> Result<(), DatabaseError>;

    /// Upserts as part of the session's transaction
    async fn upsert_in(&self, session: &mut ClientSession, filter: Document, entity: &T) -> Result<(), DatabaseError>;
}

#[async_trait]
impl<T: EntityModel> CollectionExt<T> for Collection<T> {
    async fn get_by(&self, filter: Document) -> Result<Option<T>, DatabaseError> {
        Ok(self.find_one(filter).await?)
    }

    async fn get_all(&self) -> Result<Vec<T>, DatabaseError> {
        self.get_all_matching(doc! {}).await
    }

    async fn get_all_matching(&self, filter: Document) -> Result<Vec<T>, DatabaseError> {
        let cursor = self.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, entity: T) -> Result<T, DatabaseError> {
        let result = self.insert_one(&entity).await?;
        debug!(collection = self.name(), inserted_id = %result.inserted_id, "Inserted document");
        Ok(entity)
    }

    async fn delete(&self, filter: Document) -> Result<Option<T>, DatabaseError> {
        Ok(self.find_one_and_delete(filter).await?)
    }

    async fn replace(&self, filter: Document, entity: T) -> Result<T, DatabaseError> {
        let result = self.replace_one(filter, &entity).await?;
        debug!(
            collection = self.name(),
            matched = result.matched_count,
            modified = result.modified_count,
            "Replaced document"
        );
        Ok(entity)
    }

    async fn upsert(&self, filter: Document, entity: T) -> Result<T, DatabaseError> {
        let result = self.replace_one(filter, &entity).upsert(true).await?;
        debug!(
            collection = self.name(),
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "Upserted document"
        );
        Ok(entity)
    }

    async fn insert_in(&self, session: &mut ClientSession, entity: &T) -> Result<(), DatabaseError> {
        self.insert_one(entity).session(&mut *session).await?;
        Ok(())
    }

    async fn replace_in(&self, session: &mut ClientSession, filter: Document, entity: &T) -> Result<(), DatabaseError> {
        self.replace_one(filter, entity).session(&mut *session).await?;
        Ok(())
    }

    async fn upsert_in(&self, session: &mut ClientSession, filter: Document, entity: &T) -> Result<(), DatabaseError> {
        self.replace_one(filter, entity)
            .upsert(true)
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
