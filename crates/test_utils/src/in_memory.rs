//! In-Memory Repository
//!
//! A `RepositoryPort` implementation that keeps entities in a vector, for
//! testing code written against the port without a database. Filters are
//! closures over the entity; sessions stage writes until they are committed.
//!
//! ```rust,ignore
//! let customers = InMemoryRepository::<Customer>::new("customers");
//! customers.insert(CustomerFixtures::ada()).await?;
//!
//! let ada = customers.get_one(predicate(|c: &Customer| c.email == "ada@example.com")).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use repo_kernel::{CoreError, DomainPort, EntityModel, RepositoryPort};
use tokio::sync::RwLock;

/// Closure filter used by [`InMemoryRepository`]
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Wraps a closure as a [`Predicate`]
pub fn predicate<T, F>(f: F) -> Predicate<T>
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Predicate matching every entity
pub fn match_all<T>() -> Predicate<T> {
    Arc::new(|_| true)
}

enum StagedWrite<T> {
    Insert(T),
    Replace {
        filter: Predicate<T>,
        entity: T,
        upsert: bool,
    },
}

/// Writes staged on a session, applied by [`InMemoryRepository::commit`]
pub struct InMemorySession<T> {
    staged: Vec<StagedWrite<T>>,
}

impl<T> InMemorySession<T> {
    /// Number of writes waiting for commit
    pub fn pending(&self) -> usize {
        self.staged.len()
    }
}

impl<T> fmt::Debug for InMemorySession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemorySession")
            .field("pending", &self.staged.len())
            .finish()
    }
}

/// Vector-backed repository for entity type `T`
pub struct InMemoryRepository<T> {
    collection_name: String,
    database_name: String,
    documents: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            collection_name: self.collection_name.clone(),
            database_name: self.database_name.clone(),
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<T> fmt::Debug for InMemoryRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("collection_name", &self.collection_name)
            .field("database_name", &self.database_name)
            .finish_non_exhaustive()
    }
}

impl<T: EntityModel + Clone> InMemoryRepository<T> {
    /// Creates an empty repository for `collection_name` in database "memory"
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            database_name: "memory".to_string(),
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a repository pre-populated with `documents`
    pub fn with_documents(collection_name: impl Into<String>, documents: Vec<T>) -> Self {
        let repository = Self::new(collection_name);
        Self {
            documents: Arc::new(RwLock::new(documents)),
            ..repository
        }
    }

    /// Starts an empty session
    pub fn start_session(&self) -> InMemorySession<T> {
        InMemorySession { staged: Vec::new() }
    }

    /// Applies every staged write in order, atomically with respect to readers
    ///
    /// Returns the number of writes applied.
    pub async fn commit(&self, session: InMemorySession<T>) -> usize {
        let mut documents = self.documents.write().await;
        let applied = session.staged.len();
        for write in session.staged {
            match write {
                StagedWrite::Insert(entity) => documents.push(entity),
                StagedWrite::Replace { filter, entity, upsert } => {
                    replace_first(&mut documents, filter.as_ref(), entity, upsert);
                }
            }
        }
        applied
    }

    /// Discards every staged write
    pub fn abort(&self, session: InMemorySession<T>) -> usize {
        session.staged.len()
    }

    /// Copy of the stored entities in insertion order
    pub async fn snapshot(&self) -> Vec<T> {
        self.documents.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn replace_first<T>(documents: &mut Vec<T>, filter: &(dyn Fn(&T) -> bool + Send + Sync), entity: T, upsert: bool) {
    match documents.iter().position(|d| filter(d)) {
        Some(index) => documents[index] = entity,
        None if upsert => documents.push(entity),
        None => {}
    }
}

impl<T: EntityModel + Clone> DomainPort for InMemoryRepository<T> {}

#[async_trait]
impl<T: EntityModel + Clone> RepositoryPort<T> for InMemoryRepository<T> {
    type Filter = Predicate<T>;
    type Session = InMemorySession<T>;
    type Error = CoreError;

    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn get_one(&self, filter: Predicate<T>) -> Result<Option<T>, CoreError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| filter(d)).cloned())
    }

    async fn get_all(&self) -> Result<Vec<T>, CoreError> {
        Ok(self.snapshot().await)
    }

    async fn get(&self, filter: Predicate<T>) -> Result<Vec<T>, CoreError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| filter(d)).cloned().collect())
    }

    async fn insert(&self, entity: T) -> Result<T, CoreError> {
        self.documents.write().await.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, filter: Predicate<T>) -> Result<Option<T>, CoreError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .iter()
            .position(|d| filter(d))
            .map(|index| documents.remove(index)))
    }

    async fn replace(&self, filter: Predicate<T>, entity: T) -> Result<T, CoreError> {
        let mut documents = self.documents.write().await;
        replace_first(&mut documents, filter.as_ref(), entity.clone(), false);
        Ok(entity)
    }

    async fn insert_or_update(&self, filter: Predicate<T>, entity: T) -> Result<T, CoreError> {
        let mut documents = self.documents.write().await;
        replace_first(&mut documents, filter.as_ref(), entity.clone(), true);
        Ok(entity)
    }

    async fn session_insert(&self, session: &mut InMemorySession<T>, entity: &T) -> Result<(), CoreError> {
        session.staged.push(StagedWrite::Insert(entity.clone()));
        Ok(())
    }

    async fn session_replace(
        &self,
        session: &mut InMemorySession<T>,
        filter: Predicate<T>,
        entity: &T,
    ) -> Result<(), CoreError> {
        session.staged.push(StagedWrite::Replace {
            filter,
            entity: entity.clone(),
            upsert: false,
        });
        Ok(())
    }

    async fn session_insert_or_update(
        &self,
        session: &mut InMemorySession<T>,
        filter: Predicate<T>,
        entity: &T,
    ) -> Result<(), CoreError> {
        session.staged.push(StagedWrite::Replace {
            filter,
            entity: entity.clone(),
            upsert: true,
        });
        Ok(())
    }
}
