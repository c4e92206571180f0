//! Infrastructure MongoDB Layer
//!
//! This crate provides the MongoDB adapter for the repository kernel: a
//! generic repository that forwards CRUD, upsert and session-scoped writes
//! to the official driver.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. A [`MongoDbContext`] binds a
//! driver client to a database and to the collection registry; each
//! [`MongoRepositoryContext<T>`] resolves the collection registered for `T`
//! and delegates every call to the driver through [`CollectionExt`].
//! Connection pooling, wire protocol, write concerns and transactions stay
//! with the driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_mongo::{DatabaseConfig, MongoDbContext, MongoRepositoryContext};
//! use repo_kernel::{CollectionRegistry, RepositoryPort};
//!
//! let registry = CollectionRegistry::new().with::<Customer>("customers")?;
//! let context = MongoDbContext::connect(&DatabaseConfig::new(uri, "shop"), registry).await?;
//!
//! let customers = MongoRepositoryContext::<Customer>::new(&context)?;
//! let all = customers.get_all().await?;
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod extensions;
pub mod repository;
pub mod transaction;

pub use client::{create_client, DatabaseConfig};
pub use config::MongoSettings;
pub use context::MongoDbContext;
pub use error::DatabaseError;
pub use extensions::CollectionExt;
pub use repository::MongoRepositoryContext;
pub use transaction::Transaction;
