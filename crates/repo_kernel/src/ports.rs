//! Ports and Adapters Infrastructure
//!
//! This module defines the repository port that every storage adapter
//! implements, together with the health-check types shared by adapters.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │            (services holding a RepositoryPort<T>)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  RepositoryPort<T> trait                     │
//! │   Filter / Session / Error chosen by each adapter            │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  MongoDB Adapter  │     │ In-Memory Adapter│
//!         │   (infra_mongo)   │     │   (test_utils)   │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! pub struct CustomerService<R: RepositoryPort<Customer>> {
//!     customers: R,
//! }
//!
//! impl<R: RepositoryPort<Customer>> CustomerService<R> {
//!     pub async fn register(&self, customer: Customer) -> Result<Customer, R::Error> {
//!         self.customers.insert(customer).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entity::EntityModel;

/// Marker trait for all ports
///
/// All port implementations must be thread-safe so they can be shared
/// across async tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// Generic repository contract for one entity type
///
/// Each adapter picks how predicates are expressed (`Filter`), what
/// represents a transactional context (`Session`), and which error it
/// reports. Operations never reinterpret adapter failures; they are
/// returned as-is.
#[async_trait]
pub trait RepositoryPort<T: EntityModel>: DomainPort {
    /// Predicate selecting documents
    type Filter: Send + Sync + 'static;

    /// Transactional context threaded through session-scoped writes
    type Session: Send;

    /// Failure reported by the adapter
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name of the collection backing this repository
    fn collection_name(&self) -> &str;

    /// Name of the database holding the collection
    fn database_name(&self) -> &str;

    /// Returns the first entity matching `filter`
    async fn get_one(&self, filter: Self::Filter) -> Result<Option<T>, Self::Error>;

    /// Returns every entity in the collection
    async fn get_all(&self) -> Result<Vec<T>, Self::Error>;

    /// Returns every entity matching `filter`
    async fn get(&self, filter: Self::Filter) -> Result<Vec<T>, Self::Error>;

    /// Stores a new entity and hands it back
    async fn insert(&self, entity: T) -> Result<T, Self::Error>;

    /// Removes the first entity matching `filter`, returning it if one existed
    async fn delete(&self, filter: Self::Filter) -> Result<Option<T>, Self::Error>;

    /// Replaces the first entity matching `filter`
    ///
    /// Nothing is written when no entity matches; the given entity is
    /// returned either way.
    async fn replace(&self, filter: Self::Filter, entity: T) -> Result<T, Self::Error>;

    /// Replaces the first entity matching `filter`, inserting it when none matches
    async fn insert_or_update(&self, filter: Self::Filter, entity: T) -> Result<T, Self::Error>;

    /// Stores a new entity inside the session's transaction
    async fn session_insert(&self, session: &mut Self::Session, entity: &T) -> Result<(), Self::Error>;

    /// Replaces the first matching entity inside the session's transaction
    async fn session_replace(
        &self,
        session: &mut Self::Session,
        filter: Self::Filter,
        entity: &T,
    ) -> Result<(), Self::Error>;

    /// Upserts inside the session's transaction
    async fn session_insert_or_update(
        &self,
        session: &mut Self::Session,
        filter: Self::Filter,
        entity: &T,
    ) -> Result<(), Self::Error>;
}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// The backing store answered the probe
    Healthy,
    /// The probe failed or timed out
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier, e.g. `mongodb:shop`
    pub adapter_id: String,
    pub status: AdapterHealth,
    /// Round-trip time of the probe
    pub latency_ms: u64,
    /// Failure detail for unhealthy results
    pub message: Option<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Adapters that can probe their backing store
#[async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Probes the store once; never fails, errors become an unhealthy result
    async fn health_check(&self) -> HealthCheckResult;
}
