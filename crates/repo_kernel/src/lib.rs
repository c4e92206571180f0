//! Repository Kernel - Driver-agnostic building blocks for document repositories
//!
//! This crate provides the abstractions shared by every storage adapter:
//! - The entity model marker for records stored as one document
//! - The collection registry mapping entity types to collection names
//! - The repository port implemented by database and in-memory adapters

pub mod entity;
pub mod error;
pub mod ports;
pub mod registry;

pub use entity::EntityModel;
pub use error::CoreError;
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, RepositoryPort};
pub use registry::{
    validate_collection_name, validate_database_name, CollectionRegistration, CollectionRegistry,
};
