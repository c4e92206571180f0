//! Collection Registry
//!
//! This module provides the central registry that maps entity types to the
//! collection each one is stored in. Database contexts consult it whenever a
//! repository is built, so every entity type resolves to exactly one
//! collection for the lifetime of the context.
//!
//! # Usage
//!
//! ```rust,ignore
//! use repo_kernel::CollectionRegistry;
//!
//! let registry = CollectionRegistry::new()
//!     .with::<Customer>("customers")?
//!     .with::<Order>("orders")?;
//!
//! assert_eq!(registry.collection_name::<Customer>()?, "customers");
//! ```
//!
//! # Naming Rules
//!
//! Collection names follow MongoDB's restrictions: they must not be empty,
//! must not contain `$` or the NUL character, and must not start with the
//! reserved `system.` prefix. Database names must be non-empty, shorter than
//! 64 bytes and free of `/\. "$*<>:|?` and NUL.

use std::any::TypeId;
use std::collections::HashMap;

use crate::entity::EntityModel;
use crate::error::CoreError;

const DATABASE_NAME_MAX_BYTES: usize = 64;
const DATABASE_NAME_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?', '\0'];

/// Registration information for an entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRegistration {
    /// Short type name of the entity
    pub entity: &'static str,

    /// The collection the entity is stored in
    pub collection: String,
}

/// Maps entity types to collection names
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    entries: HashMap<TypeId, CollectionRegistration>,
}

impl CollectionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the collection for entity type `T`
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AlreadyRegistered` if `T` already has a collection,
    /// or `CoreError::InvalidName` if `collection` is not a valid name.
    pub fn register<T: EntityModel>(&mut self, collection: impl Into<String>) -> Result<&mut Self, CoreError> {
        let collection = collection.into();
        validate_collection_name(&collection)?;

        if let Some(existing) = self.entries.get(&TypeId::of::<T>()) {
            return Err(CoreError::AlreadyRegistered {
                entity: T::entity_name().to_string(),
                collection: existing.collection.clone(),
            });
        }

        self.entries.insert(
            TypeId::of::<T>(),
            CollectionRegistration {
                entity: T::entity_name(),
                collection,
            },
        );
        Ok(self)
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<T: EntityModel>(mut self, collection: impl Into<String>) -> Result<Self, CoreError> {
        self.register::<T>(collection)?;
        Ok(self)
    }

    /// Returns the collection registered for `T`
    pub fn collection_name<T: EntityModel>(&self) -> Result<&str, CoreError> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|entry| entry.collection.as_str())
            .ok_or_else(|| CoreError::not_registered(T::entity_name()))
    }

    /// Returns true if `T` has a registered collection
    pub fn contains<T: EntityModel>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all registrations ordered by collection name
    pub fn registrations(&self) -> Vec<CollectionRegistration> {
        let mut registrations: Vec<_> = self.entries.values().cloned().collect();
        registrations.sort_by(|a, b| {
            a.collection
                .cmp(&b.collection)
                .then_with(|| a.entity.cmp(b.entity))
        });
        registrations
    }
}

/// Checks a collection name against MongoDB's naming restrictions
pub fn validate_collection_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::invalid_name(name, "collection name must not be empty"));
    }
    if name.contains('$') {
        return Err(CoreError::invalid_name(name, "collection name must not contain '$'"));
    }
    if name.contains('\0') {
        return Err(CoreError::invalid_name(name, "collection name must not contain NUL"));
    }
    if name.starts_with("system.") {
        return Err(CoreError::invalid_name(name, "the 'system.' prefix is reserved"));
    }
    Ok(())
}

/// Checks a database name against MongoDB's naming restrictions
pub fn validate_database_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::invalid_name(name, "database name must not be empty"));
    }
    if name.len() >= DATABASE_NAME_MAX_BYTES {
        return Err(CoreError::invalid_name(
            name,
            format!("database name must be shorter than {} bytes", DATABASE_NAME_MAX_BYTES),
        ));
    }
    if let Some(c) = name.chars().find(|c| DATABASE_NAME_FORBIDDEN.contains(c)) {
        return Err(CoreError::invalid_name(
            name,
            format!("database name must not contain {:?}", c),
        ));
    }
    Ok(())
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

    #[test]
    fn test_register_and_lookup() {
        let registry = CollectionRegistry::new()
            .with::<Customer>("customers")
            .unwrap()
            .with::<Order>("orders")
            .unwrap();

        assert_eq!(registry.collection_name::<Customer>().unwrap(), "customers");
        assert_eq!(registry.collection_name::<Order>().unwrap(), "orders");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregistered_entity() {
        let registry = CollectionRegistry::new();
        let error = registry.collection_name::<Customer>().unwrap_err();

        assert_eq!(error, CoreError::NotRegistered("Customer".to_string()));
        assert!(!registry.contains::<Customer>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = CollectionRegistry::new();
        registry.register::<Customer>("customers").unwrap();

        let error = registry.register::<Customer>("clients").unwrap_err();
        assert!(matches!(error, CoreError::AlreadyRegistered { ref collection, .. } if collection == "customers"));
        assert_eq!(registry.collection_name::<Customer>().unwrap(), "customers");
    }

    #[test]
    fn test_two_entities_may_share_a_collection() {
        let registry = CollectionRegistry::new()
            .with::<Customer>("documents")
            .unwrap()
            .with::<Order>("documents")
            .unwrap();

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registrations_are_sorted() {
        let registry = CollectionRegistry::new()
            .with::<Order>("orders")
            .unwrap()
            .with::<Customer>("customers")
            .unwrap();

        let names: Vec<_> = registry
            .registrations()
            .into_iter()
            .map(|r| r.collection)
            .collect();
        assert_eq!(names, vec!["customers", "orders"]);
    }

    #[test]
    fn test_invalid_collection_names() {
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("price$").is_err());
        assert!(validate_collection_name("a\0b").is_err());
        assert!(validate_collection_name("system.users").is_err());
        assert!(validate_collection_name("audit.system").is_ok());
    }

    #[test]
    fn test_invalid_database_names() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name("my db").is_err());
        assert!(validate_database_name("shop.prod").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name(&"a".repeat(63)).is_ok());
        assert!(validate_database_name("shop_prod").is_ok());
    }
}
