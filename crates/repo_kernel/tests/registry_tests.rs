//! Tests for the collection registry and naming rules

use proptest::prelude::*;
use repo_kernel::{validate_collection_name, validate_database_name, CollectionRegistry, CoreError, EntityModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Ledger {
    entries: Vec<i64>,
}

impl EntityModel for Ledger {}

#[test]
fn test_register_rejects_reserved_prefix() {
    let mut registry = CollectionRegistry::new();
    let error = registry.register::<Ledger>("system.ledger").unwrap_err();

    assert!(matches!(error, CoreError::InvalidName { .. }));
    assert!(registry.is_empty());
}

#[test]
fn test_registration_reports_entity_name() {
    let registry = CollectionRegistry::new().with::<Ledger>("ledgers").unwrap();
    let registrations = registry.registrations();

    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].entity, "Ledger");
    assert_eq!(registrations[0].collection, "ledgers");
}

#[test]
fn test_not_registered_display() {
    let error = CollectionRegistry::new().collection_name::<Ledger>().unwrap_err();
    assert_eq!(error.to_string(), "No collection registered for entity Ledger");
}

proptest! {
    #[test]
    fn plain_collection_names_are_valid(name in "[a-zA-Z_][a-zA-Z0-9_.]{0,40}") {
        prop_assume!(!name.starts_with("system."));
        prop_assert!(validate_collection_name(&name).is_ok());
    }

    #[test]
    fn collection_names_with_dollar_are_rejected(prefix in "[a-z]{0,10}", suffix in "[a-z]{0,10}") {
        let name = format!("{}${}", prefix, suffix);
        prop_assert!(validate_collection_name(&name).is_err());
    }

    #[test]
    fn short_alphanumeric_database_names_are_valid(name in "[a-zA-Z0-9_-]{1,63}") {
        prop_assert!(validate_database_name(&name).is_ok());
    }

    #[test]
    fn dotted_database_names_are_rejected(left in "[a-z]{1,20}", right in "[a-z]{1,20}") {
        let name = format!("{}.{}", left, right);
        prop_assert!(validate_database_name(&name).is_err());
    }
}
