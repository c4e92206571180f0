//! Pre-built Test Fixtures
//!
//! Provides sample entity types and ready-to-use instances. The named
//! fixtures are fixed and predictable; the `random_*` ones use `fake`.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use repo_kernel::{CollectionRegistry, EntityModel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection used for [`Customer`] in test registries
pub const CUSTOMERS: &str = "customers";

/// Collection used for [`Order`] in test registries
pub const ORDERS: &str = "orders";

/// Sample entity with a string identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub loyalty_points: i64,
}

impl EntityModel for Customer {}

/// Sample entity referencing a customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub number: i64,
    pub customer_id: String,
    pub total_cents: i64,
    pub status: String,
}

impl EntityModel for Order {}

/// Registry with both sample entities registered
pub fn sample_registry() -> CollectionRegistry {
    CollectionRegistry::new()
        .with::<Customer>(CUSTOMERS)
        .and_then(|r| r.with::<Order>(ORDERS))
        .expect("sample collection names are valid")
}

/// Fixture for customer test data
pub struct CustomerFixtures;

impl CustomerFixtures {
    pub fn ada() -> Customer {
        Customer {
            id: "cust-ada".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada Lovelace".to_string(),
            loyalty_points: 120,
        }
    }

    pub fn grace() -> Customer {
        Customer {
            id: "cust-grace".to_string(),
            email: "grace@example.com".to_string(),
            name: "Grace Hopper".to_string(),
            loyalty_points: 0,
        }
    }

    /// Customer with a random identifier, name and email
    pub fn random() -> Customer {
        Customer {
            id: Uuid::new_v4().to_string(),
            email: SafeEmail().fake(),
            name: Name().fake(),
            loyalty_points: (0..10_000i64).fake(),
        }
    }
}

/// Fixture for order test data
pub struct OrderFixtures;

impl OrderFixtures {
    /// An open order for the given customer
    pub fn pending(customer: &Customer, number: i64) -> Order {
        Order {
            id: format!("order-{}", number),
            number,
            customer_id: customer.id.clone(),
            total_cents: 4_999,
            status: "pending".to_string(),
        }
    }

    /// A random order for the given customer
    pub fn random(customer: &Customer) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            number: (1..1_000_000i64).fake(),
            customer_id: customer.id.clone(),
            total_cents: (100..500_000i64).fake(),
            status: "pending".to_string(),
        }
    }
}
