//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating sample entities.

use proptest::prelude::*;

use crate::fixtures::Customer;

/// Strategy for generating customer identifiers
pub fn customer_id_strategy() -> impl Strategy<Value = String> {
    "cust-[a-z0-9]{4,12}"
}

/// Strategy for generating email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-z]{2,10}").prop_map(|(user, domain)| format!("{}@{}.test", user, domain))
}

/// Strategy for generating customers
pub fn customer_strategy() -> impl Strategy<Value = Customer> {
    (
        customer_id_strategy(),
        email_strategy(),
        "[A-Z][a-z]{1,10} [A-Z][a-z]{1,10}",
        0i64..100_000i64,
    )
        .prop_map(|(id, email, name, loyalty_points)| Customer {
            id,
            email,
            name,
            loyalty_points,
        })
}

/// Strategy for generating customers with distinct identifiers
pub fn distinct_customers_strategy(max: usize) -> impl Strategy<Value = Vec<Customer>> {
    proptest::collection::vec(customer_strategy(), 0..=max).prop_map(|customers| {
        let mut seen = std::collections::HashSet::new();
        customers
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect()
    })
}
