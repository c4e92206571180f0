//! Test Data Builders
//!
//! Provides builder patterns for constructing test entities with sensible
//! defaults. Tests specify only the fields they care about.

use crate::fixtures::{Customer, CustomerFixtures, Order, OrderFixtures};

/// Builder for constructing test customers
pub struct CustomerBuilder {
    customer: Customer,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerBuilder {
    /// Creates a new builder starting from a random customer
    pub fn new() -> Self {
        Self {
            customer: CustomerFixtures::random(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.customer.id = id.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer.email = email.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.customer.name = name.into();
        self
    }

    pub fn with_loyalty_points(mut self, points: i64) -> Self {
        self.customer.loyalty_points = points;
        self
    }

    pub fn build(self) -> Customer {
        self.customer
    }
}

/// Builder for constructing test orders
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    /// Creates a new builder for a random order placed by `customer`
    pub fn for_customer(customer: &Customer) -> Self {
        Self {
            order: OrderFixtures::random(customer),
        }
    }

    pub fn with_number(mut self, number: i64) -> Self {
        self.order.number = number;
        self
    }

    pub fn with_total_cents(mut self, total: i64) -> Self {
        self.order.total_cents = total;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.order.status = status.into();
        self
    }

    pub fn build(self) -> Order {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_builder_overrides() {
        let customer = CustomerBuilder::new()
            .with_id("cust-1")
            .with_email("one@example.com")
            .with_loyalty_points(5)
            .build();

        assert_eq!(customer.id, "cust-1");
        assert_eq!(customer.email, "one@example.com");
        assert_eq!(customer.loyalty_points, 5);
        assert!(!customer.name.is_empty());
    }

    #[test]
    fn test_order_builder_links_customer() {
        let customer = CustomerFixtures::ada();
        let order = OrderBuilder::for_customer(&customer)
            .with_number(42)
            .with_status("shipped")
            .build();

        assert_eq!(order.customer_id, "cust-ada");
        assert_eq!(order.number, 42);
        assert_eq!(order.status, "shipped");
    }
}
