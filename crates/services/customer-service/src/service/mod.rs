//! Service layer - customer business rules.

mod customer_service;

pub use customer_service::{CustomerManager, CustomerService};
