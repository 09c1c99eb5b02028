//! Repository layer for data access.

pub mod entities;
mod customer_repository;
mod in_memory_repository;

pub use customer_repository::{CustomerRepository, CustomerStore};
pub use in_memory_repository::{InMemoryCustomerStore, SAMPLE_PASSWORD};

#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
