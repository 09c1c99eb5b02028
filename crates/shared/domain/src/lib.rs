//! Domain layer - Customer entity, request types and the external view.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Storage backends and the customer service build on the types defined here.

pub mod constants;
pub mod customer;
pub mod dto;
pub mod error;
pub mod password;

pub use constants::*;
pub use customer::{Authority, Customer, Gender};
pub use dto::{CustomerDto, CustomerRegistrationRequest, CustomerUpdateRequest};
pub use error::{DomainError, DomainResult};
pub use password::{Argon2PasswordEncoder, PasswordEncoder};
