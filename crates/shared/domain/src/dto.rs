//! Request types and the external customer view.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::customer::{Customer, Gender};

/// Customer registration data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerRegistrationRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    /// Email address, also the login identifier
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plain text password, hashed before it reaches storage
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
    pub age: i32,
    pub gender: Gender,
}

/// Partial customer update.
///
/// Absent fields keep their current value. Present fields follow the same
/// rules as registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CustomerUpdateRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

/// Customer view (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: i32,
    /// Authority names, in grant order
    pub authorities: Vec<String>,
    /// Login identifier
    pub username: String,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            gender: customer.gender,
            age: customer.age,
            authorities: customer
                .authorities()
                .iter()
                .map(|authority| authority.name().to_string())
                .collect(),
            username: customer.username().to_string(),
        }
    }
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        CustomerDto::from(&customer)
    }
}
