//! Customer domain entity and related types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{GENDER_FEMALE, GENDER_MALE, ROLE_USER};
use crate::error::DomainError;

/// Customer gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => GENDER_MALE,
            Gender::Female => GENDER_FEMALE,
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            GENDER_MALE => Ok(Gender::Male),
            GENDER_FEMALE => Ok(Gender::Female),
            other => Err(DomainError::validation(format!("unknown gender [{}]", other))),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A permission granted to a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    name: String,
}

impl Authority {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of the granted authority, e.g. `ROLE_USER`
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Customer domain entity
///
/// `id` is `None` until a storage backend persists the record.
#[derive(Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i32,
    pub gender: Gender,
}

// Keep the credential hash out of logs
impl std::fmt::Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .finish()
    }
}

impl Customer {
    /// Create a customer that has not been persisted yet.
    pub fn new(name: String, email: String, password: String, age: i32, gender: Gender) -> Self {
        Self {
            id: None,
            name,
            email,
            password,
            age,
            gender,
        }
    }

    /// Create a customer with a known identifier (loaded from storage).
    pub fn with_id(
        id: i32,
        name: String,
        email: String,
        password: String,
        age: i32,
        gender: Gender,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name, email, password, age, gender)
        }
    }

    /// Authorities granted to this customer.
    pub fn authorities(&self) -> Vec<Authority> {
        vec![Authority::new(ROLE_USER)]
    }

    /// Login identifier used by authentication lookups.
    pub fn username(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_is_case_insensitive() {
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
    }

    #[test]
    fn test_gender_parse_rejects_unknown() {
        let err = "OTHER".parse::<Gender>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_gender_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"FEMALE\"");
    }

    #[test]
    fn test_new_customer_has_no_id() {
        let customer = Customer::new(
            "Ana".to_string(),
            "ana@example.com".to_string(),
            "hash".to_string(),
            30,
            Gender::Female,
        );
        assert!(customer.id.is_none());
        assert_eq!(customer.username(), "ana@example.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let customer = Customer::with_id(
            1,
            "Ana".to_string(),
            "ana@example.com".to_string(),
            "secret-hash".to_string(),
            30,
            Gender::Female,
        );
        let rendered = format!("{:?}", customer);
        assert!(!rendered.contains("secret-hash"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
