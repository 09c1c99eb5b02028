//! Credential hashing capability.
//!
//! The customer service only ever sees the `PasswordEncoder` trait; the
//! Argon2 implementation below is what the binary wires in.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{DomainError, DomainResult};

/// One-way credential hashing.
pub trait PasswordEncoder: Send + Sync {
    /// Hash a plain text password for storage.
    fn encode(&self, plain_text: &str) -> DomainResult<String>;

    /// Verify a plain text password against a stored hash.
    fn matches(&self, plain_text: &str, hash: &str) -> bool;
}

/// Argon2 password encoder with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn matches(&self, plain_text: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_and_match() {
        let encoder = Argon2PasswordEncoder::new();
        let hash = encoder.encode("SecurePassword123!").unwrap();

        assert_ne!(hash, "SecurePassword123!");
        assert!(encoder.matches("SecurePassword123!", &hash));
        assert!(!encoder.matches("WrongPassword123", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let encoder = Argon2PasswordEncoder::new();
        let first = encoder.encode("SamePassword123").unwrap();
        let second = encoder.encode("SamePassword123").unwrap();

        // Different salts produce different hashes
        assert_ne!(first, second);
        assert!(encoder.matches("SamePassword123", &first));
        assert!(encoder.matches("SamePassword123", &second));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let encoder = Argon2PasswordEncoder::new();
        assert!(!encoder.matches("password", "not-a-phc-string"));
    }
}
