//! Domain-level constants.
//!
//! Authority names and the persisted gender labels.

// =============================================================================
// Authorities
// =============================================================================

/// Authority granted to every registered customer
pub const ROLE_USER: &str = "ROLE_USER";

// =============================================================================
// Gender
// =============================================================================

pub const GENDER_MALE: &str = "MALE";

pub const GENDER_FEMALE: &str = "FEMALE";
