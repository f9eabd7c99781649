//! Error types shared by the entity models and the registry.
//!
//! Two conventions live side by side:
//!
//! - [`ValidationError`] is a contract violation. Constructors and setters return it when an
//!   argument breaks a field rule, and the entity is left exactly as it was.
//! - [`RegistryError`] (minus its `Invalid` case) and
//!   [`ActionReport`](crate::models::ActionReport) describe ordinary outcomes such as a missing
//!   id or a full collection that callers are expected to branch on.

use thiserror::Error;

/// A field-level rule was broken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Field '{field}' must be greater than {min}, got {actual}")]
    NotPositive {
        field: &'static str,
        min: f64,
        actual: f64,
    },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    #[error("Field '{field}' must be one of [{allowed}], got '{actual}'")]
    NotInSet {
        field: &'static str,
        allowed: String,
        actual: String,
    },

    #[error("Operation '{operation}' requires a {required}")]
    WrongRole {
        operation: &'static str,
        required: &'static str,
    },
}

impl ValidationError {
    pub fn empty_field(field: &'static str) -> Self {
        ValidationError::EmptyField { field }
    }

    pub fn out_of_range(field: &'static str, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field,
            min,
            max,
            actual,
        }
    }

    pub fn invalid_format(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_in_set(field: &'static str, allowed: &[&str], actual: impl Into<String>) -> Self {
        ValidationError::NotInSet {
            field,
            allowed: allowed.join(", "),
            actual: actual.into(),
        }
    }

    /// The field (or operation) the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotInSet { field, .. } => *field,
            ValidationError::WrongRole { operation, .. } => *operation,
        }
    }
}

/// Which registry collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Sessions,
    Users,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Users => "users",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a registry operation that did not happen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("User not found: {0}")]
    PersonNotFound(String),

    #[error("Capacity reached: {collection} limit is {limit}")]
    CapacityReached {
        collection: Collection,
        limit: usize,
    },

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Duplicate id in {collection}: {id}")]
    DuplicateId { collection: Collection, id: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl RegistryError {
    /// True when the failure came from invalid input rather than registry state.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, RegistryError::Invalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field_and_rule() {
        let err = ValidationError::out_of_range("age", 0.0, 120.0, 130.0);
        assert_eq!(
            err.to_string(),
            "Field 'age' must be between 0 and 120, got 130"
        );
        assert_eq!(err.field(), "age");

        let err = ValidationError::not_in_set("sense", &["Sight", "Hearing"], "Echo");
        assert_eq!(
            err.to_string(),
            "Field 'sense' must be one of [Sight, Hearing], got 'Echo'"
        );
    }

    #[test]
    fn only_wrapped_validation_errors_are_contract_violations() {
        let invalid: RegistryError = ValidationError::empty_field("name").into();
        assert!(invalid.is_contract_violation());
        assert!(!RegistryError::SessionNotFound("s-1".into()).is_contract_violation());
        assert_eq!(
            RegistryError::CapacityReached {
                collection: Collection::Users,
                limit: 500
            }
            .to_string(),
            "Capacity reached: users limit is 500"
        );
    }
}
