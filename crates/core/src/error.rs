//! Domain error model.

use thiserror::Error;

use crate::id::CustomerId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures. Infrastructure
/// concerns (connection loss, query errors) belong to the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Email uniqueness violation, distinct from generic validation.
    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    /// Referenced customer does not exist.
    #[error("invalid customer id: {0}")]
    InvalidCustomer(CustomerId),

    /// The requested product id set resolved to no products. Covers both an
    /// empty request and ids that match nothing.
    #[error("no products matched the requested ids")]
    InvalidProducts,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail(email.into())
    }

    pub fn invalid_customer(id: CustomerId) -> Self {
        Self::InvalidCustomer(id)
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
