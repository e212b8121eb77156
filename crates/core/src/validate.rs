//! Field-level validation seam.
//!
//! A candidate payload either passes or yields the full list of field
//! violations; validation never mutates anything.

use crate::error::{DomainError, DomainResult};

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Implemented by candidate payloads (not by persisted entities).
pub trait Validate {
    /// Collect every violated rule. An empty list means the payload is valid.
    fn validate(&self) -> Vec<FieldError>;

    /// Convenience: first-error-wins form used by single-entity creation.
    fn ensure_valid(&self) -> DomainResult<()> {
        let violations = self.validate();
        if violations.is_empty() {
            return Ok(());
        }

        let joined = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(DomainError::validation(joined))
    }
}
