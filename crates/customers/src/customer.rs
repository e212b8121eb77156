use serde::{Deserialize, Serialize};

use relaycrm_core::{CustomerId, Entity, FieldError, Validate};

/// A persisted customer record.
///
/// Customers are created once and never updated or deleted; the email is the
/// natural dedup key and must stay globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
    phone: Option<String>,
}

impl Customer {
    pub fn new(id: CustomerId, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
        }
    }

    /// Rebuild a customer from stored fields.
    pub fn from_stored(
        id: CustomerId,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// Candidate payload for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl Validate for NewCustomer {
    fn validate(&self) -> Vec<FieldError> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(FieldError::new("name", "cannot be empty"));
        }

        if self.email.trim().is_empty() {
            violations.push(FieldError::new("email", "cannot be empty"));
        } else if !is_plausible_email(&self.email) {
            violations.push(FieldError::new("email", "must be a valid email address"));
        }

        violations
    }
}

/// Minimal shape check: one `@` with something on both sides.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}
