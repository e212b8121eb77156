//! Bulk customer import payloads and outcome.
//!
//! Batch items arrive with every field optional so that a malformed item can
//! be reported individually instead of failing the whole call. The boundary
//! check here turns an item into a `NewCustomer` or a descriptive error;
//! whether the item is actually accepted is decided by the import workflow.

use serde::{Deserialize, Serialize};

use crate::customer::{Customer, NewCustomer};

/// One item of a bulk import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerImportItem {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerImportItem {
    /// Check required-vs-optional fields and produce a creation payload.
    ///
    /// `name` and `email` are required and must be non-blank; `phone` is
    /// optional. The error message carries the offending item so it can be
    /// reported back verbatim.
    pub fn into_new_customer(self) -> Result<NewCustomer, String> {
        let name_present = self.name.as_deref().is_some_and(|n| !n.trim().is_empty());
        let email_present = self.email.as_deref().is_some_and(|e| !e.trim().is_empty());

        if !name_present || !email_present {
            return Err(format!("Missing required fields for {self:?}"));
        }

        Ok(NewCustomer {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
        })
    }
}

/// Result of a bulk import: successes and per-item errors, both in input
/// order. One item failing never aborts its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub created: Vec<Customer>,
    pub errors: Vec<String>,
}

impl ImportOutcome {
    pub fn record_created(&mut self, customer: Customer) {
        self.created.push(customer);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: Option<&str>, email: Option<&str>) -> CustomerImportItem {
        CustomerImportItem {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            phone: None,
        }
    }

    #[test]
    fn complete_item_becomes_payload() {
        let new = item(Some("A"), Some("a@x.com")).into_new_customer().unwrap();
        assert_eq!(new.name, "A");
        assert_eq!(new.email, "a@x.com");
    }

    #[test]
    fn missing_name_is_reported_with_the_item() {
        let err = item(None, Some("b@x.com")).into_new_customer().unwrap_err();
        assert!(err.starts_with("Missing required fields for "));
        assert!(err.contains("b@x.com"));
    }

    #[test]
    fn blank_fields_count_as_missing() {
        assert!(item(Some("  "), Some("b@x.com")).into_new_customer().is_err());
        assert!(item(Some("B"), Some("")).into_new_customer().is_err());
    }
}
