use serde::{Deserialize, Serialize};

use relaycrm_core::{Entity, FieldError, ProductId, Validate};

/// A persisted product record.
///
/// Prices are kept in the smallest currency unit (cents). Stock is
/// informational: orders never consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price_cents: i64,
    stock: i64,
}

impl Product {
    pub fn new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price_cents: new.price_cents,
            stock: new.stock,
        }
    }

    /// Rebuild a product from stored fields.
    pub fn from_stored(id: ProductId, name: String, price_cents: i64, stock: i64) -> Self {
        Self {
            id,
            name,
            price_cents,
            stock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Candidate payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            name: name.into(),
            price_cents,
            stock: 0,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }
}

impl Validate for NewProduct {
    fn validate(&self) -> Vec<FieldError> {
        let mut violations = Vec::new();

        if self.price_cents <= 0 {
            violations.push(FieldError::new("price_cents", "price must be positive"));
        }

        if self.stock < 0 {
            violations.push(FieldError::new("stock", "stock cannot be negative"));
        }

        violations
    }
}
