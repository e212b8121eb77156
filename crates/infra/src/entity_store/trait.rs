use async_trait::async_trait;
use thiserror::Error;

use relaycrm_core::{CustomerId, ProductId};
use relaycrm_customers::Customer;
use relaycrm_orders::Order;
use relaycrm_products::Product;

/// Storage-level failure.
///
/// Constraint violations get their own variants so the service layer can
/// translate them into the matching domain error instead of a generic 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityStoreError {
    /// A unique constraint rejected the write (e.g. `customers.email`).
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A referenced row does not exist.
    #[error("referential integrity violated: {0}")]
    ForeignKey(String),

    /// Anything else: connection loss, malformed rows, lock poisoning.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl EntityStoreError {
    pub fn unique(constraint: impl Into<String>) -> Self {
        Self::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// The entity store owns durability and referential integrity for all three
/// record kinds. Entities arrive fully formed (ids assigned by the caller);
/// the store only persists and enforces its constraints.
///
/// Writes within a single call are atomic: a failed `insert_order` leaves
/// neither the order row nor any association behind.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer, EntityStoreError>;
    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, EntityStoreError>;
    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, EntityStoreError>;
    async fn list_customers(&self) -> Result<Vec<Customer>, EntityStoreError>;

    async fn insert_product(&self, product: Product) -> Result<Product, EntityStoreError>;
    async fn product_by_name(&self, name: &str) -> Result<Option<Product>, EntityStoreError>;
    /// Resolve an id set to the products that exist. Missing ids are simply
    /// absent from the result; the caller decides whether that matters.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, EntityStoreError>;
    async fn list_products(&self) -> Result<Vec<Product>, EntityStoreError>;

    async fn insert_order(&self, order: Order) -> Result<Order, EntityStoreError>;
    async fn list_orders(&self) -> Result<Vec<Order>, EntityStoreError>;
}
