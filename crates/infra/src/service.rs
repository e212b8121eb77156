//! Workflow orchestration over the entity store.
//!
//! `CrmService` is the layer HTTP handlers talk to. It validates payloads,
//! resolves references, runs the duplicate checks, and persists through the
//! store; every business failure comes back as a typed `DomainError` variant
//! so callers can branch on the kind instead of matching strings.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use relaycrm_core::{CustomerId, DomainError, Entity, OrderId, ProductId, Validate};
use relaycrm_customers::{Customer, CustomerImportItem, ImportOutcome, NewCustomer};
use relaycrm_orders::{NewOrder, Order};
use relaycrm_products::{NewProduct, Product};

use crate::entity_store::{EntityStore, EntityStoreError, InMemoryEntityStore};

/// Failure of a service call: a deterministic business error, or the store
/// misbehaving underneath it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("entity store failure: {0}")]
    Store(#[from] EntityStoreError),
}

impl ServiceError {
    /// The domain error, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Store(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct CrmService {
    store: Arc<dyn EntityStore>,
}

impl CrmService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Service over a fresh in-memory store (tests, dev bootstrap).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEntityStore::new()))
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    /// Create a single customer.
    ///
    /// The duplicate-email pre-check makes the specific error observable
    /// before the write is attempted; the store's unique constraint stays in
    /// place as the backstop for the race two concurrent creates can run.
    pub async fn create_customer(&self, new: NewCustomer) -> Result<Customer, ServiceError> {
        new.ensure_valid()?;

        if self.store.customer_by_email(&new.email).await?.is_some() {
            return Err(DomainError::duplicate_email(&new.email).into());
        }

        let email = new.email.clone();
        let customer = Customer::new(CustomerId::new(), new);

        match self.store.insert_customer(customer).await {
            Ok(created) => {
                info!(customer_id = %created.id(), "customer created");
                Ok(created)
            }
            Err(EntityStoreError::UniqueViolation { .. }) => {
                Err(DomainError::duplicate_email(email).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Bulk customer import with per-item failure isolation.
    ///
    /// Items are processed in input order. A failing item is recorded and
    /// skipped; it never aborts siblings and never rolls back items already
    /// accepted in the same call. Uniqueness is checked against committed
    /// customers and against emails already accepted earlier in this batch.
    pub async fn bulk_create_customers(
        &self,
        items: Vec<CustomerImportItem>,
    ) -> Result<ImportOutcome, ServiceError> {
        let mut outcome = ImportOutcome::default();
        let mut accepted: HashSet<String> = HashSet::new();

        for item in items {
            let new = match item.into_new_customer() {
                Ok(new) => new,
                Err(message) => {
                    outcome.record_error(message);
                    continue;
                }
            };

            let violations = new.validate();
            if !violations.is_empty() {
                let joined = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                outcome.record_error(format!("{}: {joined}", new.email));
                continue;
            }

            if accepted.contains(&new.email)
                || self.store.customer_by_email(&new.email).await?.is_some()
            {
                outcome.record_error(format!("Duplicate email: {}", new.email));
                continue;
            }

            let email = new.email.clone();
            match self
                .store
                .insert_customer(Customer::new(CustomerId::new(), new))
                .await
            {
                Ok(created) => {
                    accepted.insert(email);
                    outcome.record_created(created);
                }
                Err(EntityStoreError::UniqueViolation { .. }) => {
                    outcome.record_error(format!("Duplicate email: {email}"));
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            created = outcome.created.len(),
            errors = outcome.errors.len(),
            "bulk customer import finished"
        );
        Ok(outcome)
    }

    pub async fn create_product(&self, new: NewProduct) -> Result<Product, ServiceError> {
        new.ensure_valid()?;

        let product = self
            .store
            .insert_product(Product::new(ProductId::new(), new))
            .await?;
        info!(product_id = %product.id(), "product created");
        Ok(product)
    }

    /// The order workflow: resolve customer, resolve products, place,
    /// persist. All-or-nothing; a failure at any step leaves no trace.
    pub async fn create_order(&self, new: NewOrder) -> Result<Order, ServiceError> {
        let customer = self
            .store
            .customer_by_id(new.customer_id)
            .await?
            .ok_or(DomainError::InvalidCustomer(new.customer_id))?;

        // A repeated id counts once; the set is what gets resolved.
        let mut seen = HashSet::new();
        let requested: Vec<ProductId> = new
            .product_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let products = self.store.products_by_ids(&requested).await?;
        let order = Order::place(OrderId::new(), &customer, &products, new.order_date, Utc::now())?;

        let order = self.store.insert_order(order).await?;
        info!(
            order_id = %order.id(),
            customer_id = %order.customer_id(),
            total_amount_cents = order.total_amount_cents(),
            "order placed"
        );
        Ok(order)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.store.list_customers().await?)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list_products().await?)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.store.list_orders().await?)
    }
}
