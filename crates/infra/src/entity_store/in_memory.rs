use std::sync::RwLock;

use async_trait::async_trait;

use relaycrm_core::{CustomerId, Entity, ProductId};
use relaycrm_customers::Customer;
use relaycrm_orders::Order;
use relaycrm_products::Product;

use super::r#trait::{EntityStore, EntityStoreError};

/// Insertion-ordered table of one entity kind.
///
/// Linear scans are fine at the scale this backend serves.
#[derive(Debug)]
struct Table<E: Entity> {
    rows: Vec<E>,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<E: Entity> Table<E> {
    fn get(&self, id: E::Id) -> Option<&E> {
        self.rows.iter().find(|e| e.id() == id)
    }

    fn find(&self, pred: impl Fn(&E) -> bool) -> Option<&E> {
        self.rows.iter().find(|e| pred(*e))
    }

    fn push(&mut self, entity: E) {
        self.rows.push(entity);
    }
}

#[derive(Debug, Default)]
struct Inner {
    customers: Table<Customer>,
    products: Table<Product>,
    orders: Table<Order>,
}

/// In-memory entity store.
///
/// Intended for tests/dev. Every trait method takes the lock once, so a
/// single call is one atomic step and no partial write is ever observable.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    inner: RwLock<Inner>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> EntityStoreError {
    EntityStoreError::backend("lock poisoned")
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer, EntityStoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        if inner
            .customers
            .find(|c| c.email() == customer.email())
            .is_some()
        {
            return Err(EntityStoreError::unique("customers.email"));
        }

        inner.customers.push(customer.clone());
        Ok(customer)
    }

    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.customers.get(id).cloned())
    }

    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.customers.find(|c| c.email() == email).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.customers.rows.clone())
    }

    async fn insert_product(&self, product: Product) -> Result<Product, EntityStoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn product_by_name(&self, name: &str) -> Result<Option<Product>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.products.find(|p| p.name() == name).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.get(*id).cloned())
            .collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.products.rows.clone())
    }

    async fn insert_order(&self, order: Order) -> Result<Order, EntityStoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        // Emulate the relational backend's referential integrity under the
        // same write lock, so the whole insert is still one atomic step.
        if inner.customers.get(order.customer_id()).is_none() {
            return Err(EntityStoreError::ForeignKey(format!(
                "orders.customer_id -> {}",
                order.customer_id()
            )));
        }
        for product_id in order.product_ids() {
            if inner.products.get(*product_id).is_none() {
                return Err(EntityStoreError::ForeignKey(format!(
                    "order_products.product_id -> {product_id}"
                )));
            }
        }

        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, EntityStoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.orders.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relaycrm_core::OrderId;
    use relaycrm_customers::NewCustomer;
    use relaycrm_products::NewProduct;

    fn customer(email: &str) -> Customer {
        Customer::new(CustomerId::new(), NewCustomer::new("Someone", email))
    }

    fn product(price_cents: i64) -> Product {
        Product::new(ProductId::new(), NewProduct::new("Gadget", price_cents))
    }

    #[tokio::test]
    async fn enforces_email_uniqueness() {
        let store = InMemoryEntityStore::new();
        store.insert_customer(customer("a@x.com")).await.unwrap();

        let err = store.insert_customer(customer("a@x.com")).await.unwrap_err();
        assert_eq!(err, EntityStoreError::unique("customers.email"));
    }

    #[tokio::test]
    async fn resolves_only_existing_product_ids() {
        let store = InMemoryEntityStore::new();
        let known = store.insert_product(product(100)).await.unwrap();

        let resolved = store
            .products_by_ids(&[known.id(), ProductId::new()])
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id(), known.id());
    }

    #[tokio::test]
    async fn rejects_order_for_missing_customer() {
        let store = InMemoryEntityStore::new();
        let p = store.insert_product(product(100)).await.unwrap();
        let ghost = customer("ghost@x.com");

        let order = Order::place(OrderId::new(), &ghost, &[p], None, Utc::now()).unwrap();
        let err = store.insert_order(order).await.unwrap_err();
        assert!(matches!(err, EntityStoreError::ForeignKey(_)));
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let store = InMemoryEntityStore::new();
        store.insert_customer(customer("a@x.com")).await.unwrap();
        store.insert_customer(customer("b@x.com")).await.unwrap();

        let emails: Vec<String> = store
            .list_customers()
            .await
            .unwrap()
            .iter()
            .map(|c| c.email().to_string())
            .collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }
}
