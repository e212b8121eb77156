//! Development/demo seeding: ensure a fixed set of sample customers and
//! products exist. Create-if-absent by natural key (customer email, product
//! name), so re-running is a no-op.

use relaycrm_core::{CustomerId, ProductId};
use relaycrm_customers::{Customer, NewCustomer};
use relaycrm_products::{NewProduct, Product};

use crate::entity_store::{EntityStore, EntityStoreError};

/// What a seeding run actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub customers_created: usize,
    pub products_created: usize,
}

const SAMPLE_CUSTOMERS: &[(&str, &str, Option<&str>)] = &[
    ("John Doe", "john@example.com", Some("+1234567890")),
    ("Jane Smith", "jane@example.com", None),
];

/// Sample products, prices in cents.
const SAMPLE_PRODUCTS: &[(&str, i64, i64)] = &[("Phone", 49_999, 20), ("Tablet", 29_999, 15)];

pub async fn seed(store: &dyn EntityStore) -> Result<SeedReport, EntityStoreError> {
    let mut report = SeedReport::default();

    for (name, email, phone) in SAMPLE_CUSTOMERS {
        if store.customer_by_email(email).await?.is_some() {
            continue;
        }

        let mut new = NewCustomer::new(*name, *email);
        new.phone = phone.map(str::to_string);
        store
            .insert_customer(Customer::new(CustomerId::new(), new))
            .await?;
        report.customers_created += 1;
    }

    for (name, price_cents, stock) in SAMPLE_PRODUCTS {
        if store.product_by_name(name).await?.is_some() {
            continue;
        }

        store
            .insert_product(Product::new(
                ProductId::new(),
                NewProduct::new(*name, *price_cents).with_stock(*stock),
            ))
            .await?;
        report.products_created += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_store::InMemoryEntityStore;

    #[tokio::test]
    async fn seeds_the_sample_rows() {
        let store = InMemoryEntityStore::new();

        let report = seed(&store).await.unwrap();
        assert_eq!(report.customers_created, 2);
        assert_eq!(report.products_created, 2);

        let products = store.list_products().await.unwrap();
        assert!(products.iter().any(|p| p.name() == "Phone" && p.price_cents() == 49_999));
    }

    #[tokio::test]
    async fn reseeding_is_idempotent() {
        let store = InMemoryEntityStore::new();
        seed(&store).await.unwrap();

        let second = seed(&store).await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(store.list_customers().await.unwrap().len(), 2);
        assert_eq!(store.list_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeding_fills_only_the_gaps() {
        let store = InMemoryEntityStore::new();
        store
            .insert_customer(Customer::new(
                CustomerId::new(),
                NewCustomer::new("John Doe", "john@example.com"),
            ))
            .await
            .unwrap();

        let report = seed(&store).await.unwrap();
        assert_eq!(report.customers_created, 1);
        assert_eq!(report.products_created, 2);
    }
}
